use crate::command::{self, CommandError, JobFlags};
use crate::matcher::{CompileError, Matcher};
use crate::template::{Template, TemplateError};
use thiserror::Error;

/// Any way compiling a command into a job can fail. All variants are fatal:
/// the job is not added.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("{0}")]
    Command(#[from] CommandError),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Template(#[from] TemplateError),
}

/// One compiled substitution unit: pattern, replacement template, flags.
///
/// Built once from a command string, immutable afterwards, owned by the
/// engine's job list.
#[derive(Debug)]
pub struct Job<M: Matcher> {
    pattern: M,
    template: Template<M::Unit>,
    flags: JobFlags,
}

impl<M: Matcher> Job<M> {
    /// Compile a raw command into a job.
    ///
    /// Unknown flag characters are returned alongside the job for the
    /// caller's warning path; they never fail compilation.
    pub fn compile(
        command: &[M::Unit],
        backtrack_limit: Option<usize>,
    ) -> Result<(Self, Vec<char>), JobError> {
        let parsed = command::parse(command)?;
        let mut options = parsed.options;
        options.backtrack_limit = backtrack_limit;

        let pattern = M::compile(&parsed.pattern, options)?;
        let template = Template::parse(&parsed.replacement, &pattern)?;

        let job = Self {
            pattern,
            template,
            flags: parsed.flags,
        };
        Ok((job, parsed.unknown_flags))
    }

    pub fn flags(&self) -> JobFlags {
        self.flags
    }

    pub(crate) fn pattern(&self) -> &M {
        &self.pattern
    }

    pub(crate) fn template(&self) -> &Template<M::Unit> {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Utf8Matcher;

    #[test]
    fn compiles_well_formed_command() {
        let (job, unknown) = Job::<Utf8Matcher>::compile(b"/a+/x/g", None).unwrap();
        assert!(job.flags().global);
        assert!(unknown.is_empty());
    }

    #[test]
    fn unknown_flags_do_not_fail() {
        let (job, unknown) = Job::<Utf8Matcher>::compile(b"/a/x/Z", None).unwrap();
        assert!(!job.flags().global);
        assert_eq!(unknown, vec!['Z']);
    }

    #[test]
    fn command_error_propagates() {
        let err = Job::<Utf8Matcher>::compile(b"/a/b", None).unwrap_err();
        assert!(matches!(err, JobError::Command(_)));
    }

    #[test]
    fn pattern_error_propagates() {
        let err = Job::<Utf8Matcher>::compile(b"/(/x/", None).unwrap_err();
        assert!(matches!(err, JobError::Compile(_)));
    }

    #[test]
    fn template_error_propagates() {
        let err = Job::<Utf8Matcher>::compile(br"/(a)/\2/", None).unwrap_err();
        assert!(matches!(err, JobError::Template(_)));
    }
}
