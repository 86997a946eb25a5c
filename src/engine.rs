//! The substitution engine.
//!
//! An engine owns an ordered list of compiled jobs and applies them, in
//! submission order, to a caller-owned buffer. Each job's pass scans the
//! buffer as the previous job left it, so edits compose front to back.
//!
//! Rewriting builds a fresh output and swaps it in rather than shifting the
//! buffer in place, which keeps a pass linear even when replacements grow or
//! shrink the text.

use crate::diag::{Diagnostic, Status};
use crate::job::Job;
use crate::matcher::{ExecError, Matcher};
use crate::text::CodeUnit;

/// Sed-style multi-job substitution engine, generic over the code-unit
/// width of its matcher.
///
/// All operations run to completion on the calling thread and report
/// through the tri-state [`Status`] plus a single last-diagnostic slot; an
/// individual bad job never aborts the rest.
pub struct Engine<M: Matcher> {
    jobs: Vec<Job<M>>,
    diag: Diagnostic,
    backtrack_limit: Option<usize>,
}

impl<M: Matcher> Default for Engine<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Matcher> Engine<M> {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            diag: Diagnostic::default(),
            backtrack_limit: None,
        }
    }

    /// Parse and compile `command`, appending the job on success.
    ///
    /// Returns [`Status::Ok`] and grows the job list by one for a fully
    /// clean command; [`Status::Warning`] when the job was added but carried
    /// unknown flag characters; [`Status::Fatal`] when the command could not
    /// be compiled, leaving the job list unchanged. The rendered message is
    /// available from [`last_error_message`](Self::last_error_message).
    pub fn add_job(&mut self, command: &[M::Unit]) -> Status {
        match Job::compile(command, self.backtrack_limit) {
            Ok((job, unknown_flags)) => {
                self.jobs.push(job);
                if unknown_flags.is_empty() {
                    self.diag.record_ok();
                } else {
                    let list: String = unknown_flags.into_iter().collect();
                    self.diag
                        .record_warning(format!("ignoring unknown flag character(s) '{list}'"));
                }
            }
            Err(e) => self.diag.record_fatal(e.to_string()),
        }
        self.diag.status()
    }

    /// Apply every job, in submission order, to `buffer` in place.
    ///
    /// A job whose scan fails at execution time is abandoned whole: the
    /// buffer it started from is handed unchanged to the next job, and the
    /// failure is recorded. The returned status reflects the last failure
    /// of the call, or success if every pass completed.
    pub fn replace_inplace(&mut self, buffer: &mut Vec<M::Unit>) -> Status {
        self.diag.record_ok();
        for job in &self.jobs {
            match apply_job(job, buffer) {
                Ok(output) => *buffer = output,
                Err(e) => self.diag.record_fatal(e.to_string()),
            }
        }
        self.diag.status()
    }

    /// Non-destructive variant of [`replace_inplace`](Self::replace_inplace):
    /// returns the transformed text, leaving `buffer` untouched.
    pub fn replace_copy(&mut self, buffer: &[M::Unit]) -> Vec<M::Unit> {
        let mut copy = buffer.to_vec();
        // outcome lands in the diagnostic slot, as for any other call
        let _ = self.replace_inplace(&mut copy);
        copy
    }

    /// Number of compiled jobs currently held.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Drop every compiled job.
    pub fn clear_jobs(&mut self) {
        self.jobs.clear();
    }

    /// Cap the backtracking budget of patterns compiled by subsequent
    /// [`add_job`](Self::add_job) calls. Exceeding the budget during a scan
    /// is an execution-time failure for that job's pass.
    pub fn set_backtrack_limit(&mut self, limit: Option<usize>) {
        self.backtrack_limit = limit;
    }

    /// Outcome of the most recent operation on this engine.
    pub fn last_status(&self) -> Status {
        self.diag.status()
    }

    /// Message for the most recent warning or fatal condition; empty when
    /// the most recent operation fully succeeded.
    pub fn last_error_message(&self) -> &str {
        self.diag.message()
    }
}

/// One job's scan-and-rewrite pass over `buffer`, returning the rewritten
/// text, or the execution failure that abandons the pass.
fn apply_job<M: Matcher>(job: &Job<M>, buffer: &[M::Unit]) -> Result<Vec<M::Unit>, ExecError> {
    let mut output = Vec::with_capacity(buffer.len());
    let mut cursor = 0usize;

    while cursor <= buffer.len() {
        let Some(found) = job.pattern().find_at(buffer, cursor)? else {
            break;
        };

        output.extend_from_slice(&buffer[cursor..found.start]);
        job.template().render_into(&mut output, &found, buffer);
        cursor = found.end;

        if found.is_empty() {
            // Forward-progress guard: an empty match replaces, then the
            // character it sits before is copied through unchanged so the
            // next probe starts past it. Stepping a whole character keeps
            // the probe off intra-character unit boundaries.
            let step = M::Unit::char_step(buffer, cursor);
            if cursor < buffer.len() {
                output.extend_from_slice(&buffer[cursor..step.min(buffer.len())]);
            }
            cursor = step;
        }

        if !job.flags().global {
            break;
        }
    }

    if cursor < buffer.len() {
        output.extend_from_slice(&buffer[cursor..]);
    }
    Ok(output)
}
