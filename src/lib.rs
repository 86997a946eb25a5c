//! Resub: sed-style multi-job regex substitution
//!
//! A substitution engine that compiles sed-like commands
//! (`/pattern/replacement/flags`) into independent jobs and applies them, in
//! submission order, to an in-memory text buffer. Matching is delegated to a
//! backtracking regex engine behind the [`Matcher`] trait, and the whole
//! pipeline is generic over code-unit width: the same engine runs over
//! 8-bit (UTF-8), 16-bit and 32-bit buffers.
//!
//! # Architecture
//!
//! A command string is parsed into pattern, replacement and flags
//! ([`command`]), the pattern is compiled by a width-specific matcher
//! ([`matcher`]), and the replacement is parsed into a capture-aware
//! template ([`template`]). The resulting [`Job`]s live in an [`Engine`],
//! whose `replace_inplace` drives one scan-and-rewrite pass per job.
//!
//! # Error model
//!
//! Every engine operation reports a tri-state [`Status`]: success, warning
//! (degraded but usable, e.g. an unknown flag character), or fatal (the job
//! was rejected or its pass abandoned). A fatal outcome never aborts other
//! jobs. The engine keeps the single most recent diagnostic, queried with
//! [`Engine::last_error_message`].
//!
//! # Example
//!
//! ```
//! use resub::Utf8Engine;
//!
//! let mut engine = Utf8Engine::new();
//! assert!(engine.add_job(br"/(\w+)@(\w+)/\2@\1/").is_ok());
//!
//! let mut buffer = b"alice@example".to_vec();
//! assert!(engine.replace_inplace(&mut buffer).is_ok());
//! assert_eq!(buffer, b"example@alice");
//! ```

pub mod command;
pub mod diag;
pub mod engine;
pub mod job;
pub mod matcher;
pub mod template;
pub mod text;

// Re-exports
pub use command::{CommandError, JobFlags};
pub use diag::{Diagnostic, Status};
pub use engine::Engine;
pub use job::{Job, JobError};
pub use matcher::{
    CompileError, CompileOptions, ExecError, MatchSpans, Matcher, Span, Utf16Matcher,
    Utf32Matcher, Utf8Matcher,
};
pub use template::{Template, TemplateError};
pub use text::{CodeUnit, WidthError};

/// Engine over 8-bit code units (UTF-8 buffers).
pub type Utf8Engine = Engine<Utf8Matcher>;
/// Engine over 16-bit code units.
pub type Utf16Engine = Engine<Utf16Matcher>;
/// Engine over 32-bit code units.
pub type Utf32Engine = Engine<Utf32Matcher>;
