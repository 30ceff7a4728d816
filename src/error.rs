//! Error type for the scidown library.
//!
//! Every failure is fatal for the run it occurs in, so a single enum covers
//! them all. The variants fall into the three classes the command line
//! distinguishes by exit status:
//!
//! * **option errors**: bad or unknown tokens, caught before any rendering
//! * **allocation errors**: a buffer could not grow to the requested size
//! * **I/O errors**: reading the input, writing the output, or the renderer
//!   failing to emit into its buffer
//!
//! [`ScidownError::exit_code`] is the single place that mapping lives.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit status for a successful run.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status for option-parsing errors.
pub const EXIT_OPTION: u8 = 1;
/// Process exit status for memory allocation failures.
pub const EXIT_ALLOCATION: u8 = 4;
/// Process exit status for I/O failures.
pub const EXIT_IO: u8 = 5;

/// All errors returned by the scidown library.
#[derive(Debug, Error)]
pub enum ScidownError {
    // ── Option errors ─────────────────────────────────────────────────────
    /// A token matched no flag, category, renderer or numeric option.
    #[error("unrecognized option '{token}'")]
    UnknownOption { token: String },

    /// A numeric option carried a value that is not a non-negative integer.
    #[error("option '{option}' expects a non-negative integer, got '{value}'")]
    InvalidNumber { option: String, value: String },

    /// A numeric option was given without `=VALUE`.
    #[error("option '{option}' requires a value, as in '{option}=N'")]
    MissingValue { option: String },

    /// The resolved configuration violates a constraint.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Allocation errors ─────────────────────────────────────────────────
    /// A buffer could not reserve the capacity it needed.
    #[error("failed to allocate {requested} bytes for the {what}")]
    Allocation {
        what: &'static str,
        requested: usize,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The Markdown input could not be read.
    #[error("failed to read input '{}': {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rendered output could not be written.
    #[error("failed to write output '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer failed while emitting into the output buffer.
    #[error("rendering failed: {0}")]
    Render(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScidownError {
    /// Exit status the command line reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScidownError::UnknownOption { .. }
            | ScidownError::InvalidNumber { .. }
            | ScidownError::MissingValue { .. }
            | ScidownError::InvalidConfig(_)
            | ScidownError::Internal(_) => EXIT_OPTION,
            ScidownError::Allocation { .. } => EXIT_ALLOCATION,
            ScidownError::InputRead { .. }
            | ScidownError::OutputWrite { .. }
            | ScidownError::Render(_) => EXIT_IO,
        }
    }

    /// True for errors detected while resolving options.
    pub fn is_option_error(&self) -> bool {
        self.exit_code() == EXIT_OPTION && !matches!(self, ScidownError::Internal(_))
    }
}
