//! Error types for paraglob
//!
//! Errors fall into four groups: invalid input (empty pattern, bad
//! literal), duplicates reported by the scanner (recoverable), lifecycle
//! misuse (insert after compile, match before compile, double compile) and
//! collaborator failures.

use paraglob_ac::{ACError, LiteralId};
use thiserror::Error;

/// Result type alias for paraglob operations
pub type Result<T> = std::result::Result<T, ParaglobError>;

/// Main error type for paraglob operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParaglobError {
    /// Pattern rejected before decomposition (e.g. empty)
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Literal rejected by the scanner (zero-length or over-length)
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Literal already present in the scanner
    #[error("Duplicate literal (id {literal_id})")]
    DuplicateLiteral { literal_id: LiteralId },

    /// Insertion attempted after compile
    #[error("Automaton is closed; no more patterns can be inserted")]
    AutomatonClosed,

    /// Matching attempted on an engine that is not compiled
    #[error("Paraglob is not compiled")]
    NotCompiled,

    /// Compile called twice
    #[error("Paraglob is already compiled")]
    AlreadyCompiled,

    /// Other scanner failure
    #[error("Scanner error: {0}")]
    Scanner(ACError),

    /// Persisted pattern list is malformed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl ParaglobError {
    /// Whether the operation can be considered successful despite this error
    ///
    /// Only duplicate literals qualify: distinct patterns legitimately
    /// share fragments.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ParaglobError::DuplicateLiteral { .. })
    }
}

impl From<ACError> for ParaglobError {
    fn from(err: ACError) -> Self {
        match err {
            ACError::Duplicate(literal_id) => ParaglobError::DuplicateLiteral { literal_id },
            ACError::ZeroLength | ACError::TooLong { .. } => {
                ParaglobError::InvalidLiteral(err.to_string())
            }
            other => ParaglobError::Scanner(other),
        }
    }
}

impl From<std::io::Error> for ParaglobError {
    fn from(err: std::io::Error) -> Self {
        ParaglobError::Io(err.to_string())
    }
}
