//! Engine configuration

use paraglob_ac::DEFAULT_MAX_LITERAL_LEN;
use paraglob_match_mode::MatchMode;

/// Configuration for a [`Paraglob`](crate::Paraglob) engine
///
/// # Example
/// ```
/// use paraglob::{MatchMode, ParaglobConfig};
///
/// let config = ParaglobConfig::new()
///     .match_mode(MatchMode::CaseInsensitive)
///     .max_literal_len(256);
/// assert_eq!(config.mode(), MatchMode::CaseInsensitive);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParaglobConfig {
    mode: MatchMode,
    max_literal_len: usize,
}

impl ParaglobConfig {
    /// Case-sensitive matching, literals up to 1024 bytes
    pub fn new() -> Self {
        Self {
            mode: MatchMode::CaseSensitive,
            max_literal_len: DEFAULT_MAX_LITERAL_LEN,
        }
    }

    /// Set the match mode
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the longest literal the scanner accepts
    pub fn max_literal_len(mut self, len: usize) -> Self {
        self.max_literal_len = len;
        self
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn literal_limit(&self) -> usize {
        self.max_literal_len
    }
}

impl Default for ParaglobConfig {
    fn default() -> Self {
        Self::new()
    }
}
