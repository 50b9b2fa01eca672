//! Engine and query statistics

use std::fmt;

/// Counters for a single query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Distinct fragments found present in the text
    pub fragments_matched: usize,
    /// Meta-words whose subset test ran
    pub meta_words_checked: usize,
    /// Meta-words whose whole fragment set was present
    pub meta_words_satisfied: usize,
    /// Patterns handed to verification, wildcard-only ones included
    pub candidates: usize,
    /// Glob-match calls performed
    pub glob_calls: u64,
    /// Patterns that matched
    pub matches: u64,
}

impl MatchStats {
    /// Share of verified candidates that actually matched
    pub fn hit_rate(&self) -> f64 {
        if self.glob_calls == 0 {
            0.0
        } else {
            self.matches as f64 / self.glob_calls as f64
        }
    }
}

/// Structural statistics of an engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParaglobStats {
    pub pattern_count: usize,
    pub wildcard_only_count: usize,
    /// Distinct interned fragments
    pub fragment_count: usize,
    /// Distinct literals handed to the scanner (0 before compile)
    pub literal_count: usize,
    /// Distinct fragment sets (0 before compile)
    pub meta_word_count: usize,
    /// Scanner states (0 before compile)
    pub scanner_states: usize,
    /// Glob-match calls of the most recent query
    pub last_glob_calls: u64,
    /// Queries served since compile
    pub total_queries: u64,
}

impl fmt::Display for ParaglobStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "patterns: {} ({} wildcard-only)",
            self.pattern_count, self.wildcard_only_count
        )?;
        writeln!(
            f,
            "fragments: {}, literals: {}, meta-words: {}",
            self.fragment_count, self.literal_count, self.meta_word_count
        )?;
        writeln!(f, "scanner states: {}", self.scanner_states)?;
        write!(
            f,
            "queries: {}, glob calls in last query: {}",
            self.total_queries, self.last_glob_calls
        )
    }
}
