//! Literal scanner seam
//!
//! The engine only needs two things from its substring scanner: build it
//! from a list of literals, and scan a text into the IDs of the literals
//! that occur. [`ACAutomaton`] is the production implementation; anything
//! else implementing [`LiteralScanner`] can be plugged in through
//! [`Paraglob::with_custom_scanner`](crate::Paraglob::with_custom_scanner).

use crate::config::ParaglobConfig;
use paraglob_ac::{validate_ac_structure, ACAutomaton, ACBuilder, ACError, FindIter, LiteralId};

/// Incremental construction of a [`LiteralScanner`]
pub trait ScannerBuilder {
    type Scanner;

    /// Register a literal and return its ID
    ///
    /// A literal already registered must be reported as
    /// [`ACError::Duplicate`] carrying the existing ID.
    fn add_literal(&mut self, literal: &[u8]) -> Result<LiteralId, ACError>;

    /// Freeze the scanner
    fn finish(self) -> Result<Self::Scanner, ACError>;
}

/// Multi-literal substring scanner
///
/// `scan` yields every literal occurring in the text at least once,
/// possibly more than once. It is one-pass and holds no state between
/// calls, so a built scanner can be shared between threads.
pub trait LiteralScanner: Sized + Send + Sync {
    type Builder: ScannerBuilder<Scanner = Self>;
    type Matches<'a>: Iterator<Item = LiteralId>
    where
        Self: 'a;

    fn builder(config: &ParaglobConfig) -> Self::Builder;

    fn scan<'a>(&'a self, text: &'a [u8]) -> Self::Matches<'a>;

    /// Size of the scanner's state table, for statistics
    fn state_count(&self) -> usize;

    /// Structural problems found in the built scanner
    fn validation_errors(&self) -> Vec<String> {
        Vec::new()
    }
}

impl ScannerBuilder for ACBuilder {
    type Scanner = ACAutomaton;

    fn add_literal(&mut self, literal: &[u8]) -> Result<LiteralId, ACError> {
        ACBuilder::add_literal(self, literal)
    }

    fn finish(self) -> Result<ACAutomaton, ACError> {
        Ok(self.build())
    }
}

impl LiteralScanner for ACAutomaton {
    type Builder = ACBuilder;
    type Matches<'a> = FindIter<'a>;

    fn builder(config: &ParaglobConfig) -> ACBuilder {
        ACBuilder::with_max_literal_len(config.mode(), config.literal_limit())
    }

    fn scan<'a>(&'a self, text: &'a [u8]) -> FindIter<'a> {
        self.find_iter(text)
    }

    fn state_count(&self) -> usize {
        self.node_count()
    }

    fn validation_errors(&self) -> Vec<String> {
        validate_ac_structure(self).errors
    }
}
