//! Pattern registry
//!
//! Owns every inserted pattern together with its cookie and the set of
//! fragments it requires. Identical pattern texts inserted twice are two
//! independent patterns with their own IDs and cookies.

use crate::decompose::{decompose, needles};
use crate::error::{ParaglobError, Result};
use crate::fragment::{FragmentId, FragmentTable};
use crate::glob::GlobPattern;
use paraglob_ac::DEFAULT_MAX_LITERAL_LEN;
use paraglob_match_mode::MatchMode;

/// Stable handle of an inserted pattern, assigned in insertion order
pub type PatternId = u32;

/// What must be present in a query before a pattern is worth verifying
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Sorted, deduplicated fragment handles
    Fragments(Vec<FragmentId>),
    /// No fragments: verified on every query
    WildcardOnly,
}

/// An inserted pattern
#[derive(Debug, Clone)]
pub struct Pattern<C> {
    text: Vec<u8>,
    cookie: C,
    requirement: Requirement,
    glob: GlobPattern,
}

impl<C> Pattern<C> {
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn cookie(&self) -> &C {
        &self.cookie
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn is_wildcard_only(&self) -> bool {
        self.requirement == Requirement::WildcardOnly
    }

    /// Authoritative check of `text` against the whole pattern
    pub fn matches(&self, text: &[u8]) -> bool {
        self.glob.matches(text)
    }
}

/// Arena of inserted patterns
#[derive(Debug, Clone)]
pub struct PatternRegistry<C> {
    patterns: Vec<Pattern<C>>,
    mode: MatchMode,
    max_literal_len: usize,
}

impl<C> PatternRegistry<C> {
    pub fn new(mode: MatchMode) -> Self {
        Self::with_max_literal_len(mode, DEFAULT_MAX_LITERAL_LEN)
    }

    /// Registry rejecting patterns with a literal run longer than `max_literal_len`
    pub fn with_max_literal_len(mode: MatchMode, max_literal_len: usize) -> Self {
        Self {
            patterns: Vec::new(),
            mode,
            max_literal_len,
        }
    }

    /// Decompose and store a pattern, interning its fragments into `table`
    pub fn insert(
        &mut self,
        text: &[u8],
        cookie: C,
        table: &mut FragmentTable,
    ) -> Result<PatternId> {
        if text.is_empty() {
            return Err(ParaglobError::InvalidPattern("empty pattern".to_string()));
        }

        let decomposition = decompose(text);
        let mut pieces = Vec::with_capacity(decomposition.fragments.len());
        for fragment in &decomposition.fragments {
            let literals = needles(fragment);
            if let Some(long) = literals.iter().find(|n| n.len() > self.max_literal_len) {
                return Err(ParaglobError::InvalidLiteral(format!(
                    "literal of length {} exceeds maximum {}",
                    long.len(),
                    self.max_literal_len
                )));
            }
            pieces.push((fragment, literals));
        }

        let requirement = if decomposition.wildcard_only {
            Requirement::WildcardOnly
        } else {
            let mut ids: Vec<FragmentId> = pieces
                .into_iter()
                .map(|(fragment, literals)| table.intern_with_needles(fragment, literals))
                .collect();
            ids.sort_unstable();
            ids.dedup();
            Requirement::Fragments(ids)
        };

        let id = self.patterns.len() as PatternId;
        self.patterns.push(Pattern {
            text: text.to_vec(),
            cookie,
            requirement,
            glob: GlobPattern::new(text, self.mode),
        });
        Ok(id)
    }

    pub fn get(&self, id: PatternId) -> Option<&Pattern<C>> {
        self.patterns.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate patterns in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern<C>)> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (i as PatternId, p))
    }

    pub fn wildcard_only_count(&self) -> usize {
        self.patterns.iter().filter(|p| p.is_wildcard_only()).count()
    }
}
