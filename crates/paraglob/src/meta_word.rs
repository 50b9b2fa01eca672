//! Co-occurrence ("meta-word") index
//!
//! Patterns that require exactly the same fragment set share one meta-word.
//! Each fragment keeps back-references to the meta-words containing it, so
//! a query only inspects meta-words reachable from fragments it actually
//! contains. Built once at compile time and immutable afterwards.

use crate::fragment::{FragmentId, FragmentTable};
use crate::registry::{PatternId, PatternRegistry, Requirement};
use std::collections::HashMap;

/// Stable handle of a meta-word
pub type MetaWordId = u32;

/// A distinct fragment set and the patterns requiring it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaWord {
    fragments: Vec<FragmentId>,
    patterns: Vec<PatternId>,
}

impl MetaWord {
    /// Sorted, deduplicated fragment handles
    pub fn fragments(&self) -> &[FragmentId] {
        &self.fragments
    }

    /// Patterns requiring exactly this set, in insertion order
    pub fn patterns(&self) -> &[PatternId] {
        &self.patterns
    }
}

/// Compiled co-occurrence index
#[derive(Debug, Clone, Default)]
pub struct MetaWordIndex {
    meta_words: Vec<MetaWord>,
    /// fragment -> meta-words containing it
    back_refs: Vec<Vec<MetaWordId>>,
    wildcard_only: Vec<PatternId>,
}

impl MetaWordIndex {
    /// Group registered patterns by fragment set
    pub fn build<C>(registry: &PatternRegistry<C>, table: &FragmentTable) -> Self {
        let mut by_set: HashMap<&[FragmentId], MetaWordId> = HashMap::new();
        let mut meta_words: Vec<MetaWord> = Vec::new();
        let mut back_refs: Vec<Vec<MetaWordId>> = vec![Vec::new(); table.len()];
        let mut wildcard_only = Vec::new();

        for (pattern_id, pattern) in registry.iter() {
            let fragments = match pattern.requirement() {
                Requirement::WildcardOnly => {
                    wildcard_only.push(pattern_id);
                    continue;
                }
                Requirement::Fragments(fragments) => fragments.as_slice(),
            };

            // Requirement sets are already in canonical sorted form
            let meta_id = *by_set.entry(fragments).or_insert_with(|| {
                let id = meta_words.len() as MetaWordId;
                meta_words.push(MetaWord {
                    fragments: fragments.to_vec(),
                    patterns: Vec::new(),
                });
                for &f in fragments {
                    back_refs[f as usize].push(id);
                }
                id
            });
            meta_words[meta_id as usize].patterns.push(pattern_id);
        }

        Self {
            meta_words,
            back_refs,
            wildcard_only,
        }
    }

    pub fn get(&self, id: MetaWordId) -> Option<&MetaWord> {
        self.meta_words.get(id as usize)
    }

    /// Meta-words containing `fragment`
    pub fn containing(&self, fragment: FragmentId) -> &[MetaWordId] {
        self.back_refs
            .get(fragment as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Patterns checked on every query
    pub fn wildcard_only(&self) -> &[PatternId] {
        &self.wildcard_only
    }

    pub fn len(&self) -> usize {
        self.meta_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meta_words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetaWordId, &MetaWord)> {
        self.meta_words
            .iter()
            .enumerate()
            .map(|(i, m)| (i as MetaWordId, m))
    }

    pub(crate) fn back_ref_table(&self) -> &[Vec<MetaWordId>] {
        &self.back_refs
    }
}
