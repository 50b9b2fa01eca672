//! Structural validation of an engine
//!
//! Checks the invariants tying the arenas together: fragment handles in
//! range, requirement sets canonical, wildcard-only flags agreeing with
//! decomposition, and (once compiled) meta-words and back-references
//! pointing at each other consistently.

use crate::compile::CompiledIndex;
use crate::decompose::decompose;
use crate::fragment::FragmentTable;
use crate::registry::{PatternRegistry, Requirement};
use crate::scanner::LiteralScanner;
use std::collections::HashMap;

/// Validation result for a paraglob engine
#[derive(Debug, Clone)]
pub struct ParaglobValidationResult {
    /// Broken invariants
    pub errors: Vec<String>,
    /// Suspicious but harmless findings
    pub warnings: Vec<String>,
    /// Statistics gathered during validation
    pub stats: ValidationStats,
}

/// Statistics gathered during validation
#[derive(Debug, Clone, Default)]
pub struct ValidationStats {
    pub pattern_count: u32,
    pub wildcard_only_count: u32,
    pub fragment_count: u32,
    pub meta_word_count: u32,
    /// Total entries over all back-reference sets
    pub back_ref_count: u32,
    /// Fragments no pattern requires
    pub unreferenced_fragments: u32,
}

impl ParaglobValidationResult {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn is_canonical(ids: &[u32]) -> bool {
    ids.windows(2).all(|w| w[0] < w[1])
}

pub(crate) fn validate_engine<C, S: LiteralScanner>(
    registry: &PatternRegistry<C>,
    table: &FragmentTable,
    compiled: Option<&CompiledIndex<S>>,
) -> ParaglobValidationResult {
    let mut result = ParaglobValidationResult::new();
    result.stats.pattern_count = registry.len() as u32;
    result.stats.fragment_count = table.len() as u32;

    let mut referenced = vec![false; table.len()];
    let mut first_seen: HashMap<&[u8], u32> = HashMap::new();

    for (id, pattern) in registry.iter() {
        let decomposed_wildcard_only = decompose(pattern.text()).wildcard_only;
        match pattern.requirement() {
            Requirement::WildcardOnly => {
                result.stats.wildcard_only_count += 1;
                if !decomposed_wildcard_only {
                    result
                        .errors
                        .push(format!("Pattern {} marked wildcard-only but has fragments", id));
                }
            }
            Requirement::Fragments(fragments) => {
                if decomposed_wildcard_only || fragments.is_empty() {
                    result
                        .errors
                        .push(format!("Pattern {} has fragments but should be wildcard-only", id));
                }
                if !is_canonical(fragments) {
                    result
                        .errors
                        .push(format!("Pattern {} fragment set is not sorted and unique", id));
                }
                for &f in fragments {
                    match referenced.get_mut(f as usize) {
                        Some(seen) => *seen = true,
                        None => result
                            .errors
                            .push(format!("Pattern {} references missing fragment {}", id, f)),
                    }
                }
            }
        }

        if let Some(first) = first_seen.insert(pattern.text(), id) {
            result
                .warnings
                .push(format!("Pattern {} repeats the text of pattern {}", id, first));
        }
    }

    let unreferenced = referenced.iter().filter(|r| !**r).count();
    if unreferenced > 0 {
        result.stats.unreferenced_fragments = unreferenced as u32;
        result
            .warnings
            .push(format!("{} fragments are not required by any pattern", unreferenced));
    }

    if let Some(index) = compiled {
        validate_compiled(registry, table, index, &mut result);
    }

    result
}

fn validate_compiled<C, S: LiteralScanner>(
    registry: &PatternRegistry<C>,
    table: &FragmentTable,
    index: &CompiledIndex<S>,
    result: &mut ParaglobValidationResult,
) {
    let meta_words = &index.meta_words;
    result.stats.meta_word_count = meta_words.len() as u32;

    let mut owner = vec![0u32; registry.len()];

    for (meta_id, meta) in meta_words.iter() {
        if meta.fragments().is_empty() {
            result
                .errors
                .push(format!("Meta-word {} has an empty fragment set", meta_id));
        }
        if !is_canonical(meta.fragments()) {
            result
                .errors
                .push(format!("Meta-word {} fragment set is not sorted and unique", meta_id));
        }
        for &f in meta.fragments() {
            if f as usize >= table.len() {
                result
                    .errors
                    .push(format!("Meta-word {} references missing fragment {}", meta_id, f));
            } else if !meta_words.containing(f).contains(&meta_id) {
                result.errors.push(format!(
                    "Fragment {} lacks back-reference to meta-word {}",
                    f, meta_id
                ));
            }
        }
        for &p in meta.patterns() {
            let Some(pattern) = registry.get(p) else {
                result
                    .errors
                    .push(format!("Meta-word {} references missing pattern {}", meta_id, p));
                continue;
            };
            owner[p as usize] += 1;
            if pattern.requirement() != &Requirement::Fragments(meta.fragments().to_vec()) {
                result.errors.push(format!(
                    "Pattern {} is filed under meta-word {} with a different fragment set",
                    p, meta_id
                ));
            }
        }
    }

    for &p in meta_words.wildcard_only() {
        match owner.get_mut(p as usize) {
            Some(count) => *count += 1,
            None => result
                .errors
                .push(format!("Wildcard-only list references missing pattern {}", p)),
        }
    }
    for (p, count) in owner.iter().enumerate() {
        if *count != 1 {
            result
                .errors
                .push(format!("Pattern {} is reachable {} times (expected 1)", p, count));
        }
    }

    let back_refs = meta_words.back_ref_table();
    if back_refs.len() != table.len() {
        result.errors.push(format!(
            "Back-reference table has {} entries for {} fragments",
            back_refs.len(),
            table.len()
        ));
    }
    for (f, refs) in back_refs.iter().enumerate() {
        result.stats.back_ref_count += refs.len() as u32;
        for &m in refs {
            let contains = meta_words
                .get(m)
                .is_some_and(|meta| meta.fragments().contains(&(f as u32)));
            if !contains {
                result
                    .errors
                    .push(format!("Fragment {} back-references unrelated meta-word {}", f, m));
            }
        }
    }

    if index.literals_needed.len() != table.len() {
        result.errors.push(format!(
            "Literal requirement table has {} entries for {} fragments",
            index.literals_needed.len(),
            table.len()
        ));
    }
    for &f in &index.always_present {
        if index.literals_needed.get(f as usize).copied() != Some(0) {
            result
                .errors
                .push(format!("Fragment {} is always present but needs literals", f));
        }
    }
    for (literal, fragments) in index.literal_fragments.iter().enumerate() {
        if fragments.is_empty() {
            result
                .warnings
                .push(format!("Literal {} maps to no fragment", literal));
        }
        for &f in fragments {
            if f as usize >= table.len() {
                result
                    .errors
                    .push(format!("Literal {} maps to missing fragment {}", literal, f));
            }
        }
    }

    result.errors.extend(
        index
            .scanner
            .validation_errors()
            .into_iter()
            .map(|e| format!("Scanner: {}", e)),
    );
}
