//! Compile-time glue between patterns and the scanner
//!
//! Compiling builds, from the registry and the fragment table, the
//! meta-word index and a scanner over every fragment's needles, plus the
//! mapping from scanner literal IDs back to fragments. The result is
//! immutable and only read by queries.

use crate::config::ParaglobConfig;
use crate::error::Result;
use crate::fragment::{FragmentId, FragmentTable};
use crate::meta_word::MetaWordIndex;
use crate::registry::PatternRegistry;
use crate::scanner::{LiteralScanner, ScannerBuilder};
use paraglob_ac::{ACError, LiteralId};
use tracing::{debug, trace};

/// Everything a query reads
#[derive(Debug)]
pub(crate) struct CompiledIndex<S> {
    pub(crate) meta_words: MetaWordIndex,
    pub(crate) scanner: S,
    /// literal -> fragments containing it as a needle
    pub(crate) literal_fragments: Vec<Vec<FragmentId>>,
    /// fragment -> number of distinct literals it needs
    pub(crate) literals_needed: Vec<u32>,
    /// Fragments without needles, present in every query
    pub(crate) always_present: Vec<FragmentId>,
}

impl<S: LiteralScanner> CompiledIndex<S> {
    /// Build the index; nothing is retained on error
    pub(crate) fn build<C>(
        registry: &PatternRegistry<C>,
        table: &FragmentTable,
        config: &ParaglobConfig,
    ) -> Result<Self> {
        let meta_words = MetaWordIndex::build(registry, table);

        let mut builder = S::builder(config);
        let mut literal_fragments: Vec<Vec<FragmentId>> = Vec::new();
        let mut literals_needed = Vec::with_capacity(table.len());
        let mut always_present = Vec::new();
        let mut ids: Vec<LiteralId> = Vec::new();

        for (fragment_id, fragment) in table.iter() {
            ids.clear();
            for needle in fragment.needles() {
                let id = match builder.add_literal(needle) {
                    Ok(id) => id,
                    Err(ACError::Duplicate(literal_id)) => {
                        trace!(fragment_id, literal_id, "needle already in scanner");
                        literal_id
                    }
                    Err(e) => return Err(e.into()),
                };
                ids.push(id);
            }
            // Needles distinct as bytes may still fold to one literal
            ids.sort_unstable();
            ids.dedup();

            if ids.is_empty() {
                always_present.push(fragment_id);
            }
            for &id in &ids {
                let slot = id as usize;
                if slot >= literal_fragments.len() {
                    literal_fragments.resize_with(slot + 1, Vec::new);
                }
                literal_fragments[slot].push(fragment_id);
            }
            literals_needed.push(ids.len() as u32);
        }

        let scanner = builder.finish()?;

        debug!(
            patterns = registry.len(),
            fragments = table.len(),
            literals = literal_fragments.len(),
            meta_words = meta_words.len(),
            scanner_states = scanner.state_count(),
            "compiled paraglob index"
        );

        Ok(Self {
            meta_words,
            scanner,
            literal_fragments,
            literals_needed,
            always_present,
        })
    }

    pub(crate) fn literal_count(&self) -> usize {
        self.literal_fragments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParaglobError;
    use paraglob_ac::ACAutomaton;
    use paraglob_match_mode::MatchMode;

    fn compile(patterns: &[&str], config: ParaglobConfig) -> (FragmentTable, CompiledIndex<ACAutomaton>) {
        let mut table = FragmentTable::new();
        let mut registry = PatternRegistry::new(config.mode());
        for p in patterns {
            registry.insert(p.as_bytes(), (), &mut table).unwrap();
        }
        let index = CompiledIndex::build(&registry, &table, &config).unwrap();
        (table, index)
    }

    #[test]
    fn test_shared_needles_map_to_all_fragments() {
        let (table, index) = compile(&["a[xy]b*q", "a*b"], ParaglobConfig::new());

        let bracketed = table.find(b"a[xy]b").unwrap();
        let a = table.find(b"a").unwrap();
        let b = table.find(b"b").unwrap();

        // "a" and "b" are each one literal shared by two fragments
        assert_eq!(index.literal_count(), 3);
        assert_eq!(index.literals_needed[bracketed as usize], 2);
        assert_eq!(index.literals_needed[a as usize], 1);
        assert_eq!(index.literals_needed[b as usize], 1);
        assert!(index.literal_fragments[0].contains(&bracketed));
        assert!(index.literal_fragments[0].contains(&a));
    }

    #[test]
    fn test_bracket_only_fragment_always_present() {
        let (table, index) = compile(&["*[abc]*", "x"], ParaglobConfig::new());

        let class = table.find(b"[abc]").unwrap();
        assert_eq!(index.always_present, vec![class]);
        assert_eq!(index.literals_needed[class as usize], 0);
    }

    #[test]
    fn test_case_folded_needles_counted_once() {
        let config = ParaglobConfig::new().match_mode(MatchMode::CaseInsensitive);
        let (table, index) = compile(&["ab[0-9]AB"], config);

        let frag = table.find(b"ab[0-9]AB").unwrap();
        assert_eq!(index.literals_needed[frag as usize], 1);
        assert_eq!(index.literal_count(), 1);
    }

    #[test]
    fn test_overlong_needle_is_fatal() {
        let config = ParaglobConfig::new().max_literal_len(4);
        let mut table = FragmentTable::new();
        let mut registry = PatternRegistry::new(config.mode());
        registry.insert(b"abcdefgh*", (), &mut table).unwrap();

        let err = CompiledIndex::<ACAutomaton>::build(&registry, &table, &config).unwrap_err();
        assert!(matches!(err, ParaglobError::InvalidLiteral(_)));
    }
}
