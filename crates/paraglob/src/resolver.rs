//! Query-time candidate resolution
//!
//! A query runs in two phases over a [`QueryContext`]:
//! 1. scan the text and collect the fragments that are present, i.e. whose
//!    needles all occurred (needle-less fragments are always present)
//! 2. for every meta-word reachable from a present fragment, test once
//!    whether its whole fragment set is present; if so its patterns become
//!    candidates
//!
//! Only meta-words reachable through back-references are ever touched, so
//! the work is proportional to what the text actually contains.

use crate::compile::CompiledIndex;
use crate::fragment::FragmentId;
use crate::meta_word::MetaWordId;
use crate::registry::PatternId;
use crate::scanner::LiteralScanner;
use crate::stats::MatchStats;
use paraglob_ac::LiteralId;
use std::collections::{HashMap, HashSet};

/// Scratch state of one query
///
/// Every query gets its own context, so concurrent queries on one engine
/// never share mutable state. Callers running many queries on one thread
/// can keep a context around and pass it to
/// [`Paraglob::find_in`](crate::Paraglob::find_in); it is reset on entry.
#[derive(Debug, Default)]
pub struct QueryContext {
    seen_literals: HashSet<LiteralId>,
    literal_hits: HashMap<FragmentId, u32>,
    present: HashSet<FragmentId>,
    matched: Vec<FragmentId>,
    resolved: HashSet<MetaWordId>,
    candidate_set: HashSet<PatternId>,
    candidates: Vec<PatternId>,
    stats: MatchStats,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous query, keeping allocations
    pub fn reset(&mut self) {
        self.seen_literals.clear();
        self.literal_hits.clear();
        self.present.clear();
        self.matched.clear();
        self.resolved.clear();
        self.candidate_set.clear();
        self.candidates.clear();
        self.stats = MatchStats::default();
    }

    /// Fragments found present, in discovery order
    pub fn matched_fragments(&self) -> &[FragmentId] {
        &self.matched
    }

    /// Candidates from satisfied meta-words, without wildcard-only patterns
    pub fn candidates(&self) -> &[PatternId] {
        &self.candidates
    }

    /// Counters of the last query run in this context
    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    /// Candidates alongside the counters verification updates
    pub(crate) fn verification_parts(&mut self) -> (&[PatternId], &mut MatchStats) {
        (&self.candidates, &mut self.stats)
    }

    fn mark_present(&mut self, fragment: FragmentId) {
        if self.present.insert(fragment) {
            self.matched.push(fragment);
        }
    }
}

/// Scan `text` and fill `ctx` with present fragments and candidates
pub(crate) fn resolve<S: LiteralScanner>(
    index: &CompiledIndex<S>,
    text: &[u8],
    ctx: &mut QueryContext,
) {
    for literal in index.scanner.scan(text) {
        if !ctx.seen_literals.insert(literal) {
            continue;
        }
        let Some(fragments) = index.literal_fragments.get(literal as usize) else {
            continue;
        };
        for &fragment in fragments {
            let hits = ctx.literal_hits.entry(fragment).or_insert(0);
            *hits += 1;
            if *hits == index.literals_needed[fragment as usize] {
                ctx.mark_present(fragment);
            }
        }
    }
    for &fragment in &index.always_present {
        ctx.mark_present(fragment);
    }
    ctx.stats.fragments_matched = ctx.matched.len();

    for i in 0..ctx.matched.len() {
        let fragment = ctx.matched[i];
        for &meta_id in index.meta_words.containing(fragment) {
            if !ctx.resolved.insert(meta_id) {
                continue;
            }
            ctx.stats.meta_words_checked += 1;

            let Some(meta) = index.meta_words.get(meta_id) else {
                continue;
            };
            if !meta.fragments().iter().all(|f| ctx.present.contains(f)) {
                continue;
            }
            ctx.stats.meta_words_satisfied += 1;
            for &pattern in meta.patterns() {
                if ctx.candidate_set.insert(pattern) {
                    ctx.candidates.push(pattern);
                }
            }
        }
    }
}
