//! Candidate verification
//!
//! The glob matcher is authoritative: every candidate plus every
//! wildcard-only pattern is checked against the full text, and only
//! confirmed matches reach the caller.

use crate::registry::{Pattern, PatternId, PatternRegistry};
use crate::stats::MatchStats;

/// Verify `candidates` and `wildcard_only` against `text`
///
/// Calls `on_match` for each confirmed pattern and returns the number of
/// matches. Glob calls and matches are added to `stats`.
pub(crate) fn verify<C, F>(
    registry: &PatternRegistry<C>,
    candidates: &[PatternId],
    wildcard_only: &[PatternId],
    text: &[u8],
    stats: &mut MatchStats,
    mut on_match: F,
) -> u64
where
    F: FnMut(PatternId, &Pattern<C>),
{
    stats.candidates = candidates.len() + wildcard_only.len();
    let mut matches = 0u64;

    for &id in candidates.iter().chain(wildcard_only) {
        let Some(pattern) = registry.get(id) else {
            continue;
        };
        stats.glob_calls += 1;
        if pattern.matches(text) {
            matches += 1;
            on_match(id, pattern);
        }
    }

    stats.matches += matches;
    matches
}
