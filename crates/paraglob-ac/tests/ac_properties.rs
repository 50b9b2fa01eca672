//! Property tests: the automaton finds exactly the literals a naive
//! substring search finds.

use paraglob_ac::{validate_ac_structure, ACAutomaton, ACBuilder, LiteralId, MatchMode};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn naive(literals: &[Vec<u8>], text: &[u8], mode: MatchMode) -> BTreeSet<LiteralId> {
    let text = mode.fold_bytes(text);
    let mut seen: Vec<Vec<u8>> = Vec::new();
    let mut found = BTreeSet::new();
    for lit in literals {
        let folded = mode.fold_bytes(lit);
        if seen.contains(&folded) {
            continue;
        }
        let id = seen.len() as LiteralId;
        if text.windows(folded.len()).any(|w| w == folded.as_slice()) {
            found.insert(id);
        }
        seen.push(folded);
    }
    found
}

fn literal() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcAB".to_vec()), 1..5)
}

fn text() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abcABx".to_vec()), 0..24)
}

proptest! {
    #[test]
    fn finds_same_literals_as_naive_search(
        literals in prop::collection::vec(literal(), 1..12),
        text in text(),
        insensitive in any::<bool>(),
    ) {
        let mode = if insensitive { MatchMode::CaseInsensitive } else { MatchMode::CaseSensitive };
        let ac = ACAutomaton::build(&literals, mode).unwrap();

        let found: BTreeSet<LiteralId> = ac.find_iter(&text).collect();
        prop_assert_eq!(found, naive(&literals, &text, mode));
    }

    #[test]
    fn built_automaton_is_valid(literals in prop::collection::vec(literal(), 0..16)) {
        let mut builder = ACBuilder::new(MatchMode::CaseSensitive);
        for lit in &literals {
            let _ = builder.add_literal(lit);
        }
        let result = validate_ac_structure(&builder.build());
        prop_assert!(result.is_valid(), "errors: {:?}", result.errors);
    }
}
