//! Aho-Corasick literal automaton
//!
//! This crate implements the multi-literal substring scanner used by
//! paraglob to find which pattern fragments occur in a query. Literals are
//! added one at a time to an [`ACBuilder`], which rejects empty, over-long
//! and duplicate literals, and then frozen into an [`ACAutomaton`].
//!
//! # Design
//!
//! Construction uses a temporary trie with hash-map transitions. Once the
//! failure links are computed, every state is frozen into the most compact
//! encoding for its fan-out:
//! - states without transitions store nothing
//! - single-transition states store the edge inline
//! - states with up to eight transitions keep a sorted edge array
//! - wider states get a 256-entry lookup table
//!
//! Scanning is a single pass over the text and yields literal IDs lazily,
//! see [`ACAutomaton::find_iter`].

use std::collections::{HashMap, VecDeque};
use std::fmt;

pub use paraglob_match_mode::MatchMode;

// Validation module for AC automaton structures
pub mod validation;

pub use validation::{validate_ac_structure, ACStats, ACValidationResult};

/// Identifier of a literal, assigned in insertion order starting at 0
pub type LiteralId = u32;

/// Longest literal accepted by default
pub const DEFAULT_MAX_LITERAL_LEN: usize = 1024;

/// Hard cap on automaton states, keeps state IDs within `u32`
const MAX_STATES: usize = (u32::MAX >> 1) as usize;

/// Error type for AC automaton operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ACError {
    /// Literal has zero length
    ZeroLength,
    /// Literal exceeds the configured maximum length
    TooLong { len: usize, max: usize },
    /// Literal was already added; carries the ID of the first insertion
    Duplicate(LiteralId),
    /// Resource limit exceeded (e.g., too many states)
    ResourceLimitExceeded(String),
}

impl fmt::Display for ACError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ACError::ZeroLength => write!(f, "Invalid literal: zero length"),
            ACError::TooLong { len, max } => {
                write!(f, "Invalid literal: length {} exceeds maximum {}", len, max)
            }
            ACError::Duplicate(id) => write!(f, "Duplicate literal (id {})", id),
            ACError::ResourceLimitExceeded(msg) => write!(f, "Resource limit exceeded: {}", msg),
        }
    }
}

impl std::error::Error for ACError {}

/// State encoding type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    /// No transitions (terminal state only)
    Empty = 0,
    /// Single transition stored inline
    One = 1,
    /// 2-8 transitions - sorted edge array
    Sparse = 2,
    /// 9+ transitions - dense lookup table
    Dense = 3,
}

/// Frozen transitions of one state
#[derive(Debug, Clone)]
enum Transitions {
    Empty,
    One(u8, u32),
    Sparse(Box<[(u8, u32)]>),
    /// 0 means no transition; the root is never a transition target
    Dense(Box<[u32; 256]>),
}

impl Transitions {
    fn kind(&self) -> StateKind {
        match self {
            Transitions::Empty => StateKind::Empty,
            Transitions::One(..) => StateKind::One,
            Transitions::Sparse(_) => StateKind::Sparse,
            Transitions::Dense(_) => StateKind::Dense,
        }
    }

    #[inline]
    fn get(&self, ch: u8) -> Option<u32> {
        match self {
            Transitions::Empty => None,
            Transitions::One(c, target) => (*c == ch).then_some(*target),
            Transitions::Sparse(edges) => edges
                .binary_search_by_key(&ch, |&(c, _)| c)
                .ok()
                .map(|i| edges[i].1),
            Transitions::Dense(table) => match table[ch as usize] {
                0 => None,
                target => Some(target),
            },
        }
    }

    fn targets(&self) -> Vec<u32> {
        match self {
            Transitions::Empty => Vec::new(),
            Transitions::One(_, target) => vec![*target],
            Transitions::Sparse(edges) => edges.iter().map(|&(_, t)| t).collect(),
            Transitions::Dense(table) => table.iter().copied().filter(|&t| t != 0).collect(),
        }
    }
}

/// Frozen automaton state
#[derive(Debug, Clone)]
struct Node {
    transitions: Transitions,
    failure: u32,
    depth: u32,
    /// Range into `ACAutomaton::outputs`
    outputs_start: u32,
    outputs_len: u32,
}

/// Temporary state structure used during construction
#[derive(Debug, Clone, Default)]
struct BuilderState {
    transitions: HashMap<u8, u32>,
    failure: u32,
    depth: u32,
    outputs: Vec<LiteralId>,
}

impl BuilderState {
    fn new(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Classify state encoding based on transition count
    fn classify_state_kind(&self) -> StateKind {
        match self.transitions.len() {
            0 => StateKind::Empty,
            1 => StateKind::One,
            2..=8 => StateKind::Sparse,
            _ => StateKind::Dense,
        }
    }

    fn freeze(&self) -> Transitions {
        let mut edges: Vec<(u8, u32)> = self.transitions.iter().map(|(&c, &t)| (c, t)).collect();
        edges.sort_unstable_by_key(|&(c, _)| c);

        match self.classify_state_kind() {
            StateKind::Empty => Transitions::Empty,
            StateKind::One => Transitions::One(edges[0].0, edges[0].1),
            StateKind::Sparse => Transitions::Sparse(edges.into_boxed_slice()),
            StateKind::Dense => {
                let mut table = Box::new([0u32; 256]);
                for (c, t) in edges {
                    table[c as usize] = t;
                }
                Transitions::Dense(table)
            }
        }
    }
}

/// Builder for constructing the AC automaton
///
/// Literals are folded according to the match mode before insertion, so in
/// case-insensitive mode "Hello" and "hello" are duplicates of each other.
pub struct ACBuilder {
    states: Vec<BuilderState>,
    mode: MatchMode,
    max_literal_len: usize,
    /// Folded literal -> assigned ID, for duplicate detection
    literal_ids: HashMap<Vec<u8>, LiteralId>,
}

impl ACBuilder {
    /// Create an empty builder
    pub fn new(mode: MatchMode) -> Self {
        Self::with_max_literal_len(mode, DEFAULT_MAX_LITERAL_LEN)
    }

    /// Create an empty builder with a custom literal length limit
    pub fn with_max_literal_len(mode: MatchMode, max_literal_len: usize) -> Self {
        Self {
            states: vec![BuilderState::new(0)], // Root
            mode,
            max_literal_len,
            literal_ids: HashMap::new(),
        }
    }

    /// Number of distinct literals added so far
    pub fn literal_count(&self) -> usize {
        self.literal_ids.len()
    }

    /// Add a literal to the automaton
    ///
    /// Returns the new literal's ID. A literal equal (after folding) to one
    /// added earlier is rejected with [`ACError::Duplicate`] carrying the
    /// earlier ID; the builder is unchanged and remains usable.
    pub fn add_literal(&mut self, literal: &[u8]) -> Result<LiteralId, ACError> {
        if literal.is_empty() {
            return Err(ACError::ZeroLength);
        }
        if literal.len() > self.max_literal_len {
            return Err(ACError::TooLong {
                len: literal.len(),
                max: self.max_literal_len,
            });
        }

        let folded = self.mode.fold_bytes(literal);
        if let Some(&existing) = self.literal_ids.get(&folded) {
            return Err(ACError::Duplicate(existing));
        }
        if self.states.len() + folded.len() > MAX_STATES {
            return Err(ACError::ResourceLimitExceeded(format!(
                "automaton would exceed {} states",
                MAX_STATES
            )));
        }

        let literal_id = self.literal_ids.len() as LiteralId;

        // Build trie path
        let mut current = 0u32;
        for &ch in &folded {
            if let Some(&next) = self.states[current as usize].transitions.get(&ch) {
                current = next;
            } else {
                let new_id = self.states.len() as u32;
                let depth = self.states[current as usize].depth + 1;
                self.states.push(BuilderState::new(depth));
                self.states[current as usize].transitions.insert(ch, new_id);
                current = new_id;
            }
        }

        self.states[current as usize].outputs.push(literal_id);
        self.literal_ids.insert(folded, literal_id);

        Ok(literal_id)
    }

    fn build_failure_links(&mut self) {
        let mut queue = VecDeque::new();

        // Depth-1 states fail to root
        let root_children: Vec<u32> = self.states[0].transitions.values().copied().collect();
        for child in root_children {
            self.states[child as usize].failure = 0;
            queue.push_back(child);
        }

        // BFS guarantees a state's failure target is finalized before its children
        while let Some(state_id) = queue.pop_front() {
            let transitions: Vec<(u8, u32)> = self.states[state_id as usize]
                .transitions
                .iter()
                .map(|(&ch, &next)| (ch, next))
                .collect();

            for (ch, next_state) in transitions {
                queue.push_back(next_state);

                let mut fail = self.states[state_id as usize].failure;
                let target = loop {
                    if let Some(&target) = self.states[fail as usize].transitions.get(&ch) {
                        break target;
                    }
                    if fail == 0 {
                        break 0;
                    }
                    fail = self.states[fail as usize].failure;
                };
                self.states[next_state as usize].failure = target;

                // The failure target's outputs already include its own suffix chain
                if target != 0 {
                    let inherited = self.states[target as usize].outputs.clone();
                    self.states[next_state as usize].outputs.extend(inherited);
                }
            }
        }
    }

    /// Compute failure links and freeze the automaton
    pub fn build(mut self) -> ACAutomaton {
        self.build_failure_links();

        let mut outputs = Vec::new();
        let mut nodes = Vec::with_capacity(self.states.len());
        for state in &self.states {
            let outputs_start = outputs.len() as u32;
            outputs.extend_from_slice(&state.outputs);
            nodes.push(Node {
                transitions: state.freeze(),
                failure: state.failure,
                depth: state.depth,
                outputs_start,
                outputs_len: state.outputs.len() as u32,
            });
        }

        ACAutomaton {
            nodes,
            outputs,
            mode: self.mode,
            literal_count: self.literal_ids.len(),
        }
    }
}

/// Frozen Aho-Corasick automaton
///
/// Immutable after construction; safe to share between threads.
#[derive(Debug, Clone)]
pub struct ACAutomaton {
    nodes: Vec<Node>,
    outputs: Vec<LiteralId>,
    mode: MatchMode,
    literal_count: usize,
}

impl ACAutomaton {
    /// Build an automaton from a list of literals
    ///
    /// Duplicates are skipped; every other builder error is returned.
    /// IDs of accepted literals follow list order with duplicates removed.
    pub fn build<L: AsRef<[u8]>>(literals: &[L], mode: MatchMode) -> Result<Self, ACError> {
        let mut builder = ACBuilder::new(mode);
        for literal in literals {
            match builder.add_literal(literal.as_ref()) {
                Ok(_) | Err(ACError::Duplicate(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(builder.build())
    }

    /// Get the number of AC nodes in the automaton
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of distinct literals
    pub fn literal_count(&self) -> usize {
        self.literal_count
    }

    /// Find all literal occurrences in `text`
    ///
    /// Yields the ID of every literal ending at each position, so a literal
    /// occurring several times is reported several times.
    pub fn find_iter<'a>(&'a self, text: &'a [u8]) -> FindIter<'a> {
        FindIter {
            automaton: self,
            text,
            pos: 0,
            state: 0,
            pending: [].iter(),
        }
    }

    /// Check whether any literal occurs in `text`
    pub fn is_match(&self, text: &[u8]) -> bool {
        self.find_iter(text).next().is_some()
    }

    #[inline]
    fn next_state(&self, mut state: u32, ch: u8) -> u32 {
        loop {
            if let Some(next) = self.nodes[state as usize].transitions.get(ch) {
                return next;
            }
            if state == 0 {
                return 0;
            }
            state = self.nodes[state as usize].failure;
        }
    }

    #[inline]
    fn outputs_of(&self, state: u32) -> &[LiteralId] {
        let node = &self.nodes[state as usize];
        let start = node.outputs_start as usize;
        &self.outputs[start..start + node.outputs_len as usize]
    }
}

/// Lazy, one-pass iterator over literal matches
pub struct FindIter<'a> {
    automaton: &'a ACAutomaton,
    text: &'a [u8],
    pos: usize,
    state: u32,
    pending: std::slice::Iter<'a, LiteralId>,
}

impl<'a> Iterator for FindIter<'a> {
    type Item = LiteralId;

    fn next(&mut self) -> Option<LiteralId> {
        loop {
            if let Some(&id) = self.pending.next() {
                return Some(id);
            }
            let &byte = self.text.get(self.pos)?;
            self.pos += 1;
            let ch = self.automaton.mode.fold(byte);
            self.state = self.automaton.next_state(self.state, ch);
            self.pending = self.automaton.outputs_of(self.state).iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn found(ac: &ACAutomaton, text: &str) -> BTreeSet<LiteralId> {
        ac.find_iter(text.as_bytes()).collect()
    }

    #[test]
    fn test_build_simple() {
        let literals = vec!["he", "she", "his", "hers"];
        let ac = ACAutomaton::build(&literals, MatchMode::CaseSensitive).unwrap();

        assert_eq!(ac.literal_count(), 4);
        assert!(ac.node_count() > 1);
    }

    #[test]
    fn test_overlapping_matches() {
        let literals = vec!["he", "she", "his", "hers"];
        let ac = ACAutomaton::build(&literals, MatchMode::CaseSensitive).unwrap();

        // "ushers" contains she, he and hers
        assert_eq!(found(&ac, "ushers"), BTreeSet::from([0, 1, 3]));
        assert_eq!(found(&ac, "this"), BTreeSet::from([2]));
        assert!(found(&ac, "xyz").is_empty());
    }

    #[test]
    fn test_repeated_occurrences_reported() {
        let ac = ACAutomaton::build(&["ab"], MatchMode::CaseSensitive).unwrap();
        let all: Vec<LiteralId> = ac.find_iter(b"abab").collect();
        assert_eq!(all, vec![0, 0]);
    }

    #[test]
    fn test_suffix_outputs_inherited() {
        let ac = ACAutomaton::build(&["abcd", "bc", "c"], MatchMode::CaseSensitive).unwrap();
        assert_eq!(found(&ac, "xbcx"), BTreeSet::from([1, 2]));
        assert_eq!(found(&ac, "abcd"), BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_dense_state() {
        let literals: Vec<String> = (b'a'..=b'z').map(|c| format!("x{}", c as char)).collect();
        let ac = ACAutomaton::build(&literals, MatchMode::CaseSensitive).unwrap();

        assert_eq!(found(&ac, "xq"), BTreeSet::from([16]));
        // "xx" is itself a literal, then the failure link recovers "xz"
        assert_eq!(found(&ac, "xxz"), BTreeSet::from([23, 25]));
    }

    #[test]
    fn test_case_insensitive() {
        let ac = ACAutomaton::build(&["Hello"], MatchMode::CaseInsensitive).unwrap();
        assert!(ac.is_match(b"say HELLO"));
        assert!(ac.is_match(b"hello"));

        let ac = ACAutomaton::build(&["Hello"], MatchMode::CaseSensitive).unwrap();
        assert!(!ac.is_match(b"hello"));
    }

    #[test]
    fn test_builder_errors() {
        let mut builder = ACBuilder::with_max_literal_len(MatchMode::CaseSensitive, 4);
        assert_eq!(builder.add_literal(b""), Err(ACError::ZeroLength));
        assert_eq!(
            builder.add_literal(b"toolong"),
            Err(ACError::TooLong { len: 7, max: 4 })
        );
        assert_eq!(builder.add_literal(b"abc"), Ok(0));
        assert_eq!(builder.add_literal(b"abc"), Err(ACError::Duplicate(0)));
        assert_eq!(builder.add_literal(b"ab"), Ok(1));
        assert_eq!(builder.literal_count(), 2);
    }

    #[test]
    fn test_case_insensitive_duplicates() {
        let mut builder = ACBuilder::new(MatchMode::CaseInsensitive);
        assert_eq!(builder.add_literal(b"Foo"), Ok(0));
        assert_eq!(builder.add_literal(b"fOO"), Err(ACError::Duplicate(0)));
    }

    #[test]
    fn test_empty_automaton() {
        let ac = ACBuilder::new(MatchMode::CaseSensitive).build();
        assert_eq!(ac.node_count(), 1);
        assert!(!ac.is_match(b"anything"));
    }

    #[test]
    fn test_binary_literals() {
        let ac = ACAutomaton::build(&[&[0u8, 255][..], &[0u8][..]], MatchMode::CaseSensitive)
            .unwrap();
        assert_eq!(
            ac.find_iter(&[1, 0, 255]).collect::<BTreeSet<_>>(),
            BTreeSet::from([0, 1])
        );
    }
}
