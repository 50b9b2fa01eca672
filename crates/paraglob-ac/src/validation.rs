//! AC automaton validation
//!
//! Checks the frozen automaton's internal references: transition and
//! failure targets in range, failure links pointing to strictly shallower
//! states, output ranges and literal IDs in bounds, and reachability of
//! every state from the root.

use crate::{ACAutomaton, StateKind};
use std::collections::VecDeque;

/// Validation result for AC automaton structures
#[derive(Debug, Clone)]
pub struct ACValidationResult {
    /// Critical errors that make the structure unusable
    pub errors: Vec<String>,
    /// Warnings about potential issues (non-fatal)
    pub warnings: Vec<String>,
    /// Statistics gathered during validation
    pub stats: ACStats,
}

/// Statistics gathered during AC automaton validation
#[derive(Debug, Clone, Default)]
pub struct ACStats {
    /// Number of AC nodes
    pub node_count: u32,
    /// Number of distinct literals
    pub literal_count: u32,
    /// State encoding distribution: [Empty, One, Sparse, Dense]
    pub state_encoding_distribution: [u32; 4],
    /// Number of orphaned nodes (unreachable from root)
    pub orphaned_count: u32,
}

impl ACValidationResult {
    fn new(automaton: &ACAutomaton) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ACStats {
                node_count: automaton.node_count() as u32,
                literal_count: automaton.literal_count() as u32,
                ..ACStats::default()
            },
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate the structure of a frozen automaton
pub fn validate_ac_structure(automaton: &ACAutomaton) -> ACValidationResult {
    let mut result = ACValidationResult::new(automaton);
    let node_count = automaton.nodes.len();

    if node_count == 0 {
        result.errors.push("Automaton has no root node".to_string());
        return result;
    }

    for (i, node) in automaton.nodes.iter().enumerate() {
        let kind = node.transitions.kind();
        result.stats.state_encoding_distribution[kind as usize] += 1;

        if kind == StateKind::Dense && node.transitions.targets().len() <= 8 {
            result
                .warnings
                .push(format!("Node {} uses a dense table for few edges", i));
        }

        for target in node.transitions.targets() {
            if target as usize >= node_count {
                result
                    .errors
                    .push(format!("Node {} has edge to missing node {}", i, target));
            } else if automaton.nodes[target as usize].depth != node.depth + 1 {
                result
                    .errors
                    .push(format!("Node {} has edge to node {} at wrong depth", i, target));
            }
        }

        let failure = node.failure as usize;
        if failure >= node_count {
            result
                .errors
                .push(format!("Node {} has failure link to missing node {}", i, failure));
        } else if i != 0 && automaton.nodes[failure].depth >= node.depth {
            result
                .errors
                .push(format!("Node {} has failure link to non-shallower node {}", i, failure));
        }

        let end = node.outputs_start as usize + node.outputs_len as usize;
        if end > automaton.outputs.len() {
            result
                .errors
                .push(format!("Node {} output range out of bounds", i));
            continue;
        }
        for &literal in automaton.outputs_of(i as u32) {
            if literal as usize >= automaton.literal_count {
                result
                    .errors
                    .push(format!("Node {} reports unknown literal {}", i, literal));
            }
        }
    }

    if !result.errors.is_empty() {
        return result;
    }

    // Reachability from the root
    let mut seen = vec![false; node_count];
    let mut queue = VecDeque::from([0u32]);
    seen[0] = true;
    while let Some(state) = queue.pop_front() {
        for target in automaton.nodes[state as usize].transitions.targets() {
            if !seen[target as usize] {
                seen[target as usize] = true;
                queue.push_back(target);
            }
        }
    }
    let orphaned = seen.iter().filter(|&&s| !s).count();
    if orphaned > 0 {
        result.stats.orphaned_count = orphaned as u32;
        result
            .warnings
            .push(format!("{} nodes unreachable from root", orphaned));
    }

    result
}
