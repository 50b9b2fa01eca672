//! Fragment interning table
//!
//! Every fragment seen across all inserted patterns is stored exactly once
//! and referred to elsewhere by its [`FragmentId`]. Fragments are never
//! removed; the table lives as long as the engine.

use crate::decompose::needles;
use std::collections::HashMap;

/// Stable handle of an interned fragment
pub type FragmentId = u32;

/// An interned fragment and the needles derived from it
#[derive(Debug, Clone)]
pub struct Fragment {
    text: Vec<u8>,
    needles: Vec<Vec<u8>>,
}

impl Fragment {
    /// Raw fragment text as it appears in the pattern
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Literal runs the scanner looks for
    pub fn needles(&self) -> &[Vec<u8>] {
        &self.needles
    }
}

/// Deduplicating fragment registry
#[derive(Debug, Clone, Default)]
pub struct FragmentTable {
    fragments: Vec<Fragment>,
    ids: HashMap<Vec<u8>, FragmentId>,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `text`, creating the fragment if needed
    pub fn intern(&mut self, text: &[u8]) -> FragmentId {
        match self.ids.get(text) {
            Some(&id) => id,
            None => self.intern_with_needles(text, needles(text)),
        }
    }

    /// Like [`intern`](Self::intern), with the needles of `text` already
    /// computed by the caller
    ///
    /// `needles` is dropped if the fragment is already present.
    pub fn intern_with_needles(&mut self, text: &[u8], needles: Vec<Vec<u8>>) -> FragmentId {
        if let Some(&id) = self.ids.get(text) {
            return id;
        }
        let id = self.fragments.len() as FragmentId;
        self.fragments.push(Fragment {
            text: text.to_vec(),
            needles,
        });
        self.ids.insert(text.to_vec(), id);
        id
    }

    /// Look up a fragment by handle
    pub fn get(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.get(id as usize)
    }

    /// Look up a fragment's handle by its text
    pub fn find(&self, text: &[u8]) -> Option<FragmentId> {
        self.ids.get(text).copied()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Iterate fragments in interning order
    pub fn iter(&self) -> impl Iterator<Item = (FragmentId, &Fragment)> {
        self.fragments
            .iter()
            .enumerate()
            .map(|(i, f)| (i as FragmentId, f))
    }
}
