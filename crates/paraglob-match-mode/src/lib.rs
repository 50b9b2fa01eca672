//! Match mode configuration for paraglob matching.
//!
//! This crate provides the `MatchMode` enum shared by the literal scanner
//! and the glob matcher, plus the byte folding helpers both of them use so
//! that literals, pattern text and query text are normalized the same way.

/// Match mode for pattern matching operations.
///
/// Case folding is ASCII only; bytes outside `A-Z` are compared verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// Case-sensitive matching - "abc" matches "abc" but not "ABC"
    #[default]
    CaseSensitive,
    /// Case-insensitive matching - "abc" matches "ABC", "Abc", etc.
    CaseInsensitive,
}

impl MatchMode {
    /// Fold a single byte according to this mode
    #[inline]
    pub fn fold(self, byte: u8) -> u8 {
        match self {
            MatchMode::CaseSensitive => byte,
            MatchMode::CaseInsensitive => byte.to_ascii_lowercase(),
        }
    }

    /// Compare two bytes under this mode
    #[inline]
    pub fn eq_byte(self, a: u8, b: u8) -> bool {
        self.fold(a) == self.fold(b)
    }

    /// Fold `text` into `output`, reusing its allocation
    pub fn fold_into(self, text: &[u8], output: &mut Vec<u8>) {
        output.clear();
        output.reserve(text.len());
        output.extend(text.iter().map(|&b| self.fold(b)));
    }

    /// Fold `text` into a fresh buffer
    pub fn fold_bytes(self, text: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        self.fold_into(text, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_case_sensitive() {
        assert_eq!(MatchMode::default(), MatchMode::CaseSensitive);
    }

    #[test]
    fn test_fold() {
        assert_eq!(MatchMode::CaseSensitive.fold(b'A'), b'A');
        assert_eq!(MatchMode::CaseInsensitive.fold(b'A'), b'a');
        assert_eq!(MatchMode::CaseInsensitive.fold(b'*'), b'*');
        assert!(MatchMode::CaseInsensitive.eq_byte(b'Q', b'q'));
        assert!(!MatchMode::CaseSensitive.eq_byte(b'Q', b'q'));
    }

    #[test]
    fn test_fold_bytes() {
        assert_eq!(
            MatchMode::CaseInsensitive.fold_bytes(b"Hello WORLD!"),
            b"hello world!".to_vec()
        );
        assert_eq!(MatchMode::CaseSensitive.fold_bytes(b"AbC"), b"AbC".to_vec());
    }
}
