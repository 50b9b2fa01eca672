//! Glob pattern decomposition
//!
//! A pattern is split into *fragments*: the maximal pieces that contain no
//! unescaped `*` or `?` outside a bracket expression. Bracket expressions
//! are opaque and stay inside the fragment they appear in, escapes are kept
//! verbatim. A non-empty pattern that yields no fragment at all (`*`, `?*?`)
//! is *wildcard-only*.
//!
//! Each fragment in turn yields its *needles*: the literal byte runs the
//! scanner searches for. They are the fragment's text outside bracket
//! expressions with escapes resolved, so every needle of a fragment occurs
//! in any text the whole pattern matches.

use crate::glob::find_class_end;

/// Result of splitting one pattern
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decomposition {
    /// Fragments in pattern order (may repeat)
    pub fragments: Vec<Vec<u8>>,
    /// Non-empty pattern without any fragment
    pub wildcard_only: bool,
}

/// Split a pattern into fragments
///
/// # Example
/// ```
/// use paraglob::decompose::decompose;
///
/// let d = decompose(b"abc*def?x");
/// assert_eq!(d.fragments, vec![b"abc".to_vec(), b"def".to_vec(), b"x".to_vec()]);
/// assert!(!d.wildcard_only);
///
/// assert!(decompose(b"*?*").wildcard_only);
/// ```
pub fn decompose(pattern: &[u8]) -> Decomposition {
    let mut fragments = Vec::new();
    let mut current = Vec::new();
    // After an unterminated `[` the rest of the pattern has no bracket regions
    let mut brackets = true;
    let mut i = 0;

    while i < pattern.len() {
        match pattern[i] {
            b'\\' => {
                let end = (i + 2).min(pattern.len());
                current.extend_from_slice(&pattern[i..end]);
                i = end;
            }
            b'*' | b'?' => {
                if !current.is_empty() {
                    fragments.push(std::mem::take(&mut current));
                }
                i += 1;
            }
            b'[' if brackets => match find_class_end(pattern, i) {
                Some(end) => {
                    current.extend_from_slice(&pattern[i..=end]);
                    i = end + 1;
                }
                None => {
                    brackets = false;
                    current.push(b'[');
                    i += 1;
                }
            },
            b => {
                current.push(b);
                i += 1;
            }
        }
    }
    if !current.is_empty() {
        fragments.push(current);
    }

    let wildcard_only = fragments.is_empty() && !pattern.is_empty();
    Decomposition {
        fragments,
        wildcard_only,
    }
}

/// Literal runs of a fragment, deduplicated, in first-occurrence order
///
/// A fragment consisting only of bracket expressions has no needles.
pub fn needles(fragment: &[u8]) -> Vec<Vec<u8>> {
    let mut out: Vec<Vec<u8>> = Vec::new();
    let mut run = Vec::new();
    let mut brackets = true;
    let mut i = 0;

    let mut flush = |run: &mut Vec<u8>| {
        if !run.is_empty() && !out.contains(run) {
            out.push(std::mem::take(run));
        }
        run.clear();
    };

    while i < fragment.len() {
        match fragment[i] {
            b'\\' => {
                match fragment.get(i + 1) {
                    Some(&b) => run.push(b),
                    None => run.push(b'\\'),
                }
                i += 2;
            }
            b'[' if brackets => match find_class_end(fragment, i) {
                Some(end) => {
                    flush(&mut run);
                    i = end + 1;
                }
                None => {
                    brackets = false;
                    run.push(b'[');
                    i += 1;
                }
            },
            b => {
                run.push(b);
                i += 1;
            }
        }
    }
    flush(&mut run);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(pattern: &str) -> Vec<String> {
        decompose(pattern.as_bytes())
            .fragments
            .into_iter()
            .map(|f| String::from_utf8(f).unwrap())
            .collect()
    }

    fn needle_strs(fragment: &str) -> Vec<String> {
        needles(fragment.as_bytes())
            .into_iter()
            .map(|n| String::from_utf8(n).unwrap())
            .collect()
    }

    #[test]
    fn test_plain_splitting() {
        assert_eq!(frags("abc*def"), vec!["abc", "def"]);
        assert_eq!(frags("xyz"), vec!["xyz"]);
        assert_eq!(frags("*.txt"), vec![".txt"]);
        assert_eq!(frags("a?b*c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_adjacent_wildcards_drop_empty_fragments() {
        assert_eq!(frags("a**?*b"), vec!["a", "b"]);
        assert_eq!(frags("**a**"), vec!["a"]);
    }

    #[test]
    fn test_wildcard_only() {
        assert!(decompose(b"*").wildcard_only);
        assert!(decompose(b"?").wildcard_only);
        assert!(decompose(b"*?*").wildcard_only);
        assert!(!decompose(b"a*").wildcard_only);
        // Empty patterns are rejected on insert, never wildcard-only
        assert!(!decompose(b"").wildcard_only);
    }

    #[test]
    fn test_brackets_are_opaque() {
        assert_eq!(frags("a[*]b"), vec!["a[*]b"]);
        assert_eq!(frags("x*[?*]*y"), vec!["x", "[?*]", "y"]);
        assert_eq!(frags("[]*]z"), vec!["[]*]z"]);
        assert!(!decompose(b"[*]").wildcard_only);
    }

    #[test]
    fn test_unterminated_bracket() {
        assert_eq!(frags("a[b*c"), vec!["a[b", "c"]);
        assert_eq!(frags("[*"), vec!["["]);
    }

    #[test]
    fn test_escapes_kept_and_suppress_splitting() {
        assert_eq!(frags("a\\*b"), vec!["a\\*b"]);
        assert_eq!(frags("a\\?b*c"), vec!["a\\?b", "c"]);
        assert_eq!(frags("\\[x*"), vec!["\\[x"]);
        assert_eq!(frags("a\\"), vec!["a\\"]);
    }

    #[test]
    fn test_needles() {
        assert_eq!(needle_strs("abc"), vec!["abc"]);
        assert_eq!(needle_strs("a[*]b"), vec!["a", "b"]);
        assert!(needle_strs("[abc]").is_empty());
        assert_eq!(needle_strs("a\\*b"), vec!["a*b"]);
        assert_eq!(needle_strs("a[b"), vec!["a[b"]);
        assert_eq!(needle_strs("ab[x]ab"), vec!["ab"]);
        assert_eq!(needle_strs("x\\"), vec!["x\\"]);
    }

    #[test]
    fn test_decompose_is_idempotent() {
        for pattern in ["abc*def", "a[*]b", "a\\*b?c", "*", "[x*y", "q?[!a]r*"] {
            assert_eq!(decompose(pattern.as_bytes()), decompose(pattern.as_bytes()));
        }
    }
}
