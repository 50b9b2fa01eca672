//! Glob pattern matching
//!
//! POSIX `fnmatch` semantics with no flags, over bytes:
//! - `*` matches any run of zero or more bytes
//! - `?` matches exactly one byte
//! - `[...]` matches one byte from a class; `!` or `^` right after the
//!   opening bracket negates it, `a-z` is a range, a `]` in first position
//!   is a member, and `\` escapes the next byte
//! - `\` escapes the next byte outside classes too; a pattern ending in an
//!   unescaped `\` matches nothing
//! - an unterminated `[` is a literal `[`
//! - named classes such as `[[:digit:]]` are not supported; a `[` inside a
//!   class is an ordinary member
//!
//! Patterns are parsed once into tokens; matching is iterative with
//! single-star backtracking, so the worst case is O(pattern × text).

use paraglob_match_mode::MatchMode;

/// Character class item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClassItem {
    /// Single byte
    Char(u8),
    /// Inclusive byte range
    Range(u8, u8),
}

/// One token of a parsed glob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobToken {
    /// Literal byte
    Literal(u8),
    /// `?`
    Any,
    /// `*` (consecutive stars are collapsed)
    Star,
    /// `[...]`
    Class {
        items: Vec<CharClassItem>,
        negated: bool,
    },
}

/// Find the index of the `]` closing a bracket expression opened at `open`
///
/// Returns `None` if the bracket is unterminated, in which case the `[` is
/// an ordinary byte. The splitter uses the same rule so that bracket
/// regions are identical for decomposition and matching.
pub fn find_class_end(pattern: &[u8], open: usize) -> Option<usize> {
    debug_assert_eq!(pattern.get(open), Some(&b'['));
    let mut i = open + 1;
    if matches!(pattern.get(i), Some(b'!') | Some(b'^')) {
        i += 1;
    }
    if pattern.get(i) == Some(&b']') {
        i += 1;
    }
    while i < pattern.len() {
        match pattern[i] {
            b'\\' => i += 2,
            b']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn parse_class(body: &[u8]) -> (Vec<CharClassItem>, bool) {
    let mut i = 0;
    let negated = matches!(body.first(), Some(b'!') | Some(b'^'));
    if negated {
        i += 1;
    }

    let read_member = |i: &mut usize| -> Option<u8> {
        let &b = body.get(*i)?;
        if b == b'\\' && *i + 1 < body.len() {
            *i += 2;
            Some(body[*i - 1])
        } else {
            *i += 1;
            Some(b)
        }
    };

    let mut items = Vec::new();
    while let Some(start) = read_member(&mut i) {
        if body.get(i) == Some(&b'-') && i + 1 < body.len() {
            i += 1;
            if let Some(end) = read_member(&mut i) {
                items.push(CharClassItem::Range(start, end));
                continue;
            }
        }
        items.push(CharClassItem::Char(start));
    }
    (items, negated)
}

/// Parsed glob pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    tokens: Vec<GlobToken>,
    mode: MatchMode,
    // Set by a dangling trailing escape
    never_matches: bool,
}

impl GlobPattern {
    /// Parse a glob pattern; every byte string is a valid pattern
    pub fn new(pattern: &[u8], mode: MatchMode) -> Self {
        let mut tokens = Vec::with_capacity(pattern.len());
        let mut never_matches = false;
        let mut i = 0;

        while i < pattern.len() {
            match pattern[i] {
                b'\\' => {
                    match pattern.get(i + 1) {
                        Some(&b) => tokens.push(GlobToken::Literal(b)),
                        None => never_matches = true,
                    }
                    i += 2;
                }
                b'*' => {
                    if tokens.last() != Some(&GlobToken::Star) {
                        tokens.push(GlobToken::Star);
                    }
                    i += 1;
                }
                b'?' => {
                    tokens.push(GlobToken::Any);
                    i += 1;
                }
                b'[' => match find_class_end(pattern, i) {
                    Some(end) => {
                        let (items, negated) = parse_class(&pattern[i + 1..end]);
                        tokens.push(GlobToken::Class { items, negated });
                        i = end + 1;
                    }
                    None => {
                        tokens.push(GlobToken::Literal(b'['));
                        i += 1;
                    }
                },
                b => {
                    tokens.push(GlobToken::Literal(b));
                    i += 1;
                }
            }
        }

        Self {
            tokens,
            mode,
            never_matches,
        }
    }

    /// Parsed tokens
    pub fn tokens(&self) -> &[GlobToken] {
        &self.tokens
    }

    fn class_contains(&self, items: &[CharClassItem], byte: u8) -> bool {
        let candidates = match self.mode {
            MatchMode::CaseSensitive => [byte, byte],
            MatchMode::CaseInsensitive => [byte.to_ascii_lowercase(), byte.to_ascii_uppercase()],
        };
        candidates.iter().any(|&c| {
            items.iter().any(|item| match *item {
                CharClassItem::Char(x) => x == c,
                CharClassItem::Range(lo, hi) => lo <= c && c <= hi,
            })
        })
    }

    #[inline]
    fn token_matches(&self, token: &GlobToken, byte: u8) -> bool {
        match token {
            GlobToken::Literal(b) => self.mode.eq_byte(*b, byte),
            GlobToken::Any => true,
            GlobToken::Star => false,
            GlobToken::Class { items, negated } => self.class_contains(items, byte) != *negated,
        }
    }

    /// Whether the pattern ends in a dangling `\` and so matches no text
    pub fn never_matches(&self) -> bool {
        self.never_matches
    }

    /// Check whether `text` matches this pattern in full
    pub fn matches(&self, text: &[u8]) -> bool {
        if self.never_matches {
            return false;
        }
        let tokens = &self.tokens;
        let (mut t, mut p) = (0usize, 0usize);
        // (token index of the last star, text position it currently absorbs up to)
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            if let Some(token) = tokens.get(p) {
                if *token == GlobToken::Star {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                if self.token_matches(token, text[t]) {
                    p += 1;
                    t += 1;
                    continue;
                }
            }
            match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, t));
                }
                None => return false,
            }
        }

        tokens[p..].iter().all(|token| *token == GlobToken::Star)
    }
}

/// One-shot `fnmatch(pattern, text, 0) == 0`
pub fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    GlobPattern::new(pattern, MatchMode::CaseSensitive).matches(text)
}
