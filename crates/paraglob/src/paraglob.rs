//! The Paraglob engine
//!
//! Patterns are inserted one at a time, then the engine is compiled once
//! and becomes a read-only matcher that can be queried concurrently.
//!
//! ```text
//! Empty --insert--> Accepting --compile--> Compiled --find/count--> Compiled
//!   |                   |
//!   +-----compile-------+--(scanner failure)--> Failed
//! ```
//!
//! Compiling an empty engine is allowed; it matches nothing.

use crate::compile::CompiledIndex;
use crate::config::ParaglobConfig;
use crate::error::{ParaglobError, Result};
use crate::fragment::FragmentTable;
use crate::registry::{Pattern, PatternId, PatternRegistry, Requirement};
use crate::resolver::{resolve, QueryContext};
use crate::scanner::LiteralScanner;
use crate::serialization::{serialize_patterns, unserialize_patterns};
use crate::stats::{MatchStats, ParaglobStats};
use crate::validation::{validate_engine, ParaglobValidationResult};
use crate::verify::verify;
use paraglob_ac::ACAutomaton;
use paraglob_match_mode::MatchMode;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Lifecycle state of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParaglobState {
    /// Nothing inserted yet
    Empty,
    /// At least one pattern inserted, not compiled
    Accepting,
    /// Compiled and ready for queries
    Compiled,
    /// Compile failed; the engine accepts nothing and matches nothing
    Failed,
}

/// Multi-pattern glob matcher
///
/// `C` is the cookie type handed back with every match, `S` the literal
/// scanner used as a prefilter.
///
/// # Example
/// ```
/// use paraglob::Paraglob;
///
/// let mut pg = Paraglob::new();
/// pg.insert("*.txt", 1u32).unwrap();
/// pg.insert("report-*", 2).unwrap();
/// pg.compile().unwrap();
///
/// let mut cookies = Vec::new();
/// let n = pg.find("report-2024.txt", |_, c| cookies.push(*c)).unwrap();
/// assert_eq!(n, 2);
/// cookies.sort();
/// assert_eq!(cookies, vec![1, 2]);
/// ```
pub struct Paraglob<C = u64, S = ACAutomaton> {
    config: ParaglobConfig,
    fragments: FragmentTable,
    registry: PatternRegistry<C>,
    compiled: Option<CompiledIndex<S>>,
    state: ParaglobState,
    last_error: Option<ParaglobError>,
    last_glob_calls: AtomicU64,
    total_queries: AtomicU64,
}

impl<C> Paraglob<C, ACAutomaton> {
    /// Create an empty engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(ParaglobConfig::default())
    }

    /// Create an empty engine
    pub fn with_config(config: ParaglobConfig) -> Self {
        Self::with_custom_scanner(config)
    }
}

impl Paraglob<u64, ACAutomaton> {
    /// Insert every pattern and compile
    ///
    /// Each pattern's cookie is its index in `patterns`.
    pub fn build_from_patterns<P: AsRef<[u8]>>(
        patterns: &[P],
        config: ParaglobConfig,
    ) -> Result<Self> {
        let mut pg = Self::with_config(config);
        for (i, pattern) in patterns.iter().enumerate() {
            pg.insert(pattern, i as u64)?;
        }
        pg.compile()?;
        Ok(pg)
    }
}

impl<C> Default for Paraglob<C, ACAutomaton> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, S: LiteralScanner> Paraglob<C, S> {
    /// Create an empty engine using scanner type `S`
    pub fn with_custom_scanner(config: ParaglobConfig) -> Self {
        Self {
            config,
            fragments: FragmentTable::new(),
            registry: PatternRegistry::with_max_literal_len(
                config.mode(),
                config.literal_limit(),
            ),
            compiled: None,
            state: ParaglobState::Empty,
            last_error: None,
            last_glob_calls: AtomicU64::new(0),
            total_queries: AtomicU64::new(0),
        }
    }

    fn record(&mut self, err: ParaglobError) -> ParaglobError {
        self.last_error = Some(err.clone());
        err
    }

    /// Add a pattern with its cookie
    ///
    /// Fails with [`ParaglobError::AutomatonClosed`] once compile has been
    /// attempted, and with a validation error for an empty pattern or an
    /// over-long literal run. Inserting the same text twice yields two
    /// independent patterns.
    pub fn insert(&mut self, pattern: impl AsRef<[u8]>, cookie: C) -> Result<PatternId> {
        if matches!(
            self.state,
            ParaglobState::Compiled | ParaglobState::Failed
        ) {
            return Err(self.record(ParaglobError::AutomatonClosed));
        }

        let text = pattern.as_ref();
        match self.registry.insert(text, cookie, &mut self.fragments) {
            Ok(id) => {
                self.state = ParaglobState::Accepting;
                debug!(
                    pattern_id = id,
                    pattern = %String::from_utf8_lossy(text),
                    fragments = self.fragments.len(),
                    "inserted pattern"
                );
                Ok(id)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Build the meta-word index and the scanner
    ///
    /// One-shot: a second call fails with
    /// [`ParaglobError::AlreadyCompiled`]. If building fails the engine
    /// moves to [`ParaglobState::Failed`] and keeps nothing of the attempt.
    pub fn compile(&mut self) -> Result<()> {
        match self.state {
            ParaglobState::Compiled => return Err(self.record(ParaglobError::AlreadyCompiled)),
            ParaglobState::Failed => return Err(self.record(ParaglobError::AutomatonClosed)),
            ParaglobState::Empty | ParaglobState::Accepting => {}
        }

        match CompiledIndex::build(&self.registry, &self.fragments, &self.config) {
            Ok(index) => {
                self.compiled = Some(index);
                self.state = ParaglobState::Compiled;
                Ok(())
            }
            Err(e) => {
                debug!(error = %e, "compile failed");
                self.state = ParaglobState::Failed;
                Err(self.record(e))
            }
        }
    }

    pub fn state(&self) -> ParaglobState {
        self.state
    }

    pub fn is_compiled(&self) -> bool {
        self.state == ParaglobState::Compiled
    }

    pub fn mode(&self) -> MatchMode {
        self.config.mode()
    }

    pub fn config(&self) -> &ParaglobConfig {
        &self.config
    }

    /// Most recent insert or compile failure
    pub fn last_error(&self) -> Option<&ParaglobError> {
        self.last_error.as_ref()
    }

    /// Message of the most recent failure, empty if there was none
    pub fn error_message(&self) -> String {
        self.last_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn pattern_count(&self) -> usize {
        self.registry.len()
    }

    pub fn pattern(&self, id: PatternId) -> Option<&Pattern<C>> {
        self.registry.get(id)
    }

    /// Patterns in insertion order
    pub fn patterns(&self) -> impl Iterator<Item = (PatternId, &Pattern<C>)> {
        self.registry.iter()
    }

    fn run<F>(&self, ctx: &mut QueryContext, text: &[u8], on_match: F) -> Result<u64>
    where
        F: FnMut(PatternId, &Pattern<C>),
    {
        let index = self.compiled.as_ref().ok_or(ParaglobError::NotCompiled)?;

        ctx.reset();
        resolve(index, text, ctx);
        let wildcard_only = index.meta_words.wildcard_only();
        let (candidates, stats) = ctx.verification_parts();
        let matches = verify(
            &self.registry,
            candidates,
            wildcard_only,
            text,
            stats,
            on_match,
        );

        self.last_glob_calls.store(stats.glob_calls, Ordering::Relaxed);
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        trace!(
            fragments = stats.fragments_matched,
            meta_words = stats.meta_words_satisfied,
            candidates = stats.candidates,
            glob_calls = stats.glob_calls,
            matches,
            "query resolved"
        );
        Ok(matches)
    }

    /// Match `text`, calling `callback(pattern_text, cookie)` per match
    ///
    /// Returns the number of matching patterns. Each pattern is reported at
    /// most once per query; order is unspecified.
    pub fn find<F>(&self, text: impl AsRef<[u8]>, mut callback: F) -> Result<u64>
    where
        F: FnMut(&[u8], &C),
    {
        let mut ctx = QueryContext::new();
        self.run(&mut ctx, text.as_ref(), |_, p| callback(p.text(), p.cookie()))
    }

    /// Like [`find`](Self::find), reusing a caller-owned context
    pub fn find_in<F>(
        &self,
        ctx: &mut QueryContext,
        text: impl AsRef<[u8]>,
        mut callback: F,
    ) -> Result<u64>
    where
        F: FnMut(&[u8], &C),
    {
        self.run(ctx, text.as_ref(), |_, p| callback(p.text(), p.cookie()))
    }

    /// Like [`find`](Self::find), returning the query's counters
    pub fn find_with_stats<F>(&self, text: impl AsRef<[u8]>, mut callback: F) -> Result<MatchStats>
    where
        F: FnMut(&[u8], &C),
    {
        let mut ctx = QueryContext::new();
        self.run(&mut ctx, text.as_ref(), |_, p| callback(p.text(), p.cookie()))?;
        Ok(*ctx.stats())
    }

    /// Number of patterns matching `text`
    pub fn count(&self, text: impl AsRef<[u8]>) -> Result<u64> {
        let mut ctx = QueryContext::new();
        self.run(&mut ctx, text.as_ref(), |_, _| {})
    }

    /// IDs of the patterns matching `text`, ascending
    pub fn find_all(&self, text: impl AsRef<[u8]>) -> Result<Vec<PatternId>> {
        let mut ctx = QueryContext::new();
        let mut ids = Vec::new();
        self.run(&mut ctx, text.as_ref(), |id, _| ids.push(id))?;
        ids.sort_unstable();
        Ok(ids)
    }

    /// Distinct texts of the patterns matching `text`, sorted
    pub fn get(&self, text: impl AsRef<[u8]>) -> Result<Vec<&[u8]>> {
        let mut ctx = QueryContext::new();
        let mut ids = Vec::new();
        self.run(&mut ctx, text.as_ref(), |id, _| ids.push(id))?;

        let mut texts: Vec<&[u8]> = ids
            .into_iter()
            .filter_map(|id| self.registry.get(id).map(Pattern::text))
            .collect();
        texts.sort_unstable();
        texts.dedup();
        Ok(texts)
    }

    /// Glob-match calls performed by the most recent query
    pub fn last_glob_calls(&self) -> u64 {
        self.last_glob_calls.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> ParaglobStats {
        let (literal_count, meta_word_count, scanner_states) = match &self.compiled {
            Some(index) => (
                index.literal_count(),
                index.meta_words.len(),
                index.scanner.state_count(),
            ),
            None => (0, 0, 0),
        };
        ParaglobStats {
            pattern_count: self.registry.len(),
            wildcard_only_count: self.registry.wildcard_only_count(),
            fragment_count: self.fragments.len(),
            literal_count,
            meta_word_count,
            scanner_states,
            last_glob_calls: self.last_glob_calls(),
            total_queries: self.total_queries.load(Ordering::Relaxed),
        }
    }

    /// Check the engine's internal invariants
    pub fn validate(&self) -> ParaglobValidationResult {
        validate_engine(&self.registry, &self.fragments, self.compiled.as_ref())
    }

    /// Encode the pattern texts in insertion order
    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize_patterns(self.registry.iter().map(|(_, p)| p.text()))
    }

    /// Write the pattern texts to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.serialize()?)?;
        Ok(())
    }

    /// Rebuild a compiled engine from persisted pattern texts
    ///
    /// `cookie_fn(index, pattern)` supplies the cookie of each pattern.
    pub fn from_serialized<F>(data: &[u8], config: ParaglobConfig, mut cookie_fn: F) -> Result<Self>
    where
        F: FnMut(usize, &[u8]) -> C,
    {
        let patterns = unserialize_patterns(data)?;
        let mut pg = Self::with_custom_scanner(config);
        for (i, pattern) in patterns.iter().enumerate() {
            let cookie = cookie_fn(i, pattern.as_slice());
            pg.insert(pattern, cookie)?;
        }
        pg.compile()?;
        Ok(pg)
    }

    /// Read persisted pattern texts from `path` and rebuild
    pub fn load<F>(path: impl AsRef<Path>, config: ParaglobConfig, cookie_fn: F) -> Result<Self>
    where
        F: FnMut(usize, &[u8]) -> C,
    {
        let data = std::fs::read(path)?;
        Self::from_serialized(&data, config, cookie_fn)
    }
}

impl<C: fmt::Debug, S: LiteralScanner> Paraglob<C, S> {
    /// Human-readable dump of patterns, fragments and meta-words
    pub fn dump_debug(&self) -> String {
        self.to_string()
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl<C: fmt::Debug, S: LiteralScanner> fmt::Display for Paraglob<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Paraglob ({:?}, {:?})", self.state, self.config.mode())?;

        writeln!(f, "patterns ({}):", self.registry.len())?;
        for (id, pattern) in self.registry.iter() {
            write!(
                f,
                "  #{} {:?} cookie={:?}",
                id,
                lossy(pattern.text()),
                pattern.cookie()
            )?;
            match pattern.requirement() {
                Requirement::WildcardOnly => writeln!(f, " wildcard-only")?,
                Requirement::Fragments(ids) => {
                    let names: Vec<String> = ids
                        .iter()
                        .filter_map(|&fid| self.fragments.get(fid))
                        .map(|frag| format!("{:?}", lossy(frag.text())))
                        .collect();
                    writeln!(f, " fragments=[{}]", names.join(", "))?;
                }
            }
        }

        writeln!(f, "fragments ({}):", self.fragments.len())?;
        for (id, fragment) in self.fragments.iter() {
            let needles: Vec<String> = fragment
                .needles()
                .iter()
                .map(|n| format!("{:?}", lossy(n)))
                .collect();
            writeln!(
                f,
                "  #{} {:?} needles=[{}]",
                id,
                lossy(fragment.text()),
                needles.join(", ")
            )?;
        }

        match &self.compiled {
            Some(index) => {
                write!(f, "meta-words ({}):", index.meta_words.len())?;
                for (id, meta) in index.meta_words.iter() {
                    write!(
                        f,
                        "\n  #{} fragments={:?} patterns={:?}",
                        id,
                        meta.fragments(),
                        meta.patterns()
                    )?;
                }
                Ok(())
            }
            None => write!(f, "meta-words: not compiled"),
        }
    }
}

impl<C, S> fmt::Debug for Paraglob<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paraglob")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("patterns", &self.registry.len())
            .field("fragments", &self.fragments.len())
            .finish()
    }
}

impl<C, S> Paraglob<C, S> {
    fn sorted_texts(&self) -> Vec<&[u8]> {
        let mut texts: Vec<&[u8]> = self.registry.iter().map(|(_, p)| p.text()).collect();
        texts.sort_unstable();
        texts
    }
}

/// Engines are equal when they hold the same multiset of pattern texts
impl<C, S> PartialEq for Paraglob<C, S> {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_texts() == other.sorted_texts()
    }
}

impl<C, S> Eq for Paraglob<C, S> {}
