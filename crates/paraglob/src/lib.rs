//! Paraglob - match one text against many glob patterns at once
//!
//! Every pattern is split into literal fragments. A single Aho-Corasick
//! pass over the query finds which fragments occur, a co-occurrence index
//! ("meta-words") turns that into the few patterns whose fragments are all
//! present, and only those are checked with a full glob match.
//!
//! ```
//! use paraglob::{Paraglob, ParaglobConfig};
//!
//! let pg = Paraglob::build_from_patterns(&["*.example.com", "evil-*", "*"], ParaglobConfig::new())
//!     .unwrap();
//! assert_eq!(pg.find_all("evil-host.example.com").unwrap(), vec![0, 1, 2]);
//! assert_eq!(pg.count("benign").unwrap(), 1);
//! ```

mod compile;
mod paraglob;
mod resolver;
mod verify;

pub mod config;
pub mod decompose;
pub mod error;
pub mod fragment;
pub mod glob;
pub mod meta_word;
pub mod registry;
pub mod scanner;
pub mod serialization;
pub mod stats;

// Validation module for engine structures
pub mod validation;

// Re-export main types
pub use crate::paraglob::{Paraglob, ParaglobState};
pub use config::ParaglobConfig;
pub use error::{ParaglobError, Result};
pub use fragment::FragmentId;
pub use meta_word::MetaWordId;
pub use registry::{Pattern, PatternId};
pub use resolver::QueryContext;
pub use scanner::{LiteralScanner, ScannerBuilder};
pub use serialization::{serialize_patterns, unserialize_patterns};
pub use stats::{MatchStats, ParaglobStats};
pub use validation::{ParaglobValidationResult, ValidationStats};

// Re-export MatchMode from shared crate
pub use paraglob_match_mode::MatchMode;
