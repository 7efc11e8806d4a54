//! # Chatpulse
//!
//! A Rust library for extracting behavioral and emotional signal
//! timelines from WhatsApp chat exports.
//!
//! ## Overview
//!
//! Chatpulse turns a WhatsApp `_chat.txt` export into time-bucketed,
//! per-sender signal statistics ready for visualization:
//!
//! - **Parsing** — bracketed records with US 12-hour and day-first
//!   timestamps, multiline continuation, system notice filtering
//! - **Signals** — lexical categories, emoji classes, emotion-intensity
//!   markers, and significance-scored vocabulary per message
//! - **Aggregation** — daily, weekly (Monday-keyed), and monthly buckets
//!   per sender, plus a corpus-wide overview report
//! - **Export** — pretty-printed JSON documents with chart metadata
//!
//! ## Quick Start
//!
//! ```rust
//! use chatpulse::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let chat = "[3/10/24, 9:15:03 AM] Luz: un besito mi amor ❤️\n\
//!                 [3/10/24, 9:16:11 AM] Andrea Vega Troncoso: jajaja te amo bb\n";
//!
//!     // Parse the export
//!     let report = ChatParser::new().parse_str(chat);
//!     assert_eq!(report.message_count(), 2);
//!
//!     // Extract signals and bucket them by day
//!     let analyzer = Analyzer::new(&AnalysisConfig::default())?;
//!     let timeline = analyzer.aggregate(&report.messages, Granularity::Daily);
//!
//!     // Export for visualization
//!     let document = analyzer.export(&timeline);
//!     assert_eq!(document.timeline.len(), 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Configuration
//!
//! Every pattern table is data: senders, lexical categories, emoji
//! classes, scoring weights, and normalization rules all load from JSON
//! and overlay the built-in defaults field by field:
//!
//! ```rust,no_run
//! use chatpulse::AnalysisConfig;
//! use std::path::Path;
//!
//! # fn main() -> chatpulse::Result<()> {
//! let config = AnalysisConfig::from_path(Path::new("config.json"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] — WhatsApp export parsing
//!   - [`ChatParser`](parser::ChatParser) — bracketed-record parser
//!   - [`ParseReport`](parser::ParseReport) — messages plus skip counters
//! - [`analysis`] — signal extraction and aggregation
//!   - [`Analyzer`](analysis::Analyzer) — compiled pipeline
//!   - [`Timeline`](analysis::Timeline), [`Granularity`](analysis::Granularity) — bucketed aggregation
//!   - [`TimelineDocument`](analysis::TimelineDocument) — visualization export
//!   - [`OverviewReport`](analysis::OverviewReport) — corpus-wide report
//! - [`config`] — configuration tables ([`AnalysisConfig`](config::AnalysisConfig))
//! - [`normalize`] — tokenization and shorthand canonicalization ([`Normalizer`](normalize::Normalizer))
//! - [`message`] — the core [`Message`] type
//! - [`error`] — unified error types ([`ChatpulseError`], [`Result`])
//! - [`cli`] — CLI types ([`Args`](cli::Args), [`Mode`](cli::Mode)), behind the `cli` feature
//! - [`prelude`] — convenient re-exports

pub mod analysis;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod normalize;
pub mod parser;

// Re-export the main types at the crate root for convenience
pub use analysis::{Analyzer, Granularity, OverviewReport, TimelineDocument};
pub use config::AnalysisConfig;
pub use error::{ChatpulseError, Result};
pub use message::Message;
pub use parser::{ChatParser, ParseReport};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatpulse::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::Message;

    // Error types
    pub use crate::error::{ChatpulseError, Result};

    // Parsing
    pub use crate::parser::{ChatParser, ParseReport};

    // Configuration
    pub use crate::config::AnalysisConfig;

    // Analysis pipeline
    pub use crate::analysis::{
        Analyzer, Granularity, MessageSignals, OverviewReport, Timeline, TimelineDocument,
    };

    // Normalization
    pub use crate::normalize::Normalizer;
}
