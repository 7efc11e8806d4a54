//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Mode`] - Analysis mode selection
//!
//! # Using Mode in Libraries
//!
//! [`Mode`] is designed to be usable outside of CLI context:
//!
//! ```rust
//! use chatpulse::cli::Mode;
//! use chatpulse::Granularity;
//!
//! let mode = Mode::Weekly;
//! assert_eq!(mode.granularity(), Some(Granularity::Weekly));
//! assert_eq!(mode.default_output(), "weekly_timeline.json");
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::Granularity;

/// Extract behavioral and emotional signal timelines from WhatsApp
/// chat exports.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatpulse")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatpulse _chat.txt
    chatpulse _chat.txt -m weekly
    chatpulse _chat.txt -m month -o q1_monthly.json
    chatpulse _chat.txt -m overview
    chatpulse _chat.txt -s luz -s andrea
    chatpulse _chat.txt -c my_config.json")]
pub struct Args {
    /// Path to the WhatsApp chat export (.txt)
    pub input: String,

    /// Path to output file (default depends on mode)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Analysis mode
    #[arg(short, long, value_enum, default_value = "daily")]
    pub mode: Mode,

    /// Track only these senders (repeatable, overrides configuration)
    #[arg(short, long, value_name = "NAME")]
    pub senders: Vec<String>,

    /// Path to a JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,
}

/// Analysis modes.
///
/// The three timeline modes differ only in bucket key and per-bucket
/// caps; [`Overview`](Mode::Overview) produces the corpus-wide report
/// instead:
/// - [`Daily`](Mode::Daily) - one bucket per calendar day
/// - [`Weekly`](Mode::Weekly) - one bucket per week, keyed by Monday
/// - [`Monthly`](Mode::Monthly) - one bucket per month
/// - [`Overview`](Mode::Overview) - unbucketed corpus statistics
///
/// # Example
///
/// ```rust
/// use chatpulse::cli::Mode;
///
/// let mode: Mode = "week".parse().unwrap();
/// assert_eq!(mode, Mode::Weekly);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Daily timeline
    #[default]
    #[value(alias = "day")]
    #[serde(alias = "day")]
    Daily,

    /// Weekly timeline (weeks start on Monday)
    #[value(alias = "week")]
    #[serde(alias = "week")]
    Weekly,

    /// Monthly timeline
    #[value(alias = "month")]
    #[serde(alias = "month")]
    Monthly,

    /// Corpus-wide overview report
    Overview,
}

impl Mode {
    /// Returns the timeline granularity, `None` for the overview.
    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            Mode::Daily => Some(Granularity::Daily),
            Mode::Weekly => Some(Granularity::Weekly),
            Mode::Monthly => Some(Granularity::Monthly),
            Mode::Overview => None,
        }
    }

    /// Returns the default output filename for this mode.
    pub fn default_output(&self) -> &'static str {
        match self {
            Mode::Daily => "daily_timeline.json",
            Mode::Weekly => "weekly_timeline.json",
            Mode::Monthly => "monthly_timeline.json",
            Mode::Overview => "overview.json",
        }
    }

    /// Returns all supported mode names (including aliases).
    pub fn all_names() -> &'static [&'static str] {
        &[
            "daily", "day", "weekly", "week", "monthly", "month", "overview",
        ]
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Daily => write!(f, "daily"),
            Mode::Weekly => write!(f, "weekly"),
            Mode::Monthly => write!(f, "monthly"),
            Mode::Overview => write!(f, "overview"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Mode::Daily),
            "weekly" | "week" => Ok(Mode::Weekly),
            "monthly" | "month" => Ok(Mode::Monthly),
            "overview" => Ok(Mode::Overview),
            _ => Err(format!(
                "Unknown mode: '{}'. Expected one of: {}",
                s,
                Mode::all_names().join(", ")
            )),
        }
    }
}
