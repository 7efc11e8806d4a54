//! Time-bucketed aggregation.
//!
//! Message signals fold into per-sender statistics keyed by calendar
//! bucket. The three granularities share one statistics shape and one
//! fold path; only the bucket key and the per-bucket caps differ.
//!
//! # Example
//!
//! ```
//! use chatpulse::Granularity;
//! use chrono::NaiveDate;
//!
//! let wednesday = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
//! assert_eq!(Granularity::Daily.bucket_key(wednesday), "2024-01-17");
//! assert_eq!(Granularity::Weekly.bucket_key(wednesday), "2024-01-15");
//! assert_eq!(Granularity::Monthly.bucket_key(wednesday), "2024-01");
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::MessageSignals;

/// Calendar resolution of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per day.
    Daily,

    /// One bucket per week, keyed by its Monday.
    Weekly,

    /// One bucket per month.
    Monthly,
}

impl Granularity {
    /// Bucket key for a date: ISO date, the week's Monday, or `YYYY-MM`.
    #[must_use]
    pub fn bucket_key(self, date: NaiveDate) -> String {
        match self {
            Self::Daily => date.format("%Y-%m-%d").to_string(),
            Self::Weekly => {
                let offset = u64::from(date.weekday().num_days_from_monday());
                let monday = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
                monday.format("%Y-%m-%d").to_string()
            }
            Self::Monthly => date.format("%Y-%m").to_string(),
        }
    }

    /// How many ranked words a bucket reports, `None` for all of them.
    #[must_use]
    pub fn top_words_cap(self) -> Option<usize> {
        match self {
            Self::Daily => Some(10),
            Self::Weekly => Some(15),
            Self::Monthly => None,
        }
    }

    /// How many ranked emojis a bucket reports.
    #[must_use]
    pub fn top_emojis_cap(self) -> usize {
        match self {
            Self::Daily => 5,
            Self::Weekly => 7,
            Self::Monthly => 3,
        }
    }

    /// How many context samples each tracked category keeps per bucket.
    #[must_use]
    pub fn contexts_cap(self) -> usize {
        match self {
            Self::Daily => 2,
            Self::Weekly | Self::Monthly => 3,
        }
    }

    /// How many sample messages each sender keeps per bucket.
    #[must_use]
    pub fn samples_cap(self) -> usize {
        match self {
            Self::Daily => 3,
            Self::Weekly | Self::Monthly => 5,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// Counter that remembers insertion order.
///
/// Ranking sorts by count descending with a stable sort, so equal counts
/// keep their first-seen order and output is deterministic run to run.
#[derive(Debug, Clone, Default)]
pub struct TallyCounter {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl TallyCounter {
    /// Adds to a key's count, creating the entry if new.
    ///
    /// Adding zero still creates the entry, so stable output keys can be
    /// registered before any hits arrive.
    pub fn add(&mut self, key: &str, count: usize) {
        if let Some(&slot) = self.index.get(key) {
            self.entries[slot].1 += count;
        } else {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), count));
        }
    }

    /// Current count for a key, zero if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ranked by count descending, truncated to `cap` if given.
    #[must_use]
    pub fn top(&self, cap: Option<usize>) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(cap) = cap {
            ranked.truncate(cap);
        }
        ranked
    }

    /// All entries as a sorted map.
    #[must_use]
    pub fn as_map(&self) -> BTreeMap<String, usize> {
        self.entries.iter().cloned().collect()
    }
}

/// Accumulated statistics for one sender in one bucket.
#[derive(Debug, Clone, Default)]
pub struct SenderStats {
    /// Messages counted, media included.
    pub message_count: usize,

    /// Distinct days the sender wrote anything, media included.
    pub active_days: BTreeSet<NaiveDate>,

    /// Lexical category hit counts.
    pub word_categories: TallyCounter,

    /// Emoji class hit counts, `other` included.
    pub emoji_categories: TallyCounter,

    /// Emotion-intensity marker counts.
    pub intensity: TallyCounter,

    /// Significant token occurrence counts.
    pub significant_words: TallyCounter,

    /// Individual emoji tallies.
    pub emojis: TallyCounter,

    /// Context samples per tracked category, capped per bucket.
    pub contexts: BTreeMap<String, Vec<String>>,

    /// Sample messages, capped per bucket.
    pub samples: Vec<String>,
}

/// Aggregation state for one granularity.
///
/// Buckets are created lazily, so periods without messages never appear
/// in output.
#[derive(Debug, Clone)]
pub struct Timeline {
    granularity: Granularity,
    buckets: BTreeMap<String, BTreeMap<String, SenderStats>>,
}

impl Timeline {
    /// Creates an empty timeline.
    #[must_use]
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            buckets: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Buckets in key order, each holding per-sender statistics.
    #[must_use]
    pub fn buckets(&self) -> &BTreeMap<String, BTreeMap<String, SenderStats>> {
        &self.buckets
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Folds one message's signals into its bucket.
    ///
    /// Counting-only signals (media, link-only messages) still increment
    /// the message count and mark the day active; their empty signal
    /// lists leave everything else untouched.
    pub fn fold(&mut self, signals: &MessageSignals) {
        let key = self.granularity.bucket_key(signals.date);
        let contexts_cap = self.granularity.contexts_cap();
        let samples_cap = self.granularity.samples_cap();

        let stats = self
            .buckets
            .entry(key)
            .or_default()
            .entry(signals.sender.clone())
            .or_default();

        stats.message_count += 1;
        stats.active_days.insert(signals.date);

        for (name, count) in &signals.category_hits {
            stats.word_categories.add(name, *count);
        }
        for name in &signals.context_categories {
            let entries = stats.contexts.entry(name.clone()).or_default();
            if entries.len() < contexts_cap {
                entries.push(signals.cleaned.clone());
            }
        }
        for (name, count) in &signals.intensity_hits {
            stats.intensity.add(name, *count);
        }
        for token in &signals.significant_tokens {
            stats.significant_words.add(token, 1);
        }
        for emoji in &signals.emoji_hits {
            stats.emojis.add(emoji, 1);
        }
        for (name, count) in &signals.emoji_class_hits {
            stats.emoji_categories.add(name, *count);
        }

        if !signals.cleaned.is_empty() && stats.samples.len() < samples_cap {
            stats.samples.push(signals.cleaned.clone());
        }
    }
}
