//! Corpus-wide overview report.
//!
//! One pass over the whole history: every token's corpus frequency and
//! significance score, activity rhythms by hour, weekday, and day, and
//! the emoji profile. Unlike the timelines, nothing here is bucketed and
//! no emotional multipliers apply; scores reflect the corpus alone.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::TallyCounter;
use super::matcher::CategoryMatcher;
use super::score::SignificanceScorer;
use crate::error::Result;
use crate::message::Message;
use crate::normalize::Normalizer;

/// How many ranked words the report keeps.
const WORD_LIMIT: usize = 100;

/// How many usage contexts are stored per word for scoring.
const USAGES_KEPT: usize = 10;

/// How many usage contexts the report shows per word.
const CONTEXTS_SHOWN: usize = 3;

/// How many emoji combinations the report keeps.
const COMBINATION_LIMIT: usize = 10;

/// Timestamp format for first/last sightings.
const SEEN_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Corpus-wide statistics across all senders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewReport {
    /// Most significant words, highest score first.
    pub word_analysis: Vec<WordInsight>,

    /// Activity rhythms.
    pub temporal_patterns: TemporalPatterns,

    /// Emoji usage profile.
    pub emoji_analysis: EmojiAnalysis,
}

/// One scored word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordInsight {
    pub word: String,

    /// Corpus-wide occurrence count.
    pub frequency: usize,

    /// Significance score, no emotional multipliers.
    pub significance: f64,

    /// First sighting, `YYYY-MM-DDTHH:MM:SS`.
    pub first_seen: String,

    /// Last sighting, same format.
    pub last_seen: String,

    /// Up to three usage contexts, lowercased and link-stripped.
    pub sample_contexts: Vec<String>,
}

/// When messages happen, media included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalPatterns {
    /// Message count per hour of day (0-23).
    pub hourly_activity: BTreeMap<u32, usize>,

    /// Message count per weekday name.
    pub weekday_activity: BTreeMap<String, usize>,

    /// Message count per calendar day.
    pub message_density: BTreeMap<String, usize>,
}

/// Emoji usage across the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiAnalysis {
    /// Every emoji occurrence.
    pub total_count: usize,

    /// Occurrences per emoji class, `other` included.
    pub by_category: BTreeMap<String, usize>,

    /// Occurrences per individual emoji.
    pub individual_counts: BTreeMap<String, usize>,

    /// Most frequent multi-emoji sequences as `[combo, count]` pairs.
    pub top_combinations: Vec<(String, usize)>,
}

struct WordAccum {
    word: String,
    count: usize,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    usages: Vec<String>,
}

impl OverviewReport {
    pub(crate) fn build(
        messages: &[Message],
        normalizer: &Normalizer,
        matcher: &CategoryMatcher,
        scorer: &SignificanceScorer,
    ) -> Self {
        let mut words: Vec<WordAccum> = Vec::new();
        let mut word_index: HashMap<String, usize> = HashMap::new();

        let mut hourly: BTreeMap<u32, usize> = BTreeMap::new();
        let mut weekdays: BTreeMap<String, usize> = BTreeMap::new();
        let mut density: BTreeMap<String, usize> = BTreeMap::new();

        let mut emoji_total = 0;
        let mut emoji_classes = TallyCounter::default();
        let mut emoji_counts = TallyCounter::default();
        let mut combinations = TallyCounter::default();

        for message in messages {
            let timestamp = message.timestamp();
            *hourly.entry(timestamp.hour()).or_default() += 1;
            *weekdays.entry(timestamp.format("%A").to_string()).or_default() += 1;
            *density
                .entry(message.date().format("%Y-%m-%d").to_string())
                .or_default() += 1;

            if message.is_media() {
                continue;
            }

            let stripped = normalizer.strip_links(message.content());
            let lowered = stripped.to_lowercase();

            for token in normalizer.tokens(message.content()) {
                let slot = *word_index.entry(token.clone()).or_insert_with(|| {
                    words.push(WordAccum {
                        word: token.clone(),
                        count: 0,
                        first_seen: timestamp,
                        last_seen: timestamp,
                        usages: Vec::new(),
                    });
                    words.len() - 1
                });
                let accum = &mut words[slot];
                accum.count += 1;
                accum.first_seen = accum.first_seen.min(timestamp);
                accum.last_seen = accum.last_seen.max(timestamp);
                if accum.usages.len() < USAGES_KEPT {
                    accum.usages.push(lowered.clone());
                }
            }

            let emojis = matcher.scan_emojis(&stripped);
            if emojis.is_empty() {
                continue;
            }
            emoji_total += emojis.len();
            for emoji in &emojis {
                emoji_counts.add(emoji, 1);
                let class = matcher.emoji_class(emoji).unwrap_or("other");
                emoji_classes.add(class, 1);
            }
            if emojis.len() > 1 {
                combinations.add(&emojis.concat(), 1);
            }
        }

        let mut word_analysis: Vec<WordInsight> = words
            .iter()
            .map(|accum| {
                let usages: Vec<&str> = accum.usages.iter().map(String::as_str).collect();
                WordInsight {
                    word: accum.word.clone(),
                    frequency: accum.count,
                    significance: scorer.score(&accum.word, accum.count, &usages),
                    first_seen: accum.first_seen.format(SEEN_FORMAT).to_string(),
                    last_seen: accum.last_seen.format(SEEN_FORMAT).to_string(),
                    sample_contexts: accum.usages.iter().take(CONTEXTS_SHOWN).cloned().collect(),
                }
            })
            .collect();
        word_analysis.sort_by(|a, b| {
            b.significance
                .partial_cmp(&a.significance)
                .unwrap_or(Ordering::Equal)
        });
        word_analysis.truncate(WORD_LIMIT);

        Self {
            word_analysis,
            temporal_patterns: TemporalPatterns {
                hourly_activity: hourly,
                weekday_activity: weekdays,
                message_density: density,
            },
            emoji_analysis: EmojiAnalysis {
                total_count: emoji_total,
                by_category: emoji_classes.as_map(),
                individual_counts: emoji_counts.as_map(),
                top_combinations: combinations.top(Some(COMBINATION_LIMIT)),
            },
        }
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ChatpulseError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report to a file as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ChatpulseError::Io`] if the file cannot be
    /// written.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
