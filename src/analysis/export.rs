//! Visualization export.
//!
//! Flattens a [`Timeline`] into the JSON document the visualization
//! layer consumes: an ordered list of period entries plus a metadata
//! block listing every key a renderer may encounter, so charts can build
//! stable legends without scanning the whole timeline first.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::aggregate::{Granularity, SenderStats, Timeline};
use crate::error::Result;

/// Exported timeline plus chart metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDocument {
    /// Period entries in chronological order.
    pub timeline: Vec<PeriodEntry>,

    /// Key inventory for renderers.
    pub metadata: DocumentMetadata,
}

/// One calendar bucket in the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEntry {
    /// Bucket key: ISO date, week Monday, or `YYYY-MM`.
    pub period: String,

    /// Per-sender reports; every tracked sender appears, zeroed if
    /// silent this period.
    pub senders: BTreeMap<String, SenderReport>,
}

/// One sender's statistics for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderReport {
    /// Messages sent, media included.
    pub message_count: usize,

    /// Distinct days with at least one message.
    pub active_days: usize,

    /// Lexical category hit counts.
    pub word_categories: BTreeMap<String, usize>,

    /// Emoji class hit counts.
    pub emoji_categories: BTreeMap<String, usize>,

    /// Emotion-intensity marker counts.
    pub emotion_intensity: BTreeMap<String, usize>,

    /// Context samples per tracked relationship category.
    pub relationship_mentions: BTreeMap<String, Vec<String>>,

    /// Ranked significant words as `[word, count]` pairs.
    pub top_words: Vec<(String, usize)>,

    /// Ranked emojis as `[emoji, count]` pairs.
    pub top_emojis: Vec<(String, usize)>,

    /// Sample messages from this period.
    pub sample_messages: Vec<String>,
}

impl SenderReport {
    fn from_stats(stats: &SenderStats, granularity: Granularity) -> Self {
        Self {
            message_count: stats.message_count,
            active_days: stats.active_days.len(),
            word_categories: stats.word_categories.as_map(),
            emoji_categories: stats.emoji_categories.as_map(),
            emotion_intensity: stats.intensity.as_map(),
            relationship_mentions: stats.contexts.clone(),
            top_words: stats.significant_words.top(granularity.top_words_cap()),
            top_emojis: stats.emojis.top(Some(granularity.top_emojis_cap())),
            sample_messages: stats.samples.clone(),
        }
    }
}

/// Everything a renderer needs to lay out legends and axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Bucket resolution of the timeline.
    pub granularity: Granularity,

    /// All configured lexical category names.
    pub word_categories: Vec<String>,

    /// All emoji class names, the catch-all `other` included.
    pub emoji_categories: Vec<String>,

    /// Tracked senders in configured order.
    pub senders: Vec<String>,

    /// Categories that record context samples.
    pub relationship_categories: Vec<String>,
}

impl TimelineDocument {
    /// Flattens a timeline into export form.
    ///
    /// Every sender in `senders` appears in every period entry, zero
    /// statistics filled in for periods they sat out.
    #[must_use]
    pub fn build(timeline: &Timeline, metadata: DocumentMetadata, senders: &[String]) -> Self {
        let granularity = timeline.granularity();
        let empty = SenderStats::default();

        let entries = timeline
            .buckets()
            .iter()
            .map(|(period, bucket)| {
                let reports = senders
                    .iter()
                    .map(|sender| {
                        let stats = bucket.get(sender).unwrap_or(&empty);
                        (sender.clone(), SenderReport::from_stats(stats, granularity))
                    })
                    .collect();
                PeriodEntry {
                    period: period.clone(),
                    senders: reports,
                }
            })
            .collect();

        Self {
            timeline: entries,
            metadata,
        }
    }

    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ChatpulseError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document to a file as pretty-printed JSON.
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
