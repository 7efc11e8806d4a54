//! Behavioral signal extraction and aggregation.
//!
//! The [`Analyzer`] ties the pipeline together: it canonicalizes senders,
//! extracts per-message signals through the normalizer, the category
//! matcher, and the significance scorer, folds them into a bucketed
//! [`Timeline`], and exports visualization documents.
//!
//! # Example
//!
//! ```
//! use chatpulse::{AnalysisConfig, Analyzer, ChatParser, Granularity};
//!
//! # fn main() -> chatpulse::Result<()> {
//! let chat = "[3/10/24, 9:15:03 AM] Luz: un besito mi amor ❤️\n";
//! let report = ChatParser::new().parse_str(chat);
//!
//! let analyzer = Analyzer::new(&AnalysisConfig::default())?;
//! let timeline = analyzer.aggregate(&report.messages, Granularity::Daily);
//! let document = analyzer.export(&timeline);
//!
//! assert_eq!(document.timeline.len(), 1);
//! assert_eq!(document.timeline[0].senders["luz"].message_count, 1);
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod export;
mod matcher;
mod overview;
mod score;

pub use aggregate::{Granularity, SenderStats, TallyCounter, Timeline};
pub use export::{DocumentMetadata, PeriodEntry, SenderReport, TimelineDocument};
pub use matcher::{CategoryHit, CategoryMatcher};
pub use overview::{EmojiAnalysis, OverviewReport, TemporalPatterns, WordInsight};
pub use score::SignificanceScorer;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::message::Message;
use crate::normalize::Normalizer;

/// Signals extracted from one message of a tracked sender.
///
/// Media and link-only messages yield counting-only signals: the sender
/// and date are set, everything else is empty.
#[derive(Debug, Clone)]
pub struct MessageSignals {
    /// Canonical sender name.
    pub sender: String,

    /// Calendar day of the message.
    pub date: NaiveDate,

    /// Link-stripped content in original case, empty for media.
    pub cleaned: String,

    /// Matched lexical categories with counts, affinity bonuses applied.
    pub category_hits: Vec<(String, usize)>,

    /// Categories recording this message as a context sample.
    pub context_categories: Vec<String>,

    /// Intensity marker counts, zeros included.
    pub intensity_hits: Vec<(String, usize)>,

    /// Tokens that cleared the significance threshold, one entry per
    /// occurrence.
    pub significant_tokens: Vec<String>,

    /// Emojis in order of appearance.
    pub emoji_hits: Vec<String>,

    /// Emoji class counts, `other` included.
    pub emoji_class_hits: Vec<(String, usize)>,
}

impl MessageSignals {
    fn counting_only(sender: String, date: NaiveDate) -> Self {
        Self {
            sender,
            date,
            cleaned: String::new(),
            category_hits: Vec::new(),
            context_categories: Vec::new(),
            intensity_hits: Vec::new(),
            significant_tokens: Vec::new(),
            emoji_hits: Vec::new(),
            emoji_class_hits: Vec::new(),
        }
    }
}

/// Compiled analysis pipeline for one configuration.
#[derive(Debug)]
pub struct Analyzer {
    senders: Vec<String>,
    aliases: HashMap<String, String>,
    normalizer: Normalizer,
    matcher: CategoryMatcher,
    scorer: SignificanceScorer,
}

impl Analyzer {
    /// Validates the configuration and compiles every pattern table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ChatpulseError::InvalidConfig`] for a rejected
    /// configuration and [`crate::ChatpulseError::InvalidPattern`] for a
    /// pattern that does not compile.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let senders: Vec<String> = config
            .senders
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();
        let aliases = config
            .aliases
            .iter()
            .map(|(alias, canonical)| {
                (alias.trim().to_lowercase(), canonical.trim().to_lowercase())
            })
            .collect();

        Ok(Self {
            senders,
            aliases,
            normalizer: Normalizer::new(&config.normalizer)?,
            matcher: CategoryMatcher::new(config)?,
            scorer: SignificanceScorer::new(&config.significance)?,
        })
    }

    /// Tracked senders in configured order, lowercased.
    #[must_use]
    pub fn senders(&self) -> &[String] {
        &self.senders
    }

    /// Resolves a raw sender name to its canonical tracked form.
    ///
    /// Returns `None` for senders outside the allow-list, which excludes
    /// them from every report.
    #[must_use]
    pub fn tracked_sender(&self, raw: &str) -> Option<String> {
        let lowered = raw.trim().to_lowercase();
        let canonical = self.aliases.get(&lowered).cloned().unwrap_or(lowered);
        self.senders.contains(&canonical).then_some(canonical)
    }

    /// Extracts the signals a message contributes to its bucket.
    ///
    /// Returns `None` for untracked senders. Media and link-only
    /// messages produce counting-only signals so message counts and
    /// active days stay complete.
    #[must_use]
    pub fn signals(&self, message: &Message) -> Option<MessageSignals> {
        let sender = self.tracked_sender(message.sender())?;
        let date = message.date();

        if message.is_media() {
            return Some(MessageSignals::counting_only(sender, date));
        }

        let cleaned = self.normalizer.strip_links(message.content());
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Some(MessageSignals::counting_only(sender, date));
        }

        let lowered = cleaned.to_lowercase();
        let year = message.year();

        let hits = self.matcher.match_categories(&lowered, year);
        let mut category_hits: Vec<(String, usize)> =
            hits.iter().map(|h| (h.name.clone(), h.count)).collect();
        let context_categories: Vec<String> = hits
            .iter()
            .filter(|h| h.track_context)
            .map(|h| h.name.clone())
            .collect();

        for bonus in self.matcher.affinity_bonuses(&sender, &lowered, year) {
            if let Some(entry) = category_hits.iter_mut().find(|(name, _)| *name == bonus) {
                entry.1 += 1;
            }
        }

        let intensity_hits = self.matcher.intensity(&lowered);

        let loves = hits.iter().any(|h| h.name == self.scorer.love_category());
        let misses = hits.iter().any(|h| h.name == self.scorer.missing_category());

        let mut significant_tokens = Vec::new();
        for token in self.normalizer.tokens(message.content()) {
            let base = self.scorer.score(&token, 1, &[&lowered]);
            if self.scorer.is_significant(self.scorer.boosted(base, loves, misses)) {
                significant_tokens.push(token);
            }
        }

        let emoji_hits = self.matcher.scan_emojis(cleaned);
        let mut emoji_class_hits: Vec<(String, usize)> = Vec::new();
        for emoji in &emoji_hits {
            let class = self.matcher.emoji_class(emoji).unwrap_or("other");
            match emoji_class_hits.iter_mut().find(|(name, _)| name == class) {
                Some(entry) => entry.1 += 1,
                None => emoji_class_hits.push((class.to_string(), 1)),
            }
        }

        Some(MessageSignals {
            sender,
            date,
            cleaned: cleaned.to_string(),
            category_hits,
            context_categories,
            intensity_hits,
            significant_tokens,
            emoji_hits,
            emoji_class_hits,
        })
    }

    /// Folds all messages into a timeline at the given granularity.
    ///
    /// Messages from untracked senders are skipped.
    #[must_use]
    pub fn aggregate(&self, messages: &[Message], granularity: Granularity) -> Timeline {
        let mut timeline = Timeline::new(granularity);
        for message in messages {
            if let Some(signals) = self.signals(message) {
                timeline.fold(&signals);
            }
        }
        timeline
    }

    /// Exports a timeline as a visualization document.
    #[must_use]
    pub fn export(&self, timeline: &Timeline) -> TimelineDocument {
        let mut emoji_categories = self.matcher.emoji_class_names();
        emoji_categories.push("other".to_string());

        let metadata = DocumentMetadata {
            granularity: timeline.granularity(),
            word_categories: self.matcher.category_names(),
            emoji_categories,
            senders: self.senders.clone(),
            relationship_categories: self.matcher.context_category_names(),
        };

        TimelineDocument::build(timeline, metadata, &self.senders)
    }

    /// Builds the corpus-wide overview across all senders.
    #[must_use]
    pub fn overview(&self, messages: &[Message]) -> OverviewReport {
        OverviewReport::build(messages, &self.normalizer, &self.matcher, &self.scorer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn analyzer() -> Analyzer {
        Analyzer::new(&AnalysisConfig::default()).unwrap()
    }

    fn message(sender: &str, content: &str) -> Message {
        let ts = Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap();
        Message::new(sender, content, ts)
    }

    fn hit(signals: &MessageSignals, name: &str) -> Option<usize> {
        signals
            .category_hits
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
    }

    #[test]
    fn test_sender_canonicalization() {
        let a = analyzer();
        assert_eq!(a.tracked_sender(" LUZ "), Some("luz".to_string()));
        assert_eq!(
            a.tracked_sender("Andrea Vega Troncoso"),
            Some("andrea".to_string())
        );
        assert_eq!(a.tracked_sender("Unknown Person"), None);
    }

    #[test]
    fn test_besito_signals() {
        let a = analyzer();
        let signals = a
            .signals(&message("Andrea Vega Troncoso", "un besito mi amor ❤️"))
            .unwrap();

        assert_eq!(signals.sender, "andrea");
        // 1 pattern match + 1 affinity bonus for andrea
        assert_eq!(hit(&signals, "besito"), Some(2));
        assert_eq!(hit(&signals, "love_expressions"), Some(1));
        assert_eq!(signals.significant_tokens, vec!["besito", "amor"]);
        assert_eq!(signals.emoji_hits, vec!["❤️"]);
        assert_eq!(signals.emoji_class_hits, vec![("love".to_string(), 1)]);
        assert_eq!(
            signals.intensity_hits,
            vec![("high".to_string(), 0), ("repetition".to_string(), 0)]
        );
    }

    #[test]
    fn test_no_affinity_for_other_sender() {
        let a = analyzer();
        let signals = a.signals(&message("luz", "un besito mi amor")).unwrap();
        assert_eq!(hit(&signals, "besito"), Some(1));
    }

    #[test]
    fn test_untracked_sender_yields_nothing() {
        let a = analyzer();
        assert!(a.signals(&message("Unknown Person", "besito")).is_none());

        let timeline = a.aggregate(
            &[message("Unknown Person", "besito")],
            Granularity::Daily,
        );
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_media_message_counts_only() {
        let a = analyzer();
        let signals = a.signals(&message("luz", "image omitted")).unwrap();
        assert!(signals.cleaned.is_empty());
        assert!(signals.category_hits.is_empty());
        assert!(signals.intensity_hits.is_empty());
        assert!(signals.emoji_hits.is_empty());
    }

    #[test]
    fn test_link_only_message_counts_only() {
        let a = analyzer();
        let signals = a
            .signals(&message("luz", "https://example.com/album"))
            .unwrap();
        assert!(signals.cleaned.is_empty());
        assert!(signals.significant_tokens.is_empty());
    }

    #[test]
    fn test_context_categories_follow_tracking() {
        let a = analyzer();
        let signals = a.signals(&message("luz", "hoy vi a pau")).unwrap();
        assert_eq!(signals.context_categories, vec!["pau"]);
    }

    #[test]
    fn test_aggregate_and_export_zero_fill() {
        let a = analyzer();
        let messages = vec![
            message("luz", "un besito"),
            message("luz", "jajaja que risa"),
        ];
        let timeline = a.aggregate(&messages, Granularity::Daily);
        let document = a.export(&timeline);

        assert_eq!(document.timeline.len(), 1);
        let entry = &document.timeline[0];
        assert_eq!(entry.senders["luz"].message_count, 2);
        assert_eq!(entry.senders["andrea"].message_count, 0);
    }

    #[test]
    fn test_export_metadata() {
        let a = analyzer();
        let timeline = a.aggregate(&[message("luz", "hola")], Granularity::Weekly);
        let document = a.export(&timeline);

        let metadata = &document.metadata;
        assert_eq!(metadata.granularity, Granularity::Weekly);
        assert_eq!(metadata.senders, vec!["luz", "andrea"]);
        assert_eq!(metadata.emoji_categories.last().map(String::as_str), Some("other"));
        assert!(metadata.word_categories.contains(&"besito".to_string()));
        assert!(metadata.relationship_categories.contains(&"pau".to_string()));
        assert!(!metadata.relationship_categories.contains(&"love_expressions".to_string()));
    }

    #[test]
    fn test_overview_runs_over_all_senders() {
        let a = analyzer();
        let report = a.overview(&[
            message("luz", "besito"),
            message("Unknown Person", "besito"),
        ]);

        let besito = report
            .word_analysis
            .iter()
            .find(|w| w.word == "besito")
            .unwrap();
        assert_eq!(besito.frequency, 2);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalysisConfig::default().with_senders(Vec::new());
        assert!(Analyzer::new(&config).unwrap_err().is_invalid_config());
    }
}
