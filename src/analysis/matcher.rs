//! Unified category matcher.
//!
//! One compiled matcher serves every granularity, so daily, weekly, and
//! monthly aggregation cannot drift apart. It evaluates a message's
//! lowercased, URL-stripped content against the lexical category table,
//! the emoji class table, the intensity markers, and the per-sender
//! affinity rules.

use std::collections::HashSet;

use regex::Regex;

use crate::config::AnalysisConfig;
use crate::error::{ChatpulseError, Result};

/// Category names this long or shorter are treated as people and get
/// context samples recorded.
const CONTEXT_NAME_CUTOFF: usize = 5;

/// Inclusive codepoint ranges scanned for emoji.
const EMOJI_RANGES: [(char, char); 3] = [
    ('\u{1F300}', '\u{1F9FF}'),
    ('\u{2600}', '\u{26FF}'),
    ('\u{2700}', '\u{27BF}'),
];

/// Variation selector that turns a base symbol into its emoji form.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// One matched lexical category in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryHit {
    /// Category name.
    pub name: String,

    /// Non-overlapping match count in the message.
    pub count: usize,

    /// Whether a context sample should be recorded for this category.
    pub track_context: bool,
}

#[derive(Debug)]
struct CompiledCategory {
    name: String,
    regex: Regex,
    active_from_year: Option<i32>,
    track_context: bool,
}

impl CompiledCategory {
    fn active_in(&self, year: i32) -> bool {
        self.active_from_year.is_none_or(|from| year >= from)
    }
}

/// Compiled matcher over all category tables.
#[derive(Debug)]
pub struct CategoryMatcher {
    categories: Vec<CompiledCategory>,
    emoji_classes: Vec<(String, HashSet<String>)>,
    intensity: Vec<(String, Regex)>,
    affinities: Vec<(String, String)>,
}

impl CategoryMatcher {
    /// Compiles all category and marker patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidPattern`] naming the offending
    /// category if any pattern does not compile.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let mut categories = Vec::with_capacity(config.word_categories.len());
        for category in &config.word_categories {
            let regex = compile(&category.name, &category.pattern)?;
            let track_context =
                category.track_context || category.name.chars().count() <= CONTEXT_NAME_CUTOFF;
            categories.push(CompiledCategory {
                name: category.name.clone(),
                regex,
                active_from_year: category.active_from_year,
                track_context,
            });
        }

        let emoji_classes = config
            .emoji_categories
            .iter()
            .map(|class| {
                let members = class.emojis.iter().map(|e| strip_variation(e)).collect();
                (class.name.clone(), members)
            })
            .collect();

        let mut intensity = Vec::with_capacity(config.intensity.patterns.len());
        for marker in &config.intensity.patterns {
            intensity.push((marker.name.clone(), compile(&marker.name, &marker.pattern)?));
        }

        let affinities = config
            .affinities
            .iter()
            .map(|rule| (rule.category.clone(), rule.sender.clone()))
            .collect();

        Ok(Self {
            categories,
            emoji_classes,
            intensity,
            affinities,
        })
    }

    /// Counts category matches in lowercased, URL-stripped content.
    ///
    /// Only categories with at least one match (and whose year gate admits
    /// the message) are returned, in table order.
    pub fn match_categories(&self, content: &str, year: i32) -> Vec<CategoryHit> {
        self.categories
            .iter()
            .filter(|category| category.active_in(year))
            .filter_map(|category| {
                let count = category.regex.find_iter(content).count();
                (count > 0).then(|| CategoryHit {
                    name: category.name.clone(),
                    count,
                    track_context: category.track_context,
                })
            })
            .collect()
    }

    /// Returns categories owed an affinity bonus for this message.
    ///
    /// A bonus applies when the message comes from the rule's sender and
    /// the category's own pattern matches the content, on top of the
    /// standard match count.
    pub fn affinity_bonuses(&self, sender: &str, content: &str, year: i32) -> Vec<String> {
        self.affinities
            .iter()
            .filter(|(_, rule_sender)| rule_sender == sender)
            .filter_map(|(category_name, _)| {
                self.categories
                    .iter()
                    .find(|c| c.name == *category_name)
                    .filter(|c| c.active_in(year) && c.regex.is_match(content))
                    .map(|c| c.name.clone())
            })
            .collect()
    }

    /// Counts intensity markers in the content.
    ///
    /// Every configured marker appears in the result, zero counts
    /// included, followed by the built-in `repetition` detector.
    pub fn intensity(&self, content: &str) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = self
            .intensity
            .iter()
            .map(|(name, regex)| (name.clone(), regex.find_iter(content).count()))
            .collect();
        counts.push(("repetition".to_string(), repetition_hits(content)));
        counts
    }

    /// Scans content for emoji, in order, duplicates preserved.
    ///
    /// A trailing variation selector is absorbed into the emoji it
    /// modifies, so the tally key matches what the sender typed.
    pub fn scan_emojis(&self, content: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut chars = content.chars().peekable();
        while let Some(c) = chars.next() {
            if is_emoji_char(c) {
                let mut emoji = String::from(c);
                if chars.peek() == Some(&VARIATION_SELECTOR) {
                    emoji.push(VARIATION_SELECTOR);
                    chars.next();
                }
                found.push(emoji);
            }
        }
        found
    }

    /// Returns the class an emoji belongs to, if any.
    ///
    /// Comparison ignores the variation selector on both sides.
    pub fn emoji_class(&self, emoji: &str) -> Option<&str> {
        let bare = strip_variation(emoji);
        self.emoji_classes
            .iter()
            .find(|(_, members)| members.contains(&bare))
            .map(|(name, _)| name.as_str())
    }

    /// All lexical category names in table order.
    #[must_use]
    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// All emoji class names in table order, without the catch-all.
    #[must_use]
    pub fn emoji_class_names(&self) -> Vec<String> {
        self.emoji_classes.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Names of categories that record context samples, in table order.
    #[must_use]
    pub fn context_category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| c.track_context)
            .map(|c| c.name.clone())
            .collect()
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){pattern}"))
        .map_err(|e| ChatpulseError::invalid_pattern(name, e))
}

fn is_emoji_char(c: char) -> bool {
    EMOJI_RANGES.iter().any(|&(lo, hi)| c >= lo && c <= hi)
}

fn strip_variation(emoji: &str) -> String {
    emoji.chars().filter(|&c| c != VARIATION_SELECTOR).collect()
}

/// Counts stretched-spelling runs: an immediately echoed group of two to
/// four word characters ending in a vowel ("jajaja", "lalala", "aaaa").
///
/// Each maximal run counts once, however long the echo.
fn repetition_hits(content: &str) -> usize {
    let chars: Vec<char> = content.chars().collect();
    let n = chars.len();
    let mut hits = 0;
    let mut i = 0;

    while i < n {
        let mut consumed = 0;
        for len in (2..=4).rev() {
            if i + 2 * len > n {
                continue;
            }
            let chunk = &chars[i..i + len];
            let echoes = chunk.iter().all(|c| c.is_alphanumeric())
                && matches!(chunk[len - 1], 'a' | 'e' | 'i' | 'o' | 'u')
                && chars[i + len..i + 2 * len] == *chunk;
            if echoes {
                let mut end = i + 2 * len;
                while end + len <= n && chars[end..end + len] == *chunk {
                    end += len;
                }
                hits += 1;
                consumed = end - i;
                break;
            }
        }
        i += if consumed > 0 { consumed } else { 1 };
    }

    hits
}
