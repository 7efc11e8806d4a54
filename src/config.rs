//! Analysis configuration.
//!
//! Everything the matching engine knows about two particular people lives
//! here: the sender allow-list, lexical and emoji category tables,
//! significance weights, shorthand substitutions. The engine itself is
//! vocabulary-free; swap this config and it analyzes a different couple.
//!
//! Defaults carry a complete working vocabulary, and every field has a
//! serde default, so a JSON config only needs the fields it overrides:
//!
//! ```rust
//! use chatpulse::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json(r#"{"senders": ["sam", "alex"]}"#)?;
//! assert_eq!(config.senders, vec!["sam", "alex"]);
//! assert!(!config.word_categories.is_empty());
//! # Ok::<(), chatpulse::ChatpulseError>(())
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChatpulseError, Result};

/// A named lexical category matched by regex.
///
/// Patterns are matched case-insensitively against message content with
/// URLs already stripped. Category names five characters or shorter are
/// treated as people and get context samples recorded; longer names can
/// opt in via `track_context`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordCategory {
    /// Category name used as the counter key in output.
    pub name: String,

    /// Regex pattern counted per message (non-overlapping matches).
    pub pattern: String,

    /// Only match in messages from this calendar year onward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_from_year: Option<i32>,

    /// Record message content as context samples even if the name is
    /// longer than the people-name cutoff.
    #[serde(default)]
    pub track_context: bool,
}

impl WordCategory {
    /// Creates a category with no year gate and default context tracking.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            active_from_year: None,
            track_context: false,
        }
    }

    /// Ignores messages sent before the given calendar year.
    #[must_use]
    pub fn active_from(mut self, year: i32) -> Self {
        self.active_from_year = Some(year);
        self
    }

    /// Forces context-sample recording for this category.
    #[must_use]
    pub fn with_context(mut self) -> Self {
        self.track_context = true;
        self
    }
}

/// A named emoji class listing its member emoji literally.
///
/// Members are compared with any trailing variation selector (U+FE0F)
/// stripped, so `❤` and `❤️` land in the same class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiCategory {
    /// Category name used as the counter key in output.
    pub name: String,

    /// Member emoji, each a single (possibly multi-codepoint) symbol.
    pub emojis: Vec<String>,
}

impl EmojiCategory {
    /// Creates an emoji category from literal symbols.
    pub fn new<'a>(name: impl Into<String>, emojis: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            name: name.into(),
            emojis: emojis.into_iter().map(String::from).collect(),
        }
    }
}

/// A weighted significance pattern.
///
/// The scorer adds `weight × frequency` when the pattern matches the token
/// itself and a flat `weight` per context sample it matches in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPattern {
    /// Pattern-type name (for configuration readability; not exported).
    pub name: String,

    /// Regex matched against tokens and context samples.
    pub pattern: String,

    /// Integer weight added per match.
    pub weight: u32,
}

impl SignalPattern {
    /// Creates a weighted pattern.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            weight,
        }
    }
}

/// A named pattern with no weight, used for emotion-intensity markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedPattern {
    /// Counter key in output.
    pub name: String,

    /// Regex counted per message.
    pub pattern: String,
}

impl NamedPattern {
    /// Creates a named pattern.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// An ordered text substitution applied during normalization.
///
/// Substitutions are order-sensitive: later rules see the output of
/// earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    /// Regex matched case-insensitively.
    pub pattern: String,

    /// Replacement text (canonical token).
    pub replacement: String,
}

impl Substitution {
    /// Creates a substitution rule.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Grants one category an extra increment for messages from one sender,
/// independent of pattern matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffinityRule {
    /// Category receiving the bonus increment.
    pub category: String,

    /// Canonical sender the bonus applies to.
    pub sender: String,
}

impl AffinityRule {
    /// Creates an affinity rule.
    pub fn new(category: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            sender: sender.into(),
        }
    }
}

/// Token significance scoring knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificanceConfig {
    /// Weighted patterns matched against tokens and their contexts.
    #[serde(default = "default_signal_patterns")]
    pub patterns: Vec<SignalPattern>,

    /// Base weight multiplied by token frequency (default: 1).
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: u32,

    /// Tokens scoring above this are kept as significant (default: 3.0,
    /// strict comparison).
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// How many context samples the scorer inspects (default: 10).
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Score multiplier when the message matches the love category
    /// (default: 1.5).
    #[serde(default = "default_love_multiplier")]
    pub love_multiplier: f64,

    /// Score multiplier when the message matches the missing category
    /// (default: 1.3).
    #[serde(default = "default_missing_multiplier")]
    pub missing_multiplier: f64,

    /// Word category whose presence triggers the love multiplier.
    #[serde(default = "default_love_category")]
    pub love_category: String,

    /// Word category whose presence triggers the missing multiplier.
    #[serde(default = "default_missing_category")]
    pub missing_category: String,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self {
            patterns: default_signal_patterns(),
            frequency_weight: default_frequency_weight(),
            threshold: default_threshold(),
            context_window: default_context_window(),
            love_multiplier: default_love_multiplier(),
            missing_multiplier: default_missing_multiplier(),
            love_category: default_love_category(),
            missing_category: default_missing_category(),
        }
    }
}

/// Emotion-intensity marker patterns.
///
/// Counted per message alongside a built-in detector for stretched
/// spellings (repeated letters, echoed syllables). Every configured name
/// appears in output even at zero, so downstream charts get stable keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityConfig {
    /// Named marker patterns (default: a bilingual intensifier list
    /// under the key `high`).
    #[serde(default = "default_intensity_patterns")]
    pub patterns: Vec<NamedPattern>,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            patterns: default_intensity_patterns(),
        }
    }
}

/// Text normalization tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Ordered shorthand substitutions (laughter, elongations, slang).
    #[serde(default = "default_substitutions")]
    pub substitutions: Vec<Substitution>,

    /// Stopwords added on top of the built-in bilingual set.
    #[serde(default)]
    pub extra_stopwords: Vec<String>,

    /// Tokens discarded outright (media placeholder words).
    #[serde(default = "default_ignore_words")]
    pub ignore_words: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            substitutions: default_substitutions(),
            extra_stopwords: Vec::new(),
            ignore_words: default_ignore_words(),
        }
    }
}

/// Complete analysis configuration.
///
/// # Example
///
/// ```rust
/// use chatpulse::config::{AnalysisConfig, WordCategory};
///
/// let config = AnalysisConfig::new()
///     .with_senders(vec!["sam".into(), "alex".into()])
///     .with_word_categories(vec![WordCategory::new("greetings", "hola|hello")]);
///
/// assert_eq!(config.senders.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Canonical senders to track; messages from anyone else are dropped
    /// from analysis (default: `luz`, `andrea`).
    #[serde(default = "default_senders")]
    pub senders: Vec<String>,

    /// Raw sender name → canonical sender, compared case-insensitively.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,

    /// Lexical categories (people, emotions, relationship terms).
    #[serde(default = "default_word_categories")]
    pub word_categories: Vec<WordCategory>,

    /// Emoji classes; emoji outside every class count as `other`.
    #[serde(default = "default_emoji_categories")]
    pub emoji_categories: Vec<EmojiCategory>,

    /// Per-sender category bonuses (default: `besito` for `andrea`).
    #[serde(default = "default_affinities")]
    pub affinities: Vec<AffinityRule>,

    /// Token significance scoring.
    #[serde(default)]
    pub significance: SignificanceConfig,

    /// Emotion-intensity markers.
    #[serde(default)]
    pub intensity: IntensityConfig,

    /// Normalization tables.
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            senders: default_senders(),
            aliases: default_aliases(),
            word_categories: default_word_categories(),
            emoji_categories: default_emoji_categories(),
            affinities: default_affinities(),
            significance: SignificanceConfig::default(),
            intensity: IntensityConfig::default(),
            normalizer: NormalizerConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Creates a configuration with the default vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON string.
    ///
    /// Missing fields fall back to their defaults, nested fields included.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::Json`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::Io`] if the file cannot be read and
    /// [`ChatpulseError::Json`] on malformed JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes the configuration as pretty JSON, e.g. to dump the
    /// defaults as a starting point for a custom vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks structural soundness before pattern compilation.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidConfig`] when the sender list is
    /// empty or a category name is blank or duplicated.
    pub fn validate(&self) -> Result<()> {
        if self.senders.is_empty() {
            return Err(ChatpulseError::invalid_config("sender allow-list is empty"));
        }
        if self.senders.iter().any(|s| s.trim().is_empty()) {
            return Err(ChatpulseError::invalid_config("sender names must be non-empty"));
        }

        let mut seen = std::collections::BTreeSet::new();
        for category in &self.word_categories {
            if category.name.trim().is_empty() {
                return Err(ChatpulseError::invalid_config("word category with empty name"));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ChatpulseError::invalid_config(format!(
                    "duplicate word category '{}'",
                    category.name
                )));
            }
        }

        Ok(())
    }

    /// Replaces the sender allow-list.
    #[must_use]
    pub fn with_senders(mut self, senders: Vec<String>) -> Self {
        self.senders = senders;
        self
    }

    /// Replaces the alias map.
    #[must_use]
    pub fn with_aliases(mut self, aliases: BTreeMap<String, String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Replaces the lexical category table.
    #[must_use]
    pub fn with_word_categories(mut self, categories: Vec<WordCategory>) -> Self {
        self.word_categories = categories;
        self
    }

    /// Replaces the emoji category table.
    #[must_use]
    pub fn with_emoji_categories(mut self, categories: Vec<EmojiCategory>) -> Self {
        self.emoji_categories = categories;
        self
    }

    /// Replaces the affinity rules.
    #[must_use]
    pub fn with_affinities(mut self, affinities: Vec<AffinityRule>) -> Self {
        self.affinities = affinities;
        self
    }

    /// Replaces the significance scoring configuration.
    #[must_use]
    pub fn with_significance(mut self, significance: SignificanceConfig) -> Self {
        self.significance = significance;
        self
    }

    /// Replaces the intensity marker configuration.
    #[must_use]
    pub fn with_intensity(mut self, intensity: IntensityConfig) -> Self {
        self.intensity = intensity;
        self
    }

    /// Replaces the normalizer tables.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: NormalizerConfig) -> Self {
        self.normalizer = normalizer;
        self
    }
}

// =============================================================================
// Default vocabulary
// =============================================================================

fn default_senders() -> Vec<String> {
    vec!["luz".to_string(), "andrea".to_string()]
}

fn default_aliases() -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    aliases.insert("andrea vega troncoso".to_string(), "andrea".to_string());
    aliases
}

fn default_affinities() -> Vec<AffinityRule> {
    vec![AffinityRule::new("besito", "andrea")]
}

fn default_word_categories() -> Vec<WordCategory> {
    vec![
        // People
        WordCategory::new("mora", "mora+|michi|gatita|meow|purr|cat|gata"),
        WordCategory::new("clay", "clay").active_from(2024),
        WordCategory::new("pau", "pau(?:la)?"),
        WordCategory::new("sara", "sara"),
        WordCategory::new("eden", "eden"),
        WordCategory::new("gabo", "gabo"),
        WordCategory::new("jaime", "jaime"),
        WordCategory::new("isa", r"\b(?:isa|isabel)\b"),
        WordCategory::new("feli", "feli"),
        WordCategory::new("nara", "nara"),
        WordCategory::new("marie", r"\bmarie\b"),
        WordCategory::new("pipia", "pipia"),
        WordCategory::new("ana_valeria", r"ana\s*v(?:aleria)?").with_context(),
        WordCategory::new("stacy", "stacy"),
        WordCategory::new("trinity", "trinity"),
        WordCategory::new("marianna", "marianna"),
        WordCategory::new("parents", "mami|papi|mama|papa").with_context(),
        WordCategory::new("miranda", "miranda"),
        WordCategory::new("eloise", "eloise"),
        WordCategory::new("hayes", "hayes"),
        WordCategory::new("emily", "emily"),
        WordCategory::new("perry", "perry"),
        WordCategory::new("leslie", "leslie"),
        WordCategory::new("ana", r"\bana\b"),
        WordCategory::new("leila", "leila"),
        WordCategory::new("alex", "alex"),
        WordCategory::new("nina", "nina"),
        WordCategory::new("mariela", r"\bmariela\b"),
        // Relationship language
        WordCategory::new(
            "love_expressions",
            r"te\s*amo|tqm|love\s*you|te\s*quiero|amor|bebe|bb|beibi|corazon|mi\s*vida",
        ),
        WordCategory::new(
            "terms_of_endearment",
            "linda|hermosa|bonita|bella|linde|beba",
        ),
        WordCategory::new(
            "missing_each_other",
            r"miss\s*you|extrañ\w+|te\s*extraño|falta\w+|mishu",
        ),
        WordCategory::new("cuddles", r"acoruque|arrunchis|añoñ(?:o|ito)s?"),
        WordCategory::new("besito", "besito"),
        // Emotions
        WordCategory::new("happiness", "feliz|happy|content|glad|yay|excited|emocionad"),
        WordCategory::new("sadness", "sad|triste|crying|llor|miss"),
        WordCategory::new("worry", "worried|preocupad|concern|cuidado"),
        // Daily life
        WordCategory::new("home_life", "casa|home|depa|apartment|room|cuarto"),
        WordCategory::new("food", "comida|food|eat|comer|hungry|hambre"),
        WordCategory::new("sleep", "dormir|sleep|tired|cansad|mimir"),
        WordCategory::new("work", "work|trabajo|busy|ocupad"),
        WordCategory::new("bathroom", "pupa|cagando|poop(?:ing)?|💩"),
        WordCategory::new(
            "celebration",
            "birthday|cumpleaños|celebrate|celebr|party|fiesta",
        ),
        WordCategory::new("plans", "plan|weekend|meet|vernos|date"),
        // In-group language
        WordCategory::new("custom_expressions", "fronfis|proc|stroc|guchta"),
        WordCategory::new("laughter", "jaja+|haha+|lol|lmao"),
    ]
}

fn default_emoji_categories() -> Vec<EmojiCategory> {
    vec![
        EmojiCategory::new(
            "love",
            [
                "❤️", "🧡", "💛", "💚", "💙", "💜", "🖤", "🤍", "🤎", "💗", "💓", "💕", "💖",
                "💝", "💘", "💞", "💟",
            ],
        ),
        EmojiCategory::new(
            "affection",
            ["😘", "🥰", "😍", "☺️", "😊", "🤗", "💑", "💏"],
        ),
        EmojiCategory::new(
            "happiness",
            ["😀", "😃", "😄", "😁", "😆", "😅", "😂", "🤣", "🙂"],
        ),
        EmojiCategory::new("sadness", ["😢", "😭", "😥", "😔", "😞", "😟", "😩", "😫"]),
        EmojiCategory::new("tenderness", ["🥺"]),
        EmojiCategory::new("anger", ["😠", "😡", "🤬", "😤", "😾"]),
        EmojiCategory::new("surprise", ["😮", "😯", "😲", "😱", "🤯"]),
        EmojiCategory::new(
            "nature",
            ["🌺", "🌸", "🌼", "🌻", "🌹", "🌷", "🌿", "☘️", "🍀"],
        ),
        EmojiCategory::new(
            "celebration",
            ["🎉", "🎊", "🎈", "✨", "💫", "⭐️", "🌟"],
        ),
    ]
}

fn default_signal_patterns() -> Vec<SignalPattern> {
    vec![
        SignalPattern::new(
            "terms_of_endearment",
            "bebe|bb|amor|linda|hermosa|bonita|beibi|corazon|mi vida|cielo|princesa",
            5,
        ),
        SignalPattern::new("custom_expressions", "fronfis|proc|stroc|guchta", 4),
        SignalPattern::new("diminutives", r"\w+[it]a\b|\w+[it]o\b|\w+[it]e\b", 3),
        SignalPattern::new("intensifiers", "super|muy|tan|más|mucho", 2),
        SignalPattern::new(
            "emotional_markers",
            "te amo|te quiero|extraño|miss you|tqm|love|❤️|😘|🥰|💕|💗|💖",
            5,
        ),
        SignalPattern::new(
            "significant_people",
            "gabo|clay|pau(?:la)?|sara|eden|pipia|nara|marie|feli|isa|jaime|camila|mora",
            10,
        ),
    ]
}

fn default_intensity_patterns() -> Vec<NamedPattern> {
    vec![NamedPattern::new(
        "high",
        r"\b(?:super|muy|tan|más|mucho|really|so|such|totally)\b",
    )]
}

fn default_substitutions() -> Vec<Substitution> {
    vec![
        Substitution::new(r"\b(?:(?:ja|ha|je|he){2,}|lol|lmao)\b", "jaja"),
        Substitution::new(r"\baw+\b", "aw"),
        Substitution::new(r"\bsi+\b", "si"),
        Substitution::new(r"\bhola+\b", "hola"),
        Substitution::new(r"\bq\b", "que"),
        Substitution::new(r"\bu\b", "you"),
        Substitution::new(r"\bbb\b", "bebe"),
        Substitution::new(r"\bli+nd(?:a+|e+)\b", "linda"),
    ]
}

fn default_ignore_words() -> Vec<String> {
    ["image", "video", "omitted", "audio", "document"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_frequency_weight() -> u32 {
    1
}

fn default_threshold() -> f64 {
    3.0
}

fn default_context_window() -> usize {
    10
}

fn default_love_multiplier() -> f64 {
    1.5
}

fn default_missing_multiplier() -> f64 {
    1.3
}

fn default_love_category() -> String {
    "love_expressions".to_string()
}

fn default_missing_category() -> String {
    "missing_each_other".to_string()
}
