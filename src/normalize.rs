//! Text normalization and tokenization.
//!
//! Turns a raw message body into the token stream the significance scorer
//! consumes. Steps run in a fixed order: strip URLs, collapse shorthand
//! and stretched spellings to canonical tokens, lowercase, split into
//! alphanumeric word units, drop stopwords and media placeholder words,
//! reduce each survivor to a base form. Duplicates are preserved because
//! frequency matters downstream.
//!
//! All state is built at construction; every method is pure.
//!
//! # Example
//!
//! ```rust
//! use chatpulse::config::NormalizerConfig;
//! use chatpulse::normalize::Normalizer;
//!
//! let normalizer = Normalizer::new(&NormalizerConfig::default())?;
//! let tokens = normalizer.tokens("besito mi amor ❤️");
//! assert_eq!(tokens, vec!["besito", "amor"]);
//! # Ok::<(), chatpulse::ChatpulseError>(())
//! ```

use std::collections::HashSet;

use regex::Regex;

use crate::config::NormalizerConfig;
use crate::error::{ChatpulseError, Result};

/// Built-in bilingual stopword set (Spanish + English).
///
/// Single-letter entries cover contraction fragments left behind by
/// alphanumeric splitting ("don't" tokenizes as `don`, `t`).
const STOPWORDS: &[&str] = &[
    // Spanish
    "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las", "por", "un", "para",
    "con", "no", "una", "su", "al", "lo", "como", "más", "pero", "sus", "le", "ya", "o", "este",
    "sí", "si", "porque", "esta", "entre", "cuando", "muy", "sin", "sobre", "también", "me",
    "hasta", "hay", "donde", "quien", "desde", "todo", "nos", "durante", "todos", "uno", "les",
    "ni", "contra", "otros", "ese", "eso", "ante", "ellos", "e", "esto", "mí", "antes",
    "algunos", "qué", "unos", "yo", "otro", "otras", "otra", "él", "tanto", "esa", "estos",
    "mucho", "quienes", "nada", "muchos", "cual", "poco", "ella", "estar", "estas", "algunas",
    "algo", "nosotros", "mi", "mis", "tú", "te", "ti", "tu", "tus", "ellas", "os", "mío", "mía",
    "tuyo", "tuya", "suyo", "suya", "nuestro", "nuestra", "esos", "esas", "estoy", "estás",
    "está", "estamos", "están", "esté", "estés", "estaba", "estabas", "estaban", "estuve",
    "estuvo", "soy", "eres", "es", "somos", "son", "sea", "seas", "sean", "seré", "será",
    "sería", "era", "eras", "eran", "fui", "fuiste", "fue", "fuimos", "fueron", "he", "has",
    "ha", "hemos", "han", "haya", "había", "habías", "habían", "hube", "hubo", "tengo",
    "tienes", "tiene", "tenemos", "tienen", "tenga", "tenía", "tenías", "tenían", "tuve",
    "tuvo", "pues", "ser", "son",
    // English
    "i", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours", "yourself",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "these", "those",
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "had", "having", "do",
    "does", "did", "doing", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "before", "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off",
    "over", "under", "again", "further", "then", "once", "here", "there", "when", "where",
    "why", "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "re", "ve", "ain", "aren", "couldn",
    "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn", "shan",
    "shouldn", "wasn", "weren", "won", "wouldn", "him", "his", "he",
];

/// Tokens that are URL debris rather than words, skipped during
/// tokenization so link fragments never score as significant.
const URL_FRAGMENTS: &[&str] = &[
    "https", "http", "www", "com", "org", "net", "edu", "gov", "mil", "biz", "info", "io",
    "co", "uk", "us",
];

/// Text normalizer with compiled substitution rules.
///
/// Construction compiles every substitution pattern; an invalid pattern is
/// a configuration error, reported before any message is processed.
#[derive(Debug)]
pub struct Normalizer {
    link_pattern: Regex,
    substitutions: Vec<(Regex, String)>,
    stopwords: HashSet<String>,
    ignore_words: HashSet<String>,
}

impl Normalizer {
    /// Builds a normalizer from configuration tables.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidPattern`] if a substitution pattern
    /// does not compile.
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        let link_pattern = Regex::new(r"http\S+").unwrap();

        let mut substitutions = Vec::with_capacity(config.substitutions.len());
        for rule in &config.substitutions {
            let regex = Regex::new(&format!("(?i){}", rule.pattern)).map_err(|e| {
                ChatpulseError::invalid_pattern(format!("substitution '{}'", rule.pattern), e)
            })?;
            substitutions.push((regex, rule.replacement.clone()));
        }

        let mut stopwords: HashSet<String> = STOPWORDS.iter().map(|s| (*s).to_string()).collect();
        stopwords.extend(config.extra_stopwords.iter().map(|s| s.to_lowercase()));

        let ignore_words = config.ignore_words.iter().map(|s| s.to_lowercase()).collect();

        Ok(Self {
            link_pattern,
            substitutions,
            stopwords,
            ignore_words,
        })
    }

    /// Removes embedded URLs from a message body.
    ///
    /// Case is preserved; the result is what context samples store.
    pub fn strip_links(&self, text: &str) -> String {
        self.link_pattern.replace_all(text, "").into_owned()
    }

    /// Normalizes a message body into scoring tokens.
    ///
    /// Duplicates are preserved in source order. Stopwords, media
    /// placeholder words, and URL fragments never appear in the output.
    pub fn tokens(&self, content: &str) -> Vec<String> {
        let mut text = self.strip_links(content);
        for (regex, replacement) in &self.substitutions {
            text = regex.replace_all(&text, replacement.as_str()).into_owned();
        }
        let text = text.to_lowercase();

        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .filter(|token| !self.stopwords.contains(*token))
            .filter(|token| !self.ignore_words.contains(*token))
            .filter(|token| !URL_FRAGMENTS.contains(token))
            .map(lemma)
            .collect()
    }
}

/// Reduces a token to a base form.
///
/// A light suffix stripper that is safe on both Spanish and English
/// plurals: `besitos` → `besito`, `flores` → `flor`, `babies` → `baby`.
/// Short tokens pass through untouched.
fn lemma(token: &str) -> String {
    let len = token.chars().count();
    if len < 4 {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    if len > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{stem}y");
        }
        if let Some(stem) = token.strip_suffix("es") {
            if stem.ends_with(['r', 'n', 'l', 'x', 'z']) {
                return stem.to_string();
            }
        }
    }
    if token.ends_with('s') && !token.ends_with("ss") {
        if let Some(stem) = token.strip_suffix('s') {
            return stem.to_string();
        }
    }

    token.to_string()
}
