//! Token significance scoring.
//!
//! Each token starts from its frequency and earns weighted bonuses for
//! every signal pattern it or its usage contexts match. Messages that
//! carry love or missing language multiply the final score, so the words
//! inside them rank higher than the same words in neutral chatter.

use regex::Regex;

use crate::config::SignificanceConfig;
use crate::error::{ChatpulseError, Result};

/// Compiled significance scorer.
#[derive(Debug)]
pub struct SignificanceScorer {
    patterns: Vec<(Regex, f64)>,
    frequency_weight: f64,
    threshold: f64,
    context_window: usize,
    love_multiplier: f64,
    missing_multiplier: f64,
    love_category: String,
    missing_category: String,
}

impl SignificanceScorer {
    /// Compiles the signal patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ChatpulseError::InvalidPattern`] naming the offending
    /// pattern if any does not compile.
    pub fn new(config: &SignificanceConfig) -> Result<Self> {
        let mut patterns = Vec::with_capacity(config.patterns.len());
        for signal in &config.patterns {
            let regex = Regex::new(&format!("(?i){}", signal.pattern))
                .map_err(|e| ChatpulseError::invalid_pattern(&signal.name, e))?;
            patterns.push((regex, f64::from(signal.weight)));
        }

        Ok(Self {
            patterns,
            frequency_weight: f64::from(config.frequency_weight),
            threshold: config.threshold,
            context_window: config.context_window,
            love_multiplier: config.love_multiplier,
            missing_multiplier: config.missing_multiplier,
            love_category: config.love_category.clone(),
            missing_category: config.missing_category.clone(),
        })
    }

    /// Scores one token against its usage contexts.
    ///
    /// The base is `frequency * frequency_weight`. Each pattern that
    /// matches the token itself adds `weight * frequency`; each context
    /// sample it matches (up to the configured window) adds a flat
    /// `weight`.
    #[must_use]
    pub fn score(&self, token: &str, frequency: usize, samples: &[&str]) -> f64 {
        let frequency = frequency as f64;
        let mut score = frequency * self.frequency_weight;

        for (regex, weight) in &self.patterns {
            if regex.is_match(token) {
                score += weight * frequency;
            }
            for sample in samples.iter().take(self.context_window) {
                if regex.is_match(sample) {
                    score += weight;
                }
            }
        }

        score
    }

    /// Applies the emotional multipliers for the message the token came
    /// from. Both can stack.
    #[must_use]
    pub fn boosted(&self, score: f64, loves: bool, misses: bool) -> f64 {
        let mut score = score;
        if loves {
            score *= self.love_multiplier;
        }
        if misses {
            score *= self.missing_multiplier;
        }
        score
    }

    /// Whether a score clears the significance threshold (strictly
    /// above).
    #[must_use]
    pub fn is_significant(&self, score: f64) -> bool {
        score > self.threshold
    }

    /// Category name that triggers the love multiplier.
    #[must_use]
    pub fn love_category(&self) -> &str {
        &self.love_category
    }

    /// Category name that triggers the missing multiplier.
    #[must_use]
    pub fn missing_category(&self) -> &str {
        &self.missing_category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SignificanceScorer {
        SignificanceScorer::new(&SignificanceConfig::default()).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_plain_token_scores_frequency_only() {
        assert_eq!(scorer().score("mesa", 1, &[]), 1.0);
        assert_eq!(scorer().score("mesa", 4, &[]), 4.0);
    }

    #[test]
    fn test_diminutive_token_bonus() {
        // 1 (frequency) + 3 (diminutive shape)
        assert_eq!(scorer().score("carrito", 1, &[]), 4.0);
    }

    #[test]
    fn test_token_bonus_scales_with_frequency() {
        // 2 + 3 * 2
        assert_eq!(scorer().score("carrito", 2, &[]), 8.0);
    }

    #[test]
    fn test_context_samples_add_flat_weight() {
        let s = scorer();
        let score = s.score("besito", 1, &["besito mi amor ❤️"]);
        // 1 + 3 (diminutive token) + 5 (endearment in sample)
        // + 3 (diminutive in sample) + 5 (emotional marker in sample)
        assert_eq!(score, 17.0);
    }

    #[test]
    fn test_context_window_caps_samples() {
        let s = scorer();
        let sample = "mi amor";
        let many = vec![sample; 12];
        let ten = vec![sample; 10];
        assert_eq!(s.score("mesa", 1, &many), s.score("mesa", 1, &ten));
    }

    #[test]
    fn test_love_boost() {
        let s = scorer();
        assert_eq!(s.boosted(17.0, true, false), 25.5);
    }

    #[test]
    fn test_missing_boost() {
        let s = scorer();
        assert!(close(s.boosted(10.0, false, true), 13.0));
    }

    #[test]
    fn test_boosts_stack() {
        let s = scorer();
        assert!(close(s.boosted(10.0, true, true), 19.5));
    }

    #[test]
    fn test_threshold_is_strict() {
        let s = scorer();
        assert!(!s.is_significant(3.0));
        assert!(s.is_significant(3.0 + 1e-9));
        assert!(!s.is_significant(1.0));
        assert!(s.is_significant(25.5));
    }

    #[test]
    fn test_category_names() {
        let s = scorer();
        assert_eq!(s.love_category(), "love_expressions");
        assert_eq!(s.missing_category(), "missing_each_other");
    }

    #[test]
    fn test_invalid_signal_pattern() {
        let mut config = SignificanceConfig::default();
        config.patterns.push(crate::config::SignalPattern::new("bad", "(oops", 1));
        let err = SignificanceScorer::new(&config).unwrap_err();
        assert!(err.is_invalid_pattern());
        assert!(err.to_string().contains("bad"));
    }
}
