//! Structured chat message type.
//!
//! This module provides [`Message`], the parsed representation of one chat
//! record. The parser converts raw export text into these, and everything
//! downstream (category matching, scoring, aggregation) consumes them
//! read-only.
//!
//! # Overview
//!
//! A message consists of:
//! - **`timestamp`**: when the message was sent (always present; records
//!   without a parseable timestamp never become messages)
//! - **`sender`**: the raw sender name as written in the export
//! - **`content`**: full body text, including embedded newlines
//! - **`is_media`**: whether the body is a media placeholder
//!
//! # Examples
//!
//! ```
//! use chatpulse::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
//! let msg = Message::new("andrea", "besito mi amor", ts);
//! assert_eq!(msg.sender(), "andrea");
//! assert!(!msg.is_media());
//!
//! let media = Message::new("luz", "image omitted", ts);
//! assert!(media.is_media());
//! ```
//!
//! ## Serialization
//!
//! ```
//! use chatpulse::Message;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
//! let msg = Message::new("luz", "hola!", ts);
//! let json = serde_json::to_string(&msg)?;
//! let parsed: Message = serde_json::from_str(&json)?;
//!
//! assert_eq!(msg, parsed);
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder words that mark a record as a media message.
///
/// Matched as case-insensitive substrings of the body, the way chat exports
/// render removed attachments ("image omitted", "audio omitted", ...).
pub const MEDIA_MARKERS: [&str; 5] = ["image", "video", "omitted", "audio", "document"];

/// One parsed chat message.
///
/// Immutable once constructed. Media messages still count toward message
/// totals but are excluded from text analysis, so the flag is computed here,
/// once, instead of re-derived by every consumer.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `DateTime<Utc>` | When the message was sent |
/// | `sender` | `String` | Raw sender name from the export |
/// | `content` | `String` | Body text, newlines preserved |
/// | `is_media` | `bool` | Body contains a media placeholder word |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// Raw sender name as it appears in the export.
    ///
    /// Canonicalization (case-folding, alias mapping) happens at aggregation
    /// time, not here, so the parsed record stays faithful to the source.
    pub sender: String,

    /// Body text of the message.
    ///
    /// May contain newlines for multiline messages.
    pub content: String,

    /// Whether the body is a media placeholder ("video omitted" etc.).
    pub is_media: bool,
}

impl Message {
    /// Creates a message, deriving the media flag from the content.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatpulse::Message;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    /// let msg = Message::new("luz", "Video omitted", ts);
    /// assert!(msg.is_media());
    /// ```
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        let is_media = Self::detect_media(&content);
        Self {
            timestamp,
            sender: sender.into(),
            content,
            is_media,
        }
    }

    /// Returns `true` if the given body text contains a media marker.
    ///
    /// Substring containment, case-insensitive: exports embed the marker in
    /// locale-dependent phrasing, so exact-word matching would miss most of
    /// them.
    pub fn detect_media(content: &str) -> bool {
        let lower = content.to_lowercase();
        MEDIA_MARKERS.iter().any(|m| lower.contains(m))
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the raw sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the send timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns `true` if this message is a media placeholder.
    pub fn is_media(&self) -> bool {
        self.is_media
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns the calendar date of the message (UTC).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Returns the calendar year of the message (UTC).
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Returns `true` if this message's content is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}
