//! Chat export parser.
//!
//! Turns the raw text of a chat export into an ordered list of [`Message`]
//! records. Exports are line-oriented: a record starts with a bracketed
//! timestamp followed by `Sender:`, and its body runs until the next
//! timestamp line (multiline bodies are captured whole).
//!
//! Supported record shapes:
//! - US clock: `[1/15/24, 10:00:00 AM] andrea: besito mi amor`
//! - Day-first clock: `[15/01/2024, 22:30:05] luz: ya llegué`
//! - Date only: `[15/01/2024] luz: buenos días` (midnight assumed)
//!
//! System notices (the end-to-end-encryption banner and bracketed lines
//! with no `Sender:` part) never become records. Records whose timestamp
//! cannot be parsed are discarded together with their continuation lines;
//! parsing itself never fails on malformed content.
//!
//! # Example
//!
//! ```rust
//! use chatpulse::ChatParser;
//!
//! let raw = "[01/15/24, 10:00:00 AM] andrea: besito mi amor\n\
//!            sigo pensando en ti\n\
//!            [01/15/24, 10:02:11 AM] luz: yo tambien";
//!
//! let report = ChatParser::new().parse_str(raw);
//! assert_eq!(report.messages.len(), 2);
//! assert!(report.messages[0].content().contains("pensando"));
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::Message;
use crate::error::Result;

/// Default system-notice sentinel dropped from every export.
const ENCRYPTION_NOTICE: &str = "Messages and calls are end-to-end encrypted";

/// Timestamp layouts tried for each record, in order.
///
/// US twelve-hour layouts win ties on ambiguous dates like `05/03/24`,
/// so they are tried first; day-first layouts only see strings the US
/// layouts rejected (24-hour clocks carry no AM/PM marker).
#[derive(Debug, Clone, Copy, PartialEq)]
enum TimestampFormat {
    /// `M/D/YY, h:mm[:ss] AM` (two- or four-digit year)
    UsTwelveHour,
    /// `D/M/YYYY, HH:mm[:ss]` (two- or four-digit year)
    DayFirst,
}

impl TimestampFormat {
    /// All layouts in trial order.
    fn all() -> &'static [TimestampFormat] {
        &[TimestampFormat::UsTwelveHour, TimestampFormat::DayFirst]
    }

    /// Returns chrono parse strings for this layout.
    fn parse_formats(self) -> &'static [&'static str] {
        match self {
            TimestampFormat::UsTwelveHour => &[
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M %p",
            ],
            TimestampFormat::DayFirst => &[
                "%d/%m/%Y, %H:%M:%S",
                "%d/%m/%Y, %H:%M",
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%y, %H:%M",
            ],
        }
    }
}

/// Parses a bracketed timestamp string into a UTC datetime.
///
/// Tries every layout in [`TimestampFormat::all`] order, then falls back
/// to a bare `D/M/YYYY` date at midnight. Returns `None` when nothing
/// matches; the caller discards the record.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    for format in TimestampFormat::all() {
        for pattern in format.parse_formats() {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
                return Some(naive.and_utc());
            }
        }
    }

    // Date-only records map to midnight
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

/// Outcome of one parse run.
///
/// Parsing is lenient: bad records are counted and dropped instead of
/// failing the run, so callers can report how much of the export survived.
#[derive(Debug, Default, Clone)]
pub struct ParseReport {
    /// Parsed messages in source order.
    pub messages: Vec<Message>,

    /// Records dropped as system notices (encryption banner, bracketed
    /// lines without a sender).
    pub skipped_system: usize,

    /// Records dropped because their timestamp could not be parsed.
    pub skipped_invalid: usize,
}

impl ParseReport {
    /// Returns the number of parsed messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Consumes the report, returning just the messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Parser for bracketed-timestamp chat exports.
///
/// # Example
///
/// ```rust,no_run
/// use chatpulse::ChatParser;
///
/// let parser = ChatParser::new();
/// let report = parser.parse_file("chat_export.txt".as_ref())?;
/// println!("{} messages, {} skipped", report.message_count(), report.skipped_invalid);
/// # Ok::<(), chatpulse::ChatpulseError>(())
/// ```
pub struct ChatParser {
    record_start: Regex,
    timestamp_prefix: Regex,
    system_sentinels: Vec<String>,
}

impl ChatParser {
    /// Creates a parser with the default system-notice sentinel.
    pub fn new() -> Self {
        Self {
            // [timestamp] sender: body
            record_start: Regex::new(
                r"(?i)^\[(\d{1,2}/\d{1,2}/\d{2,4}(?:,?\s*\d{1,2}:\d{2}(?::\d{2})?(?:\s*[AP]M)?)?)\]\s*([^:]+):\s?(.*)$",
            )
            .unwrap(),
            // Bracketed timestamp with no sender part
            timestamp_prefix: Regex::new(r"^\[\d{1,2}/\d{1,2}/\d{2,4}").unwrap(),
            system_sentinels: vec![ENCRYPTION_NOTICE.to_string()],
        }
    }

    /// Adds a system-notice sentinel; lines containing it are dropped.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.system_sentinels.push(sentinel.into());
        self
    }

    /// Parses a chat export file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read. Malformed content
    /// never errors; it is counted in the returned [`ParseReport`].
    pub fn parse_file(&self, path: &Path) -> Result<ParseReport> {
        let content = fs::read_to_string(path)?;
        Ok(self.parse_str(&content))
    }

    /// Parses chat export content from a string.
    pub fn parse_str(&self, content: &str) -> ParseReport {
        let mut report = ParseReport::default();
        // (timestamp, sender, body) of the record still collecting lines
        let mut pending: Option<(DateTime<Utc>, String, String)> = None;
        // True while discarding continuation lines of a dropped record
        let mut discarding = false;

        for raw_line in content.lines() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

            if self.is_system_notice(line) {
                report.skipped_system += 1;
                continue;
            }

            if let Some(caps) = self.record_start.captures(line) {
                Self::flush(&mut pending, &mut report.messages);

                let sender = caps.get(2).map_or("", |m| m.as_str()).trim();
                let body = caps.get(3).map_or("", |m| m.as_str());

                match parse_timestamp(caps.get(1).map_or("", |m| m.as_str())) {
                    Some(ts) if !sender.is_empty() => {
                        pending = Some((ts, sender.to_string(), body.to_string()));
                        discarding = false;
                    }
                    Some(_) => {
                        report.skipped_system += 1;
                        discarding = true;
                    }
                    None => {
                        report.skipped_invalid += 1;
                        discarding = true;
                    }
                }
            } else if self.timestamp_prefix.is_match(line) {
                // Timestamp-shaped line that never reached "sender:",
                // e.g. call notices. Dropped with its continuations.
                Self::flush(&mut pending, &mut report.messages);
                report.skipped_system += 1;
                discarding = true;
            } else if !line.trim().is_empty() && !discarding {
                // Continuation of the record currently being collected;
                // orphan lines before the first record are dropped.
                if let Some((_, _, body)) = pending.as_mut() {
                    body.push('\n');
                    body.push_str(line);
                }
            }
        }

        Self::flush(&mut pending, &mut report.messages);
        report
    }

    fn is_system_notice(&self, line: &str) -> bool {
        self.system_sentinels.iter().any(|s| line.contains(s.as_str()))
    }

    /// Finalizes the record being collected, computing its media flag on
    /// the complete body.
    fn flush(pending: &mut Option<(DateTime<Utc>, String, String)>, messages: &mut Vec<Message>) {
        if let Some((ts, sender, body)) = pending.take() {
            messages.push(Message::new(sender, body.trim(), ts));
        }
    }
}

impl Default for ChatParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn parse(raw: &str) -> ParseReport {
        ChatParser::new().parse_str(raw)
    }

    #[test]
    fn test_basic_us_format() {
        let report = parse(
            "[01/15/24, 10:00:00 AM] andrea: besito mi amor\n\
             [01/15/24, 10:02:11 AM] luz: yo tambien te amo",
        );
        assert_eq!(report.messages.len(), 2);
        assert_eq!(report.messages[0].sender(), "andrea");
        assert_eq!(report.messages[0].content(), "besito mi amor");
        assert_eq!(report.messages[0].timestamp().year(), 2024);
        assert_eq!(report.messages[0].timestamp().hour(), 10);
        assert_eq!(report.messages[1].sender(), "luz");
    }

    #[test]
    fn test_pm_clock() {
        let report = parse("[01/15/24, 10:00:00 PM] luz: buenas noches");
        assert_eq!(report.messages[0].timestamp().hour(), 22);
    }

    #[test]
    fn test_day_first_fallback() {
        let report = parse("[15/01/2024, 22:30:05] luz: ya llegué");
        let msg = &report.messages[0];
        assert_eq!(msg.timestamp().month(), 1);
        assert_eq!(msg.timestamp().day(), 15);
        assert_eq!(msg.timestamp().hour(), 22);
    }

    #[test]
    fn test_date_only_maps_to_midnight() {
        let report = parse("[15/01/2024] luz: buenos días");
        let msg = &report.messages[0];
        assert_eq!(msg.timestamp().day(), 15);
        assert_eq!(msg.timestamp().hour(), 0);
    }

    #[test]
    fn test_ambiguous_date_prefers_us_when_twelve_hour() {
        // 05/03 with an AM marker reads as May 3, not March 5
        let report = parse("[05/03/24, 9:15:00 AM] luz: hola");
        assert_eq!(report.messages[0].timestamp().month(), 5);
    }

    #[test]
    fn test_multiline_body_captured_whole() {
        let report = parse(
            "[01/15/24, 10:00:00 AM] andrea: primera linea\n\
             segunda linea\n\
             tercera linea\n\
             [01/15/24, 10:05:00 AM] luz: ok",
        );
        assert_eq!(report.messages.len(), 2);
        assert_eq!(
            report.messages[0].content(),
            "primera linea\nsegunda linea\ntercera linea"
        );
    }

    #[test]
    fn test_encryption_notice_dropped() {
        let report = parse(
            "[01/15/24, 9:59:00 AM] luz: Messages and calls are end-to-end encrypted. \
             No one outside of this chat can read them.\n\
             [01/15/24, 10:00:00 AM] andrea: hola",
        );
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].sender(), "andrea");
        assert_eq!(report.skipped_system, 1);
    }

    #[test]
    fn test_bracketed_line_without_sender_dropped() {
        let report = parse(
            "[01/15/24, 10:00:00 AM] missed voice call\n\
             this line belongs to the dropped record\n\
             [01/15/24, 10:05:00 AM] luz: hola",
        );
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].content(), "hola");
        assert_eq!(report.skipped_system, 1);
    }

    #[test]
    fn test_malformed_timestamp_skipped_with_continuations() {
        let report = parse(
            "[99/99/99, 10:00:00 AM] luz: registro roto\n\
             continuacion del registro roto\n\
             [01/15/24, 10:05:00 AM] andrea: este si",
        );
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].sender(), "andrea");
        assert_eq!(report.messages[0].content(), "este si");
        assert_eq!(report.skipped_invalid, 1);
    }

    #[test]
    fn test_orphan_leading_lines_dropped() {
        let report = parse("texto suelto sin registro\n[01/15/24, 10:00:00 AM] luz: hola");
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].content(), "hola");
    }

    #[test]
    fn test_crlf_line_endings() {
        let report =
            parse("[01/15/24, 10:00:00 AM] luz: hola\r\n[01/15/24, 10:01:00 AM] andrea: hey\r\n");
        assert_eq!(report.messages.len(), 2);
        assert_eq!(report.messages[0].content(), "hola");
    }

    #[test]
    fn test_empty_input() {
        let report = parse("");
        assert!(report.messages.is_empty());
        assert_eq!(report.skipped_system, 0);
        assert_eq!(report.skipped_invalid, 0);
    }

    #[test]
    fn test_sender_whitespace_trimmed() {
        let report = parse("[01/15/24, 10:00:00 AM]   andrea  : hola");
        assert_eq!(report.messages[0].sender(), "andrea");
    }

    #[test]
    fn test_media_flag_set_at_finalize() {
        let report = parse(
            "[01/15/24, 10:00:00 AM] luz: mira esto\n\
             video omitted\n\
             [01/15/24, 10:01:00 AM] andrea: jaja",
        );
        assert!(report.messages[0].is_media());
        assert!(!report.messages[1].is_media());
    }

    #[test]
    fn test_body_with_colons_preserved() {
        let report = parse("[01/15/24, 10:00:00 AM] luz: hora: 10:30 te parece?");
        assert_eq!(report.messages[0].content(), "hora: 10:30 te parece?");
    }

    #[test]
    fn test_custom_sentinel() {
        let parser = ChatParser::new().with_sentinel("changed the group description");
        let report = parser.parse_str(
            "[01/15/24, 10:00:00 AM] luz changed the group description\n\
             [01/15/24, 10:01:00 AM] luz: hola",
        );
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.skipped_system, 1);
    }

    #[test]
    fn test_into_messages() {
        let report = parse("[01/15/24, 10:00:00 AM] luz: hola");
        let messages = report.into_messages();
        assert_eq!(messages.len(), 1);
    }
}
