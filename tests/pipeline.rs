//! Integration tests for the full pipeline: parse, analyze, aggregate,
//! export.

use std::fs;

use chatpulse::prelude::*;

fn analyzer() -> Analyzer {
    Analyzer::new(&AnalysisConfig::default()).unwrap()
}

fn parse(chat: &str) -> Vec<Message> {
    ChatParser::new().parse_str(chat).into_messages()
}

fn export_daily(chat: &str) -> TimelineDocument {
    let a = analyzer();
    let timeline = a.aggregate(&parse(chat), Granularity::Daily);
    a.export(&timeline)
}

// ============================================================================
// Signal extraction through the whole pipeline
// ============================================================================

#[test]
fn test_besito_daily_end_to_end() {
    let doc = export_daily("[3/10/24, 9:16:11 AM] Andrea Vega Troncoso: un besito mi amor ❤️\n");

    assert_eq!(doc.timeline.len(), 1);
    let entry = &doc.timeline[0];
    assert_eq!(entry.period, "2024-03-10");

    let andrea = &entry.senders["andrea"];
    assert_eq!(andrea.message_count, 1);
    assert_eq!(andrea.active_days, 1);
    // one pattern match plus the affinity bonus
    assert_eq!(andrea.word_categories["besito"], 2);
    assert_eq!(andrea.word_categories["love_expressions"], 1);
    assert_eq!(andrea.emoji_categories["love"], 1);
    assert_eq!(andrea.emotion_intensity["high"], 0);
    assert_eq!(andrea.emotion_intensity["repetition"], 0);
    assert_eq!(
        andrea.top_words,
        vec![("besito".to_string(), 1), ("amor".to_string(), 1)]
    );
    assert_eq!(andrea.top_emojis, vec![("❤️".to_string(), 1)]);
    assert_eq!(andrea.sample_messages, vec!["un besito mi amor ❤️"]);

    // the silent partner is zero-filled, not missing
    let luz = &entry.senders["luz"];
    assert_eq!(luz.message_count, 0);
    assert_eq!(luz.active_days, 0);
    assert!(luz.top_words.is_empty());
}

#[test]
fn test_laughter_counted_raw_but_repetition_once() {
    let doc = export_daily("[3/10/24, 9:00:00 AM] Luz: jajajaja\n");
    let luz = &doc.timeline[0].senders["luz"];

    // the category counts every laugh burst the pattern finds
    assert_eq!(luz.word_categories["laughter"], 2);
    // the intensity detector counts the whole echoed run once
    assert_eq!(luz.emotion_intensity["repetition"], 1);
}

#[test]
fn test_multiline_message_flows_through() {
    let doc = export_daily(
        "[3/10/24, 9:00:00 AM] Luz: primera linea\nsegunda linea\n\
         [3/10/24, 9:05:00 AM] Andrea Vega Troncoso: ok\n",
    );
    let luz = &doc.timeline[0].senders["luz"];

    assert_eq!(luz.message_count, 1);
    assert_eq!(luz.sample_messages, vec!["primera linea\nsegunda linea"]);
}

// ============================================================================
// Filtering: system notices, senders, media, links
// ============================================================================

#[test]
fn test_system_notice_yields_no_messages() {
    let report = ChatParser::new().parse_str(
        "[3/10/24, 9:14:55 AM] Luz: Messages and calls are end-to-end encrypted. Tap to learn more.\n",
    );
    assert_eq!(report.message_count(), 0);
    assert_eq!(report.skipped_system, 1);
}

#[test]
fn test_untracked_sender_has_no_buckets() {
    let doc = export_daily("[3/10/24, 9:00:00 AM] Someone Else: hola hola\n");
    assert!(doc.timeline.is_empty());
}

#[test]
fn test_media_message_counts_without_signals() {
    let doc = export_daily("[3/10/24, 9:00:00 AM] Luz: image omitted\n");
    let luz = &doc.timeline[0].senders["luz"];

    assert_eq!(luz.message_count, 1);
    assert_eq!(luz.active_days, 1);
    assert!(luz.word_categories.is_empty());
    assert!(luz.emotion_intensity.is_empty());
    assert!(luz.sample_messages.is_empty());
}

#[test]
fn test_links_never_become_signals() {
    let doc = export_daily("[3/10/24, 9:00:00 AM] Luz: mira https://fotos.example/❤️album\n");
    let luz = &doc.timeline[0].senders["luz"];

    assert!(luz.emoji_categories.is_empty());
    assert!(luz.top_emojis.is_empty());
    assert!(luz.top_words.is_empty());
    assert_eq!(luz.sample_messages, vec!["mira"]);
}

#[test]
fn test_link_only_message_counts_without_signals() {
    let doc = export_daily("[3/10/24, 9:00:00 AM] Luz: https://example.com/a\n");
    let luz = &doc.timeline[0].senders["luz"];

    assert_eq!(luz.message_count, 1);
    assert!(luz.sample_messages.is_empty());
    assert!(luz.word_categories.is_empty());
}

// ============================================================================
// Bucketing
// ============================================================================

#[test]
fn test_weekly_buckets_key_on_monday() {
    let chat = "[1/15/24, 10:30:00 AM] Luz: hola\n\
                [1/17/24, 9:00:00 PM] Luz: otra vez\n";
    let a = analyzer();
    let timeline = a.aggregate(&parse(chat), Granularity::Weekly);
    let doc = a.export(&timeline);

    assert_eq!(doc.timeline.len(), 1);
    assert_eq!(doc.timeline[0].period, "2024-01-15");

    let luz = &doc.timeline[0].senders["luz"];
    assert_eq!(luz.message_count, 2);
    assert_eq!(luz.active_days, 2);
}

#[test]
fn test_monthly_buckets() {
    let chat = "[3/10/24, 10:30:00 AM] Luz: hola\n\
                [3/28/24, 9:00:00 PM] Luz: hola de nuevo\n\
                [4/2/24, 8:00:00 AM] Luz: ya es abril\n";
    let a = analyzer();
    let timeline = a.aggregate(&parse(chat), Granularity::Monthly);
    let doc = a.export(&timeline);

    let periods: Vec<&str> = doc.timeline.iter().map(|e| e.period.as_str()).collect();
    assert_eq!(periods, vec!["2024-03", "2024-04"]);
    assert_eq!(doc.timeline[0].senders["luz"].active_days, 2);
}

#[test]
fn test_message_count_conservation() {
    let chat = "[3/10/24, 9:14:55 AM] Luz: Messages and calls are end-to-end encrypted.\n\
                [3/10/24, 9:15:03 AM] Luz: hola bebe\n\
                [3/10/24, 9:16:11 AM] Andrea Vega Troncoso: un besito ❤️\n\
                [3/10/24, 9:20:02 AM] Andrea Vega Troncoso: image omitted\n\
                [3/11/24, 8:06:30 PM] Andrea Vega Troncoso: https://example.com/fotos\n\
                [4/2/24, 7:46:22 AM] Someone Else: hola intrusa\n";
    let messages = parse(chat);
    let a = analyzer();

    let tracked = messages
        .iter()
        .filter(|m| a.tracked_sender(m.sender()).is_some())
        .count();
    assert_eq!(tracked, 4);

    for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
        let timeline = a.aggregate(&messages, granularity);
        let total: usize = timeline
            .buckets()
            .values()
            .flat_map(|bucket| bucket.values())
            .map(|stats| stats.message_count)
            .sum();
        assert_eq!(total, tracked);
    }
}

// ============================================================================
// Export shape and determinism
// ============================================================================

#[test]
fn test_repeated_runs_are_byte_identical() {
    let chat = "[3/10/24, 9:15:03 AM] Luz: hola bebe como estas ❤️\n\
                [3/11/24, 9:16:11 AM] Andrea Vega Troncoso: un besito mi amor\n";
    let messages = parse(chat);
    let a = analyzer();

    let first = a
        .export(&a.aggregate(&messages, Granularity::Weekly))
        .to_json_pretty()
        .unwrap();
    let second = a
        .export(&a.aggregate(&messages, Granularity::Weekly))
        .to_json_pretty()
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_document_json_shape() {
    let doc = export_daily("[3/10/24, 9:16:11 AM] Luz: un besito\n");
    let value: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();

    assert_eq!(value["metadata"]["granularity"], "daily");
    assert!(value["metadata"]["word_categories"].is_array());
    assert!(value["metadata"]["relationship_categories"].is_array());
    assert_eq!(
        value["metadata"]["emoji_categories"]
            .as_array()
            .unwrap()
            .last()
            .unwrap(),
        "other"
    );

    let senders = &value["timeline"][0]["senders"];
    for sender in ["luz", "andrea"] {
        for key in [
            "message_count",
            "active_days",
            "word_categories",
            "emoji_categories",
            "emotion_intensity",
            "relationship_mentions",
            "top_words",
            "top_emojis",
            "sample_messages",
        ] {
            assert!(
                !senders[sender][key].is_null(),
                "missing {key} for {sender}"
            );
        }
    }
}

#[test]
fn test_overview_end_to_end() {
    let chat = "[3/10/24, 9:15:03 AM] Luz: un besito mi amor\n\
                [3/10/24, 9:20:02 AM] Andrea Vega Troncoso: jajaja ❤️😘\n\
                [3/11/24, 9:00:00 AM] Luz: video omitted\n";
    let report = analyzer().overview(&parse(chat));

    let besito = report
        .word_analysis
        .iter()
        .find(|w| w.word == "besito")
        .unwrap();
    assert_eq!(besito.frequency, 1);
    assert_eq!(besito.first_seen, "2024-03-10T09:15:03");

    assert_eq!(report.temporal_patterns.message_density["2024-03-10"], 2);
    assert_eq!(report.temporal_patterns.message_density["2024-03-11"], 1);
    assert_eq!(report.emoji_analysis.total_count, 2);
    assert_eq!(
        report.emoji_analysis.top_combinations,
        vec![("❤️😘".to_string(), 1)]
    );
}

// ============================================================================
// File round trips
// ============================================================================

#[test]
fn test_parse_file_and_write_documents() {
    let dir = tempfile::tempdir().unwrap();
    let chat_path = dir.path().join("_chat.txt");
    fs::write(
        &chat_path,
        "[3/10/24, 9:15:03 AM] Luz: un besito mi amor ❤️\n\
         [3/10/24, 9:16:11 AM] Andrea Vega Troncoso: jajaja te amo\n",
    )
    .unwrap();

    let report = ChatParser::new().parse_file(&chat_path).unwrap();
    assert_eq!(report.message_count(), 2);

    let a = analyzer();
    let doc = a.export(&a.aggregate(&report.messages, Granularity::Monthly));
    let out_path = dir.path().join("monthly_timeline.json");
    doc.write_file(&out_path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(value["metadata"]["granularity"], "monthly");
    assert_eq!(value["timeline"][0]["period"], "2024-03");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ChatParser::new()
        .parse_file(std::path::Path::new("does_not_exist.txt"))
        .unwrap_err();
    assert!(err.is_io());
}
