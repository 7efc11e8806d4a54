//! # chatpulse CLI
//!
//! Command-line interface for the chatpulse library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatpulse::cli::Args;
use chatpulse::{AnalysisConfig, Analyzer, ChatParser, ChatpulseError, ParseReport};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatpulseError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.mode.default_output().to_string());

    // Print header
    println!("💬 chatpulse v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("💾 Output:  {}", output_path);
    println!("📊 Mode:    {}", args.mode);

    // Load configuration, then apply CLI overrides
    let mut config = match args.config {
        Some(ref path) => {
            println!("⚙️  Config:  {}", path);
            AnalysisConfig::from_path(Path::new(path))?
        }
        None => AnalysisConfig::default(),
    };
    if !args.senders.is_empty() {
        config = config.with_senders(args.senders.clone());
    }
    println!("👤 Senders: {}", config.senders.join(", "));
    println!();

    // Step 1: Parse
    println!("⏳ Parsing chat export...");
    let parse_start = Instant::now();
    let report = ChatParser::new().parse_file(Path::new(&args.input))?;
    println!(
        "   Found {} messages ({:.2}s)",
        report.message_count(),
        parse_start.elapsed().as_secs_f64()
    );
    if report.skipped_system > 0 {
        println!("   Skipped {} system records", report.skipped_system);
    }
    if report.skipped_invalid > 0 {
        println!("   Skipped {} malformed records", report.skipped_invalid);
    }
    print_date_range(&report);
    print_senders_seen(&report);

    // Step 2: Analyze and write
    let analyzer = Analyzer::new(&config)?;
    println!();
    match args.mode.granularity() {
        Some(granularity) => {
            println!("🔎 Building {} timeline...", granularity);
            let aggregate_start = Instant::now();
            let timeline = analyzer.aggregate(&report.messages, granularity);
            println!(
                "   {} periods with activity ({:.2}s)",
                timeline.bucket_count(),
                aggregate_start.elapsed().as_secs_f64()
            );
            analyzer.export(&timeline).write_file(Path::new(&output_path))?;
        }
        None => {
            println!("🔎 Building overview report...");
            let overview_start = Instant::now();
            let overview = analyzer.overview(&report.messages);
            println!(
                "   {} ranked words, {} emojis ({:.2}s)",
                overview.word_analysis.len(),
                overview.emoji_analysis.total_count,
                overview_start.elapsed().as_secs_f64()
            );
            overview.write_file(Path::new(&output_path))?;
        }
    }

    println!();
    println!("✅ Done! Output saved to {}", output_path);
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

/// Prints the first and last message dates, when there are any.
fn print_date_range(report: &ParseReport) {
    if let (Some(first), Some(last)) = (report.messages.first(), report.messages.last()) {
        println!(
            "   Date range: {} to {}",
            first.timestamp().format("%Y-%m-%d"),
            last.timestamp().format("%Y-%m-%d")
        );
    }
}

/// Prints per-sender message counts in first-appearance order, so dropped
/// untracked senders stay visible in the summary.
fn print_senders_seen(report: &ParseReport) {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for message in &report.messages {
        let name = message.sender().trim().to_lowercase();
        match counts.iter_mut().find(|(seen, _)| *seen == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }
    if counts.is_empty() {
        return;
    }
    let summary: Vec<String> = counts
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect();
    println!("   Senders seen: {}", summary.join(", "));
}
