/// Human-readable rendering of ingestion results
///
/// Pure formatting: the counts are shown exactly as the remote job reported them.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::domain::IngestionResult;

/// Maximum number of errors listed in a summary
pub const MAX_REPORTED_ERRORS: usize = 5;

const RULE_WIDTH: usize = 80;

/// Entries sorted by count descending, ties broken by name
pub fn ranked(counts: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Format an integer with comma thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Render an ingestion result as a printable report
pub fn render_summary(result: &IngestionResult) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "📊 INGESTION SUMMARY");
    let _ = writeln!(out, "{}", rule);

    if result.success {
        let summary = &result.summary;
        let stats = &result.abgr_stats;

        let _ = writeln!(out, "\n✅ Status: SUCCESS");
        let _ = writeln!(out, "⏱️  Duration: {} ms", group_thousands(summary.duration_ms));
        let _ = writeln!(out, "\n📚 Articles:");
        let _ = writeln!(out, "   Total in XML:    {:>6}", summary.total_articles);
        let _ = writeln!(out, "   Transformed:     {:>6}", summary.transformed);
        let _ = writeln!(out, "   Skipped:         {:>6}", summary.skipped);
        let _ = writeln!(out, "   Ingested:        {:>6}", summary.ingested);
        let _ = writeln!(out, "   Succeeded:       {:>6}", summary.succeeded);
        let _ = writeln!(out, "   Failed:          {:>6}", summary.failed);

        if summary.abgr_filtered {
            let _ = writeln!(out, "\n🎯 ABGR Filter: ENABLED (only ABGR-relevant articles)");
        }

        let _ = writeln!(out, "\n🤖 ABGR Statistics:");
        let _ = writeln!(out, "   Relevant Articles: {}", stats.relevant);

        if !stats.categories.is_empty() {
            let _ = writeln!(out, "\n   Categories:");
            for (category, count) in ranked(&stats.categories) {
                let _ = writeln!(out, "      {:20} {:>4}", category, count);
            }
        }

        if !stats.agent_types.is_empty() {
            let _ = writeln!(out, "\n   Agent Types:");
            for (agent_type, count) in ranked(&stats.agent_types) {
                let _ = writeln!(out, "      {:30} {:>4}", agent_type, count);
            }
        }

        if !result.errors.is_empty() {
            let _ = writeln!(out, "\n⚠️  Errors (showing first {}):", MAX_REPORTED_ERRORS);
            for error in result.errors.iter().take(MAX_REPORTED_ERRORS) {
                let _ = writeln!(out, "   • {}", error);
            }
        }

        let _ = writeln!(
            out,
            "\n💬 Message: {}",
            result.message.as_deref().unwrap_or("N/A")
        );
    } else {
        let _ = writeln!(out, "\n❌ Status: FAILED");
        let _ = writeln!(
            out,
            "💬 Error: {}",
            result.error.as_deref().unwrap_or("Unknown error")
        );
        if let Some(message) = &result.message {
            let _ = writeln!(out, "   {}", message);
        }
    }

    let _ = write!(out, "\n{}", rule);
    out
}
