//! Terminal rendering for search results and dashboard statistics.
//!
//! Decisions print as vertical cards grouped into sections; distributions
//! print as labelled bars.

use fsclens_client::SearchResults;
use fsclens_core::decision::or_unknown;
use fsclens_core::format::{format_fine_amount_with_unit, group_thousands};
use fsclens_core::{DashboardSnapshot, DecisionKey, DecisionRecord, Distribution};

const BAR_WIDTH: usize = 30;
const SUMMARY_PREVIEW_CHARS: usize = 160;

// ── Search results ──

pub fn print_search_results(results: &SearchResults) {
    if results.is_empty() {
        println!("No decisions matched \"{}\".", results.query);
        return;
    }

    let summary = &results.summary;
    match results.total_found {
        Some(found) if found as usize > summary.total => {
            println!("{} results (showing {})", found, summary.total)
        }
        _ => println!("{} results", summary.total),
    }
    println!(
        "  sanctions {}  fines {}  total fines {}",
        summary.sanctions,
        summary.fines,
        format_fine_amount_with_unit(Some(summary.total_fine_amount))
    );
    if let Some(note) = &results.note {
        println!("  note: {note}");
    }
    println!();

    for record in &results.records {
        print_decision_card(record);
    }
}

/// Print one decision as a card.
pub fn print_decision_card(record: &DecisionRecord) {
    println!("=== {} ===", record.decision_number());
    println!("{}", or_unknown(record.title.as_deref()));
    println!();
    for (header, rows) in card_sections(record) {
        if rows.is_empty() {
            continue;
        }
        println!("{header}");
        for (label, value) in rows {
            println!("  {:<26} {}", label, value);
        }
        println!();
    }
}

type Section = (&'static str, Vec<(&'static str, String)>);

fn card_sections(record: &DecisionRecord) -> Vec<Section> {
    let classification = vec![
        ("category", category_label(record)),
        ("industry", or_unknown(record.industry_sector.as_deref()).to_string()),
        ("action", or_unknown(record.action_type.as_deref()).to_string()),
        ("fine", format_fine_amount_with_unit(record.fine_amount)),
    ];

    let mut subject = vec![("entity", or_unknown(record.entity_name.as_deref()).to_string())];
    if let Some(purpose) = record.stated_purpose.as_deref().filter(|s| !s.trim().is_empty()) {
        subject.push(("purpose", purpose.to_string()));
    }

    let mut dates = vec![("decision date", record.decision_date.to_string())];
    if let Some(effective) = record.effective_date.as_deref().filter(|s| !s.trim().is_empty()) {
        dates.push(("effective date", effective.to_string()));
    }

    let violation = record
        .violation_summary
        .as_deref()
        .or(record.violation_details.as_deref())
        .filter(|s| !s.trim().is_empty())
        .map(|text| vec![("summary", preview(text, SUMMARY_PREVIEW_CHARS))])
        .unwrap_or_default();

    vec![
        ("Classification", classification),
        ("Subject", subject),
        ("Dates", dates),
        ("Violation", violation),
    ]
}

fn category_label(record: &DecisionRecord) -> String {
    match (record.category_1.as_deref(), record.category_2.as_deref()) {
        (Some(c1), Some(c2)) => format!("{c1} / {c2}"),
        (c1, _) => or_unknown(c1).to_string(),
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

// ── Dashboard ──

pub fn print_dashboard(snapshot: &DashboardSnapshot) {
    let totals = &snapshot.totals;
    println!("=== Dashboard ===");
    println!("  {:<26} {}", "decisions", group_thousands(totals.decisions));
    println!("  {:<26} {}", "actions", group_thousands(totals.actions));
    println!("  {:<26} {}", "laws", group_thousands(totals.laws));
    println!(
        "  {:<26} {}",
        "total fines",
        format_fine_amount_with_unit(Some(totals.total_fine_amount))
    );
    println!();

    println!("Recent decisions");
    if snapshot.recent_decisions.is_empty() {
        println!("  (none)");
    }
    for record in &snapshot.recent_decisions {
        println!(
            "  {:<12} {:<14} {}",
            record.decision_number(),
            record.decision_date,
            or_unknown(record.title.as_deref())
        );
    }
    println!();

    print_distribution("Violation types", &snapshot.violation_stats);
    print_distribution("Industry sectors", &snapshot.industry_stats);
    print_distribution("Sanction types", &snapshot.sanction_types);

    if !snapshot.monthly_trends.is_empty() {
        println!("Monthly trends");
        for trend in &snapshot.monthly_trends {
            println!("  {:04}-{:02}  {}", trend.year, trend.month, trend.count);
        }
        println!();
    }
}

fn print_distribution(header: &str, dist: &Distribution) {
    if dist.from_backend {
        println!("{header}");
    } else {
        println!("{header} (no data from backend)");
    }
    if dist.is_empty() {
        println!("  (none)");
    }
    for bucket in &dist.buckets {
        println!(
            "  {:<20} {:>6} {:>4}% {}",
            bucket.label,
            bucket.count,
            bucket.percentage,
            bar(bucket.percentage)
        );
    }
    println!();
}

fn bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH + 50) / 100;
    "█".repeat(filled)
}

// ── Document links ──

pub fn print_links(key: DecisionKey, download: &str, companion: Option<&str>) {
    println!("=== {key} ===");
    println!("  {:<26} {}", "decision document", download);
    match companion {
        Some(url) => println!("  {:<26} {}", "enforcement notice", url),
        None => println!("  {:<26} (not available)", "enforcement notice"),
    }
}
