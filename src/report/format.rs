//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::Valuation;
use crate::io::ingest::HistoricalTable;

/// Format the full run report (window, metrics, decisions, assessment).
pub fn format_analysis(run: &RunOutput, table: &HistoricalTable) -> String {
    let mut out = String::new();

    out.push_str("=== srs - SR3-SR1 Structure Analyzer ===\n");
    out.push_str(&format!("Structure: {}\n", run.structure));
    out.push_str(&format!(
        "Analysis period: {} to {}\n",
        run.window.start, run.window.end
    ));
    out.push_str(&format!(
        "Rows: {} used of {} read | points in window: {}\n",
        table.rows_used,
        table.rows_read,
        run.windowed.len()
    ));
    if !table.row_errors.is_empty() {
        out.push_str(&format!(
            "({} rows/cells dropped during load)\n",
            table.row_errors.len()
        ));
    }

    match &run.stats {
        Some(stats) => {
            out.push_str("\nKey metrics:\n");
            out.push_str(&format!("- Current: {:.4}\n", stats.current));
            out.push_str(&format!("- Z-Score: {}\n", fmt_z(stats.z_score)));
            out.push_str(&format!(
                "- Mean: {:.4} | Median: {:.4} | Std Dev: \u{00b1}{:.4}\n",
                stats.mean, stats.median, stats.std_dev
            ));
            out.push_str(&format!("- Range: [{:.4}, {:.4}]\n", stats.min, stats.max));
        }
        None => {
            out.push_str("\nNo observations within the analysis window.\n");
        }
    }

    out.push_str("\nFed rate decisions:\n");
    if run.events.is_empty() {
        out.push_str("- none detected in window\n");
    }
    for event in &run.events {
        out.push_str(&format!(
            "- {}  rate {:.2}%  change {:+.2}%\n",
            event.date, event.level, event.delta
        ));
    }

    if let (Some(stats), Some(valuation)) = (&run.stats, &run.valuation) {
        out.push_str("\nValue assessment:\n");
        out.push_str(&format_assessment(*valuation, stats.z_score));
        out.push('\n');
    }

    if let Some(note) = &run.fetch_note {
        out.push_str(&format!("\nnote: {note}\n"));
    }

    out
}

/// One-line value assessment, matching the classification bands.
pub fn format_assessment(valuation: Valuation, z_score: f64) -> String {
    match valuation {
        Valuation::Rich => format!(
            "{}: structure is trading {:.1} standard deviations above mean.",
            valuation.display_name(),
            z_score.abs()
        ),
        Valuation::Cheap => format!(
            "{}: structure is trading {:.1} standard deviations below mean.",
            valuation.display_name(),
            z_score.abs()
        ),
        Valuation::Fair => {
            if z_score.is_nan() {
                format!(
                    "{}: not enough variation in window to score (Z-Score n/a).",
                    valuation.display_name()
                )
            } else {
                format!(
                    "{}: structure is trading within normal range ({:.1} std dev from mean).",
                    valuation.display_name(),
                    z_score
                )
            }
        }
    }
}

/// List the selectable structures of a loaded sheet.
pub fn format_structure_list(table: &HistoricalTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} structure column(s), {} rows:\n",
        table.structure_names().len(),
        table.rows_used
    ));
    for name in table.structure_names() {
        let n = table.series(name).map(|s| s.len()).unwrap_or(0);
        out.push_str(&format!("- {name} ({n} observations)\n"));
    }
    out
}

fn fmt_z(z: f64) -> String {
    if z.is_nan() {
        "n/a (degenerate window)".to_string()
    } else {
        format!("{z:.2}")
    }
}
