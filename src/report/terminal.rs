use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{ClassifiedRecord, Verdict};

/// Render a colored terminal report.
pub fn render(rows: &[ClassifiedRecord], output: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = rows.len();
    let likely_count = count(rows, Verdict::Likely);
    let unlikely_count = count(rows, Verdict::Unlikely);
    let unscored_count = count(rows, Verdict::Unscored);
    let failed_count = count(rows, Verdict::Failed);

    if quiet {
        println!(
            "Total: {}  OT/ICS: {}  Not OT/ICS: {}  Unscored: {}  Failed: {}",
            total,
            likely_count.to_string().green(),
            unlikely_count.to_string().yellow(),
            unscored_count.to_string().magenta(),
            failed_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "ot-classifier".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Results written to: {}\n", output.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total software     : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  OT/ICS (3-5)    : {:>4}", "●".green(), likely_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Not OT/ICS (0-2): {:>4}", "○".yellow(), unlikely_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unscored        : {:>4}", "?".magenta(), unscored_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Failed          : {:>4}", "✗".red(), failed_count)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if likely_count > 0 {
        println!(" {} Likely OT/ICS software:\n", "[OT/ICS]".green().bold());
        render_table(rows, &[Verdict::Likely]);
        println!();
    }

    if unscored_count > 0 {
        println!(" {} Replies without a usable scale:\n", "[UNSCORED]".magenta().bold());
        render_table(rows, &[Verdict::Unscored]);
        println!();
    }

    if failed_count > 0 {
        println!(" {} Unparseable model replies:\n", "[FAILED]".red().bold());
        render_table(rows, &[Verdict::Failed]);
        println!();
    }

    if verbose && unlikely_count > 0 {
        println!(" {} Not OT/ICS:\n", "[OTHER]".yellow().bold());
        render_table(rows, &[Verdict::Unlikely]);
        println!();
    }

    Ok(())
}

fn count(rows: &[ClassifiedRecord], verdict: Verdict) -> usize {
    rows.iter().filter(|r| r.verdict() == verdict).count()
}

fn render_table(rows: &[ClassifiedRecord], verdicts: &[Verdict]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Scale").add_attribute(Attribute::Bold),
            Cell::new("Caption").add_attribute(Attribute::Bold),
            Cell::new("Vendor").add_attribute(Attribute::Bold),
            Cell::new("Brief").add_attribute(Attribute::Bold),
        ]);

    for row in rows.iter().filter(|r| verdicts.contains(&r.verdict())) {
        table.add_row(vec![
            Cell::new(&row.scale)
                .fg(scale_color(row))
                .set_alignment(CellAlignment::Center),
            Cell::new(&row.caption),
            Cell::new(&row.vendor),
            Cell::new(&row.brief),
        ]);
    }

    println!("{}", table);
}

fn scale_color(row: &ClassifiedRecord) -> Color {
    match (row.verdict(), row.scale.as_score()) {
        (Verdict::Failed, _) => Color::DarkGrey,
        (Verdict::Unscored, _) | (_, None) => Color::Magenta,
        (_, Some(0..=1)) => Color::Green,
        (_, Some(2)) => Color::Yellow,
        (_, Some(3)) => Color::DarkYellow,
        (_, Some(_)) => Color::Red,
    }
}
