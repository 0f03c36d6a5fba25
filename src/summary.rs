//! The pre-commit report: what was built, what was skipped, and how the
//! rows break down, printed before the approval gate asks its question.
//! Line-oriented and human-readable only; nothing here is a stable format.

use std::collections::BTreeMap;

use colored::Colorize;
use comfy_table::Table;

use crate::fmt::{krw, money};
use crate::models::{AssetSnapshotRecord, Sample, TransactionRecord, Warning};
use crate::normalize::TransactionKind;

const MAX_WARNINGS_SHOWN: usize = 10;

pub fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    println!("{}", format!("{} row(s) skipped:", warnings.len()).yellow());
    for warning in warnings.iter().take(MAX_WARNINGS_SHOWN) {
        println!("  {} {}", warning.message.yellow(), warning.raw.dimmed());
    }
    if warnings.len() > MAX_WARNINGS_SHOWN {
        println!("  ... {} more", warnings.len() - MAX_WARNINGS_SHOWN);
    }
}

fn print_sample(sample: Option<&Sample>) {
    if let Some(sample) = sample {
        println!("\nFirst parsed row:");
        println!("  raw:    {}", sample.raw.dimmed());
        println!("  mapped: {}", sample.mapped);
    }
}

pub fn print_transaction_summary(
    label: &str,
    records: &[TransactionRecord],
    warnings: &[Warning],
    sample: Option<&Sample>,
    verbose: bool,
) {
    println!("\nParsed {} {label} row(s)", records.len());
    print_warnings(warnings);

    // Month | Rows | Income | Expense
    let mut months: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = months.entry(record.date.format("%Y-%m").to_string()).or_default();
        entry.0 += 1;
        match record.kind {
            TransactionKind::Income => entry.1 += record.amount,
            TransactionKind::Expense => entry.2 += record.amount,
        }
    }
    if !months.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Month", "Rows", "Income", "Expense"]);
        for (month, (rows, income, expense)) in &months {
            table.add_row(vec![
                month.clone(),
                rows.to_string(),
                krw(*income),
                krw(*expense),
            ]);
        }
        println!("{table}");
    }

    if verbose {
        print_sample(sample);
        if let Some(first_month) = months.keys().next() {
            println!("\nRows in {first_month}:");
            for record in records {
                if &record.date.format("%Y-%m").to_string() == first_month {
                    println!(
                        "  {} {:>7} {:>14}  {}  {}",
                        record.date.format("%Y-%m-%d"),
                        record.kind.as_str(),
                        krw(record.amount),
                        record.category,
                        record.description.as_deref().unwrap_or(""),
                    );
                }
            }
        }
    }
}

pub fn print_asset_summary(
    records: &[AssetSnapshotRecord],
    warnings: &[Warning],
    sample: Option<&Sample>,
    verbose: bool,
) {
    println!("\nParsed {} asset snapshot row(s)", records.len());
    print_warnings(warnings);

    let mut by_member: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    let mut by_institution: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in records {
        let m = by_member.entry(record.member.as_str()).or_default();
        m.0 += 1;
        m.1 += record.total_value_krw;
        let i = by_institution.entry(record.institution.as_str()).or_default();
        i.0 += 1;
        i.1 += record.total_value_krw;
    }
    for (title, tallies) in [("Member", &by_member), ("Institution", &by_institution)] {
        if tallies.is_empty() {
            continue;
        }
        let mut table = Table::new();
        table.set_header(vec![title, "Rows", "Total (KRW)"]);
        for (name, (rows, total)) in tallies.iter() {
            table.add_row(vec![name.to_string(), rows.to_string(), krw(*total)]);
        }
        println!("{table}");
    }

    if verbose {
        print_sample(sample);
        if let Some(first_date) = records.iter().map(|r| r.date).min() {
            println!("\nRows dated {}:", first_date.format("%Y-%m-%d"));
            for record in records.iter().filter(|r| r.date == first_date) {
                println!(
                    "  {} / {} / {}  {} x {} @ {}  = {} ({})",
                    record.member,
                    record.institution,
                    record.account,
                    record.asset,
                    record.quantity,
                    money(record.price_original),
                    krw(record.total_value_krw),
                    record.currency.as_str(),
                );
            }
        }
    }
}
