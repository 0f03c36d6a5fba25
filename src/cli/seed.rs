//! The seeding orchestrators: read the sheet, build records, report, ask,
//! then commit through the category resolver and the upsert engine. Writes
//! happen row by row; a store error aborts the rest of the run and nothing
//! already written is rolled back.

use std::path::Path;

use chrono::FixedOffset;
use colored::Colorize;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::approval::{request_consent, Confirm, Consent, ConsolePrompt};
use crate::builders::{build_asset_rows, build_expense_rows, build_income_rows, BuildOutcome};
use crate::categories::resolve_categories;
use crate::cli::SeedArgs;
use crate::db::get_connection;
use crate::error::{JangbuError, Result};
use crate::models::{AssetSnapshotRecord, TransactionRecord};
use crate::normalize::TransactionKind;
use crate::settings::{get_data_dir, load_settings};
use crate::summary::{print_asset_summary, print_transaction_summary};
use crate::upsert::{
    insert_transaction, upsert_account, upsert_asset_master, upsert_holding, upsert_institution,
    upsert_member, upsert_snapshot,
};
use crate::workbook::{read_category_map, read_sheet};

pub fn expenses(args: &SeedArgs, sheet: usize) -> Result<()> {
    run_transactions(TransactionKind::Expense, args, sheet, &mut ConsolePrompt)
}

pub fn income(args: &SeedArgs, sheet: usize) -> Result<()> {
    run_transactions(TransactionKind::Income, args, sheet, &mut ConsolePrompt)
}

pub fn assets(args: &SeedArgs, sheet: usize) -> Result<()> {
    run_assets(args, sheet, &mut ConsolePrompt)
}

fn sheet_timezone() -> Result<FixedOffset> {
    let hours = load_settings().tz_offset_hours;
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| JangbuError::Settings(format!("bad timezone offset: {hours}")))
}

fn open_db() -> Result<Connection> {
    get_connection(&get_data_dir().join("jangbu.db"))
}

/// Prints the denial notice and reports whether the run may continue.
/// A denial is a clean skip, not a failure.
fn granted(consent: Consent) -> bool {
    match consent {
        Consent::Granted => true,
        Consent::DeniedNonInteractive => {
            println!(
                "{}",
                "No interactive terminal and no --yes flag; skipping the commit.".dimmed()
            );
            false
        }
        Consent::DeniedByUser => {
            println!("{}", "Commit declined; nothing written.".dimmed());
            false
        }
    }
}

/// Runs the commit closure only after consent. Denial returns Ok(None) and
/// the closure never executes, so the store is not even opened.
fn gated_commit<T>(
    prompt: &mut dyn Confirm,
    auto_approve: bool,
    question: &str,
    commit: impl FnOnce() -> Result<T>,
) -> Result<Option<T>> {
    if !granted(request_consent(prompt, auto_approve, question)?) {
        return Ok(None);
    }
    commit().map(Some)
}

fn run_transactions(
    kind: TransactionKind,
    args: &SeedArgs,
    sheet: usize,
    prompt: &mut dyn Confirm,
) -> Result<()> {
    let tz = sheet_timezone()?;
    let path = Path::new(&args.file);
    let rows = read_sheet(path, sheet)?;
    let outcome = match kind {
        TransactionKind::Expense => build_expense_rows(&rows, args.skip_rows, tz)?,
        TransactionKind::Income => build_income_rows(&rows, args.skip_rows, tz)?,
    };

    let label = kind.as_str();
    print_transaction_summary(
        label,
        &outcome.records,
        &outcome.warnings,
        outcome.sample.as_ref(),
        args.verbose,
    );
    if outcome.records.is_empty() {
        println!("Nothing to commit.");
        return Ok(());
    }

    let question = format!("Commit {} {label} record(s)?", outcome.records.len());
    let Some((inserted, duplicates)) = gated_commit(prompt, args.yes, &question, || {
        let conn = open_db()?;
        let mapping = read_category_map(path)?;
        let counts = commit_transactions(&conn, &outcome.records, &mapping)?;
        record_import(&conn, path, label, &outcome)?;
        Ok(counts)
    })?
    else {
        return Ok(());
    };

    println!(
        "{}",
        format!("Committed {inserted} {label} record(s); {duplicates} already present.").green()
    );
    Ok(())
}

fn run_assets(args: &SeedArgs, sheet: usize, prompt: &mut dyn Confirm) -> Result<()> {
    let tz = sheet_timezone()?;
    let path = Path::new(&args.file);
    let rows = read_sheet(path, sheet)?;
    let outcome = build_asset_rows(&rows, args.skip_rows, tz)?;

    print_asset_summary(
        &outcome.records,
        &outcome.warnings,
        outcome.sample.as_ref(),
        args.verbose,
    );
    if outcome.records.is_empty() {
        println!("Nothing to commit.");
        return Ok(());
    }

    let question = format!("Commit {} snapshot record(s)?", outcome.records.len());
    let Some((inserted, duplicates)) = gated_commit(prompt, args.yes, &question, || {
        let conn = open_db()?;
        let counts = commit_assets(&conn, &outcome.records)?;
        record_import(&conn, path, "assets", &outcome)?;
        Ok(counts)
    })?
    else {
        return Ok(());
    };

    println!(
        "{}",
        format!("Committed {inserted} snapshot(s); {duplicates} already present.").green()
    );
    Ok(())
}

/// Resolve categories for every built record, then insert each transaction
/// unless an identical one is already stored. Returns (inserted, duplicates).
pub(crate) fn commit_transactions(
    conn: &Connection,
    records: &[TransactionRecord],
    mapping: &[(String, String)],
) -> Result<(usize, usize)> {
    let observed: Vec<(String, TransactionKind)> = records
        .iter()
        .map(|r| (r.category.clone(), r.kind))
        .collect();
    let resolved = resolve_categories(conn, &observed, mapping, TransactionKind::Expense)?;

    let mut inserted = 0usize;
    let mut duplicates = 0usize;
    for record in records {
        let category_id = resolved[&(record.category.clone(), record.kind)];
        if insert_transaction(conn, record, category_id)? {
            inserted += 1;
        } else {
            duplicates += 1;
        }
    }
    Ok((inserted, duplicates))
}

/// Walk the entity chain for each snapshot row: member, institution, asset
/// master, account, holding, then the dated valuation itself. Every step is
/// find-or-create. Returns (inserted, duplicates) counted on valuations.
pub(crate) fn commit_assets(
    conn: &Connection,
    records: &[AssetSnapshotRecord],
) -> Result<(usize, usize)> {
    let mut inserted = 0usize;
    let mut duplicates = 0usize;
    for record in records {
        let member_id = upsert_member(conn, &record.member)?;
        let institution_id = upsert_institution(conn, &record.institution)?;
        let master_id = upsert_asset_master(conn, record)?;
        let account_id = upsert_account(
            conn,
            member_id,
            institution_id,
            &record.account,
            record.account_type.as_str(),
        )?;
        let holding_id = upsert_holding(conn, account_id, master_id)?;
        if upsert_snapshot(conn, holding_id, record)? {
            inserted += 1;
        } else {
            duplicates += 1;
        }
    }
    Ok((inserted, duplicates))
}

trait Dated {
    fn day(&self) -> String;
}

impl Dated for TransactionRecord {
    fn day(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl Dated for AssetSnapshotRecord {
    fn day(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Log the committed batch in the imports table. Informational only; the
/// idempotence guarantees live in the natural-key upserts, not here.
fn record_import<T: Dated>(
    conn: &Connection,
    path: &Path,
    kind: &str,
    outcome: &BuildOutcome<T>,
) -> Result<()> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    let checksum = hex::encode(hasher.finalize());

    let dates: Vec<String> = outcome.records.iter().map(Dated::day).collect();
    conn.execute(
        "INSERT INTO imports (filename, kind, record_count, date_range_start, date_range_end, checksum) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
            kind,
            outcome.records.len() as i64,
            dates.iter().min(),
            dates.iter().max(),
            checksum,
        ],
    )?;
    Ok(())
}
