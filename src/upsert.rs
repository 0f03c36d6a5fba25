//! Find-or-create by natural key for every persisted entity. Existing rows
//! are authoritative: a match is a no-op even when the incoming sheet row
//! disagrees on other fields, so a full re-run against unchanged source data
//! writes nothing.

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::models::{AssetSnapshotRecord, TransactionRecord};

pub fn upsert_institution(conn: &Connection, name: &str) -> Result<i64> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM institutions WHERE name = ?1", [name], |r| r.get(0))
        .optional()?;
    if let Some(id) = found {
        return Ok(id);
    }
    conn.execute("INSERT INTO institutions (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_member(conn: &Connection, name: &str) -> Result<i64> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM members WHERE name = ?1", [name], |r| r.get(0))
        .optional()?;
    if let Some(id) = found {
        return Ok(id);
    }
    conn.execute("INSERT INTO members (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

/// Symbol-bearing instruments dedupe on `(symbol, currency)` so the same
/// ticker matches across re-imports; everything else falls back to
/// `(name, currency)`.
pub fn upsert_asset_master(conn: &Connection, record: &AssetSnapshotRecord) -> Result<i64> {
    let currency = record.currency.as_str();
    let found: Option<i64> = match &record.symbol {
        Some(symbol) => conn
            .query_row(
                "SELECT id FROM asset_masters WHERE symbol = ?1 AND currency = ?2",
                rusqlite::params![symbol, currency],
                |r| r.get(0),
            )
            .optional()?,
        None => conn
            .query_row(
                "SELECT id FROM asset_masters WHERE name = ?1 AND currency = ?2",
                rusqlite::params![record.asset, currency],
                |r| r.get(0),
            )
            .optional()?,
    };
    if let Some(id) = found {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO asset_masters (name, symbol, currency, asset_class, sub_class, risk_level) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            record.asset,
            record.symbol,
            currency,
            record.asset_class.as_str(),
            record.sub_class.map(|s| s.as_str()),
            record.risk_level.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_account(
    conn: &Connection,
    member_id: i64,
    institution_id: i64,
    name: &str,
    account_type: &str,
) -> Result<i64> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM accounts WHERE member_id = ?1 AND institution_id = ?2 AND name = ?3",
            rusqlite::params![member_id, institution_id, name],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(id) = found {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO accounts (member_id, institution_id, name, account_type) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![member_id, institution_id, name, account_type],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn upsert_holding(conn: &Connection, account_id: i64, asset_master_id: i64) -> Result<i64> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM holdings WHERE account_id = ?1 AND asset_master_id = ?2",
            rusqlite::params![account_id, asset_master_id],
            |r| r.get(0),
        )
        .optional()?;
    if let Some(id) = found {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO holdings (account_id, asset_master_id) VALUES (?1, ?2)",
        rusqlite::params![account_id, asset_master_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Returns true when a row was written, false when the `(holding, date)`
/// valuation already existed.
pub fn upsert_snapshot(
    conn: &Connection,
    holding_id: i64,
    record: &AssetSnapshotRecord,
) -> Result<bool> {
    let date = record.date.format("%Y-%m-%d").to_string();
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM snapshots WHERE holding_id = ?1 AND date = ?2",
            rusqlite::params![holding_id, date],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Ok(false);
    }
    conn.execute(
        "INSERT INTO snapshots (holding_id, date, quantity, price_original, exchange_rate, total_value_krw, currency) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            holding_id,
            date,
            record.quantity,
            record.price_original,
            record.exchange_rate,
            record.total_value_krw,
            record.currency.as_str(),
        ],
    )?;
    Ok(true)
}

/// Returns true when a row was written, false when an identical transaction
/// (same date, type, category, amount, description) already existed.
pub fn insert_transaction(
    conn: &Connection,
    record: &TransactionRecord,
    category_id: i64,
) -> Result<bool> {
    let date = record.date.format("%Y-%m-%d").to_string();
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM transactions \
         WHERE date = ?1 AND transaction_type = ?2 AND category_id = ?3 AND amount = ?4 AND description IS ?5",
    )?;
    if stmt.exists(rusqlite::params![
        date,
        record.kind.as_str(),
        category_id,
        record.amount,
        record.description,
    ])? {
        return Ok(false);
    }
    conn.execute(
        "INSERT INTO transactions (date, transaction_type, category_id, amount, description, payment_method, user_name) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            date,
            record.kind.as_str(),
            category_id,
            record.amount,
            record.description,
            record.payment_method,
            record.user,
        ],
    )?;
    Ok(true)
}
