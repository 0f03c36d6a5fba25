use chrono::{DateTime, FixedOffset};

use crate::normalize::{AccountType, AssetClass, Currency, RiskLevel, SubClass, TransactionKind};

/// One ledger entry built from a workbook row. `amount` is always positive;
/// polarity lives in `kind`.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub payment_method: Option<String>,
    pub user: Option<String>,
}

/// One point-in-time valuation of a holding, built from the asset sheet.
#[derive(Debug, Clone)]
pub struct AssetSnapshotRecord {
    pub member: String,
    pub institution: String,
    pub account_type: AccountType,
    pub account: String,
    pub asset: String,
    pub symbol: Option<String>,
    pub asset_class: AssetClass,
    pub sub_class: Option<SubClass>,
    pub risk_level: RiskLevel,
    pub date: DateTime<FixedOffset>,
    pub quantity: f64,
    pub price_original: f64,
    pub exchange_rate: Option<f64>,
    pub total_value_krw: f64,
    pub currency: Currency,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub parent_id: Option<i64>,
    pub is_default: bool,
}

/// A skipped row: diagnostic only, never persisted.
#[derive(Debug, Clone)]
pub struct Warning {
    pub message: String,
    pub raw: String,
}

/// The first successfully built row, kept verbatim for the verbose summary.
#[derive(Debug, Clone)]
pub struct Sample {
    pub raw: String,
    pub mapped: String,
}
