//! Row builders: one raw sheet matrix in, structured records plus warnings
//! out. Row-level problems never abort a build; they skip the row and leave
//! a warning behind. The only fatal case here is a sheet with no data rows
//! left after the configured skip count.
//!
//! Builders take the matrix rather than a path so the workbook reader stays
//! at the orchestrator seam and tests can feed cells directly.

use calamine::Data;
use chrono::FixedOffset;

use crate::error::{JangbuError, Result};
use crate::models::{AssetSnapshotRecord, Sample, TransactionRecord, Warning};
use crate::normalize::{
    infer_currency, is_cash_like, normalize_account_type, normalize_asset_class,
    normalize_risk_level, normalize_sub_class, TransactionKind,
};
use crate::parsers::{cell_text, is_row_empty, parse_amount, parse_date, pick_cell};

#[derive(Debug)]
pub struct BuildOutcome<T> {
    pub records: Vec<T>,
    pub warnings: Vec<Warning>,
    pub sample: Option<Sample>,
}

// Expense and income sheets share one column layout.
const TX_DATE: usize = 0;
const TX_KIND: usize = 1;
const TX_CATEGORY: usize = 2;
const TX_DESCRIPTION: usize = 3;
const TX_AMOUNT: usize = 4;
const TX_PAYMENT: usize = 5;
const TX_USER: usize = 6;

// Asset snapshot sheet.
const AS_MEMBER: usize = 0;
const AS_INSTITUTION: usize = 1;
const AS_ACCOUNT_TYPE: usize = 2;
const AS_ACCOUNT: usize = 3;
const AS_ASSET: usize = 4;
const AS_SYMBOL: usize = 5;
const AS_CLASS: usize = 6;
const AS_SUB_CLASS: usize = 7;
const AS_RISK: usize = 8;
const AS_DATE: usize = 9;
const AS_QUANTITY: usize = 10;
const AS_PRICE: usize = 11;
const AS_RATE: usize = 12;
const AS_TOTAL: usize = 13;

fn render_row(row: &[Data]) -> String {
    let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
    format!("[{}]", cells.join(" | "))
}

fn render_cell(row: &[Data], index: usize) -> String {
    match pick_cell(row, index) {
        Some(cell) => cell.to_string(),
        None => "(empty)".to_string(),
    }
}

fn warn(warnings: &mut Vec<Warning>, row: &[Data], message: String) {
    warnings.push(Warning {
        message,
        raw: render_row(row),
    });
}

fn check_not_empty(rows: &[Vec<Data>], skip: usize) -> Result<()> {
    if rows.len() <= skip {
        return Err(JangbuError::EmptySheet { skip });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Expense / income sheets
// ---------------------------------------------------------------------------

pub fn build_expense_rows(
    rows: &[Vec<Data>],
    skip: usize,
    tz: FixedOffset,
) -> Result<BuildOutcome<TransactionRecord>> {
    build_transaction_rows(rows, skip, tz, TransactionKind::Expense)
}

pub fn build_income_rows(
    rows: &[Vec<Data>],
    skip: usize,
    tz: FixedOffset,
) -> Result<BuildOutcome<TransactionRecord>> {
    build_transaction_rows(rows, skip, tz, TransactionKind::Income)
}

/// `sheet_kind` drives the sign fallback when the polarity column is blank:
/// a negative amount on the expense sheet is an expense of the absolute
/// value, a positive amount on the income sheet is income, and anything else
/// without an explicit marker is a skipped row. The asymmetry mirrors how
/// the sheets are actually kept.
fn build_transaction_rows(
    rows: &[Vec<Data>],
    skip: usize,
    tz: FixedOffset,
    sheet_kind: TransactionKind,
) -> Result<BuildOutcome<TransactionRecord>> {
    check_not_empty(rows, skip)?;

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut sample = None;

    for row in rows.iter().skip(skip) {
        if is_row_empty(row) {
            continue;
        }

        let Some(date) = pick_cell(row, TX_DATE).and_then(|c| parse_date(c, tz)) else {
            warn(
                &mut warnings,
                row,
                format!("date parse failed: {}", render_cell(row, TX_DATE)),
            );
            continue;
        };

        let Some(amount) = pick_cell(row, TX_AMOUNT).and_then(parse_amount) else {
            warn(
                &mut warnings,
                row,
                format!("amount parse failed: {}", render_cell(row, TX_AMOUNT)),
            );
            continue;
        };
        if amount == 0.0 {
            warn(&mut warnings, row, "zero amount".to_string());
            continue;
        }

        let marker = cell_text(row, TX_KIND).and_then(|t| TransactionKind::from_marker(&t));
        let kind = match marker {
            Some(kind) => kind,
            None => match sheet_kind {
                TransactionKind::Expense if amount < 0.0 => TransactionKind::Expense,
                TransactionKind::Income if amount > 0.0 => TransactionKind::Income,
                _ => {
                    warn(
                        &mut warnings,
                        row,
                        format!(
                            "unresolved polarity: no type marker and amount {amount} on the {} sheet",
                            sheet_kind.as_str()
                        ),
                    );
                    continue;
                }
            },
        };

        let Some(category) = cell_text(row, TX_CATEGORY) else {
            warn(&mut warnings, row, "blank category".to_string());
            continue;
        };

        let record = TransactionRecord {
            kind,
            amount: amount.abs(),
            category,
            description: cell_text(row, TX_DESCRIPTION),
            date,
            payment_method: cell_text(row, TX_PAYMENT),
            user: cell_text(row, TX_USER),
        };
        if sample.is_none() {
            sample = Some(Sample {
                raw: render_row(row),
                mapped: format!("{record:?}"),
            });
        }
        records.push(record);
    }

    Ok(BuildOutcome {
        records,
        warnings,
        sample,
    })
}

// ---------------------------------------------------------------------------
// Asset snapshot sheet
// ---------------------------------------------------------------------------

pub fn build_asset_rows(
    rows: &[Vec<Data>],
    skip: usize,
    tz: FixedOffset,
) -> Result<BuildOutcome<AssetSnapshotRecord>> {
    check_not_empty(rows, skip)?;

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut sample = None;

    for row in rows.iter().skip(skip) {
        if is_row_empty(row) {
            continue;
        }

        let Some(date) = pick_cell(row, AS_DATE).and_then(|c| parse_date(c, tz)) else {
            warn(
                &mut warnings,
                row,
                format!("date parse failed: {}", render_cell(row, AS_DATE)),
            );
            continue;
        };

        let Some(total_value_krw) = pick_cell(row, AS_TOTAL).and_then(parse_amount) else {
            warn(
                &mut warnings,
                row,
                format!("total value parse failed: {}", render_cell(row, AS_TOTAL)),
            );
            continue;
        };
        if total_value_krw < 0.0 {
            warn(&mut warnings, row, "negative total value".to_string());
            continue;
        }

        let mut required = |index: usize, label: &str| -> Option<String> {
            let value = cell_text(row, index);
            if value.is_none() {
                warn(&mut warnings, row, format!("blank {label}"));
            }
            value
        };
        let Some(member) = required(AS_MEMBER, "member name") else { continue };
        let Some(institution) = required(AS_INSTITUTION, "institution name") else { continue };
        let Some(account) = required(AS_ACCOUNT, "account name") else { continue };
        let Some(asset) = required(AS_ASSET, "asset name") else { continue };

        let raw_type = cell_text(row, AS_ACCOUNT_TYPE).unwrap_or_default();
        let account_type = normalize_account_type(&account, &raw_type);
        let asset_class =
            normalize_asset_class(&cell_text(row, AS_CLASS).unwrap_or_default());
        let sub_class =
            normalize_sub_class(&cell_text(row, AS_SUB_CLASS).unwrap_or_default());
        let risk_level = normalize_risk_level(&cell_text(row, AS_RISK).unwrap_or_default());

        let quantity = pick_cell(row, AS_QUANTITY).and_then(parse_amount);
        let price_original = pick_cell(row, AS_PRICE).and_then(parse_amount);

        // Deposits, points, sweep balances: no meaningful unit price, so a
        // blank quantity/price pair is read as one unit worth the total.
        let (quantity, price_original) =
            if is_cash_like(&asset) && (quantity.is_none() || price_original.is_none()) {
                (1.0, total_value_krw)
            } else {
                (quantity.unwrap_or(0.0), price_original.unwrap_or(0.0))
            };
        if quantity < 0.0 || price_original < 0.0 {
            warn(&mut warnings, row, "negative quantity or price".to_string());
            continue;
        }

        let exchange_rate = pick_cell(row, AS_RATE).and_then(parse_amount).filter(|r| *r > 0.0);
        let currency = infer_currency(exchange_rate);

        let record = AssetSnapshotRecord {
            member,
            institution,
            account_type,
            account,
            asset,
            symbol: cell_text(row, AS_SYMBOL),
            asset_class,
            sub_class,
            risk_level,
            date,
            quantity,
            price_original,
            exchange_rate,
            total_value_krw,
            currency,
        };
        if sample.is_none() {
            sample = Some(Sample {
                raw: render_row(row),
                mapped: format!("{record:?}"),
            });
        }
        records.push(record);
    }

    Ok(BuildOutcome {
        records,
        warnings,
        sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{AccountType, AssetClass, Currency, RiskLevel};
    use crate::parsers::seoul;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn tx_row(date: &str, kind: &str, category: &str, amount: f64) -> Vec<Data> {
        vec![
            s(date),
            s(kind),
            s(category),
            s("memo"),
            Data::Float(amount),
            s("카드"),
            s("지영"),
        ]
    }

    fn asset_row(asset: &str, qty: Option<f64>, price: Option<f64>, total: f64) -> Vec<Data> {
        let opt = |v: Option<f64>| v.map(Data::Float).unwrap_or(Data::Empty);
        vec![
            s("지영"),            // member
            s("한국은행"),        // institution
            s("투자"),            // raw account type
            s("일반계좌"),        // account
            s(asset),             // asset
            Data::Empty,          // symbol
            s("주식"),            // class
            Data::Empty,          // sub class
            s("위험"),            // risk
            s("2024-01-31"),      // date
            opt(qty),             // quantity
            opt(price),           // price
            Data::Empty,          // exchange rate
            Data::Float(total),   // total value
        ]
    }

    fn skip_rows(n: usize) -> Vec<Vec<Data>> {
        (0..n).map(|_| vec![s("header")]).collect()
    }

    #[test]
    fn test_expense_rows_basic() {
        let mut rows = skip_rows(3);
        rows.push(tx_row("2024-01-05", "지출", "식비", 12000.0));
        rows.push(vec![Data::Empty, Data::Empty]); // spacer
        rows.push(tx_row("2024-01-06", "지출", "교통비", 1450.0));

        let outcome = build_expense_rows(&rows, 3, seoul()).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.warnings.is_empty());
        let first = &outcome.records[0];
        assert_eq!(first.kind, TransactionKind::Expense);
        assert_eq!(first.category, "식비");
        assert_eq!(first.amount, 12000.0);
        assert_eq!(first.payment_method.as_deref(), Some("카드"));
        assert_eq!(first.user.as_deref(), Some("지영"));
        assert!(outcome.sample.is_some());
    }

    #[test]
    fn test_amount_is_always_positive() {
        let mut rows = skip_rows(0);
        rows.push(tx_row("2024-01-05", "지출", "식비", -9000.0));
        rows.push(tx_row("2024-01-06", "", "식비", -4500.0)); // sign fallback
        rows.push(tx_row("2024-01-07", "수입", "이자", 300.0));

        let outcome = build_expense_rows(&rows, 0, seoul()).unwrap();
        assert_eq!(outcome.records.len(), 3);
        for record in &outcome.records {
            assert!(record.amount > 0.0, "amount must stay positive: {record:?}");
        }
        assert_eq!(outcome.records[1].kind, TransactionKind::Expense);
        assert_eq!(outcome.records[2].kind, TransactionKind::Income);
    }

    #[test]
    fn test_unmarked_positive_on_expense_sheet_is_a_warning() {
        let mut rows = skip_rows(0);
        rows.push(tx_row("2024-01-05", "", "식비", 9000.0));

        let outcome = build_expense_rows(&rows, 0, seoul()).unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].message.contains("unresolved polarity"));
    }

    #[test]
    fn test_income_sheet_sign_fallback() {
        let mut rows = skip_rows(0);
        rows.push(tx_row("2024-01-05", "", "급여", 3_000_000.0));
        rows.push(tx_row("2024-01-06", "", "급여", -500.0)); // ambiguous

        let outcome = build_income_rows(&rows, 0, seoul()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].kind, TransactionKind::Income);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_bad_rows_warn_but_do_not_abort() {
        let mut rows = skip_rows(0);
        for i in 0..100 {
            let date = if i < 3 { "not-a-date".to_string() } else { format!("2024-01-{:02}", (i % 28) + 1) };
            rows.push(tx_row(&date, "지출", "식비", 1000.0));
        }
        let outcome = build_expense_rows(&rows, 0, seoul()).unwrap();
        assert_eq!(outcome.records.len(), 97);
        assert_eq!(outcome.warnings.len(), 3);
        assert!(outcome.warnings[0].message.starts_with("date parse failed"));
    }

    #[test]
    fn test_zero_amount_and_blank_category_warn() {
        let mut rows = skip_rows(0);
        rows.push(tx_row("2024-01-05", "지출", "식비", 0.0));
        let mut blank_cat = tx_row("2024-01-06", "지출", "", -1000.0);
        blank_cat[TX_CATEGORY] = Data::Empty;
        rows.push(blank_cat);
        rows.push(vec![s("2024-01-07"), s("지출"), s("식비"), s(""), s("abc")]);

        let outcome = build_expense_rows(&rows, 0, seoul()).unwrap();
        assert!(outcome.records.is_empty());
        let messages: Vec<&str> = outcome.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("zero amount"));
        assert!(messages[1].contains("blank category"));
        assert!(messages[2].contains("amount parse failed"));
    }

    #[test]
    fn test_empty_sheet_is_fatal() {
        let rows = skip_rows(3);
        let err = build_expense_rows(&rows, 3, seoul()).unwrap_err();
        assert!(matches!(err, JangbuError::EmptySheet { skip: 3 }));

        let err = build_asset_rows(&[], 0, seoul()).unwrap_err();
        assert!(matches!(err, JangbuError::EmptySheet { skip: 0 }));
    }

    #[test]
    fn test_asset_rows_basic() {
        let mut rows = skip_rows(1);
        rows.push(asset_row("삼성전자", Some(10.0), Some(70000.0), 700_000.0));

        let outcome = build_asset_rows(&rows, 1, seoul()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        let rec = &outcome.records[0];
        assert_eq!(rec.member, "지영");
        assert_eq!(rec.institution, "한국은행");
        assert_eq!(rec.account_type, AccountType::Brokerage);
        assert_eq!(rec.asset_class, AssetClass::Equity);
        assert_eq!(rec.risk_level, RiskLevel::Aggressive);
        assert_eq!(rec.quantity, 10.0);
        assert_eq!(rec.price_original, 70000.0);
        assert_eq!(rec.currency, Currency::Krw);
        assert_eq!(rec.date.format("%Y-%m-%d").to_string(), "2024-01-31");
    }

    #[test]
    fn test_cash_like_substitution() {
        let mut rows = skip_rows(0);
        rows.push(asset_row("정기예금", None, None, 1_000_000.0));

        let outcome = build_asset_rows(&rows, 0, seoul()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        let rec = &outcome.records[0];
        assert_eq!(rec.quantity, 1.0);
        assert_eq!(rec.price_original, 1_000_000.0);
    }

    #[test]
    fn test_non_cash_like_missing_quantity_defaults_to_zero() {
        let mut rows = skip_rows(0);
        rows.push(asset_row("삼성전자", None, None, 700_000.0));

        let outcome = build_asset_rows(&rows, 0, seoul()).unwrap();
        assert_eq!(outcome.records[0].quantity, 0.0);
        assert_eq!(outcome.records[0].price_original, 0.0);
    }

    #[test]
    fn test_currency_follows_exchange_rate() {
        let mut rows = skip_rows(0);
        let mut usd = asset_row("S&P500 ETF", Some(5.0), Some(450.0), 3_038_625.0);
        usd[AS_RATE] = Data::Float(1350.5);
        rows.push(usd);
        rows.push(asset_row("삼성전자", Some(1.0), Some(70000.0), 70000.0));
        let mut unity = asset_row("국내채권", Some(1.0), Some(10000.0), 10000.0);
        unity[AS_RATE] = Data::Float(1.0);
        rows.push(unity);

        let outcome = build_asset_rows(&rows, 0, seoul()).unwrap();
        assert_eq!(outcome.records[0].currency, Currency::Usd);
        assert_eq!(outcome.records[0].exchange_rate, Some(1350.5));
        assert_eq!(outcome.records[1].currency, Currency::Krw);
        assert_eq!(outcome.records[2].currency, Currency::Krw);
    }

    #[test]
    fn test_asset_blank_required_fields_warn() {
        let mut rows = skip_rows(0);
        let mut no_member = asset_row("삼성전자", Some(1.0), Some(1.0), 1.0);
        no_member[AS_MEMBER] = Data::Empty;
        rows.push(no_member);
        let mut no_asset = asset_row("x", Some(1.0), Some(1.0), 1.0);
        no_asset[AS_ASSET] = s("   ");
        rows.push(no_asset);

        let outcome = build_asset_rows(&rows, 0, seoul()).unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings[0].message.contains("blank member name"));
        assert!(outcome.warnings[1].message.contains("blank asset name"));
    }

    #[test]
    fn test_sample_captures_first_built_row() {
        let mut rows = skip_rows(0);
        rows.push(tx_row("bad-date", "지출", "식비", 100.0));
        rows.push(tx_row("2024-02-01", "지출", "의료비", 30000.0));

        let outcome = build_expense_rows(&rows, 0, seoul()).unwrap();
        let sample = outcome.sample.unwrap();
        assert!(sample.raw.contains("의료비"));
        assert!(sample.mapped.contains("의료비"));
    }
}
