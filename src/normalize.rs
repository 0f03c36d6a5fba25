//! Closed vocabularies for the hand-maintained workbook exports.
//!
//! Every normalizer is a total function: lower-case and trim the input, walk
//! an ordered table of substring rules, first match wins, otherwise return
//! the table's fixed default. The tables are data, not cascaded `if`s, so the
//! precedence is visible and testable on its own.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Recognize an explicit polarity marker from the sheet's type column.
    /// Returns `None` for blank or unrecognized text; callers fall back to
    /// the amount sign.
    pub fn from_marker(text: &str) -> Option<Self> {
        let t = fold(text);
        if t.is_empty() {
            return None;
        }
        if t.contains("수입") || t.contains("income") {
            Some(Self::Income)
        } else if t.contains("지출") || t.contains("expense") {
            Some(Self::Expense)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Irp,
    Isa,
    Cma,
    Pension,
    Bank,
    Brokerage,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Irp => "irp",
            Self::Isa => "isa",
            Self::Cma => "cma",
            Self::Pension => "pension",
            Self::Bank => "bank",
            Self::Brokerage => "brokerage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Aggressive,
    Conservative,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Conservative => "conservative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Equity,
    Deposit,
    Gold,
    Bond,
    Crypto,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Deposit => "deposit",
            Self::Gold => "gold",
            Self::Bond => "bond",
            Self::Crypto => "crypto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubClass {
    Growth,
    Dividend,
    GovernmentBond,
    CorporateBond,
}

impl SubClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Dividend => "dividend",
            Self::GovernmentBond => "government-bond",
            Self::CorporateBond => "corporate-bond",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Krw,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Krw => "KRW",
            Self::Usd => "USD",
        }
    }
}

// ---------------------------------------------------------------------------
// Decision tables
// ---------------------------------------------------------------------------

type Rule<T> = (&'static [&'static str], T);

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

fn first_match<T: Copy>(rules: &[Rule<T>], folded: &str) -> Option<T> {
    if folded.is_empty() {
        return None;
    }
    rules
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| folded.contains(m)))
        .map(|(_, result)| *result)
}

/// Hints taken from the account *name*; these outrank the raw type column
/// because owners label accounts more reliably than they fill in the type.
const ACCOUNT_NAME_RULES: &[Rule<AccountType>] = &[
    (&["irp"], AccountType::Irp),
    (&["isa"], AccountType::Isa),
    (&["cma"], AccountType::Cma),
    (&["연금"], AccountType::Pension),
    (&["은행", "뱅크", "저축"], AccountType::Bank),
];

const ACCOUNT_TYPE_RULES: &[Rule<AccountType>] = &[
    (&["연금"], AccountType::Pension),
    (&["투자"], AccountType::Brokerage),
];

pub fn normalize_account_type(account_name: &str, raw_type: &str) -> AccountType {
    first_match(ACCOUNT_NAME_RULES, &fold(account_name))
        .or_else(|| first_match(ACCOUNT_TYPE_RULES, &fold(raw_type)))
        .unwrap_or(AccountType::Brokerage)
}

const RISK_RULES: &[Rule<RiskLevel>] = &[
    (&["위험", "공격"], RiskLevel::Aggressive),
    (&["안전", "보수"], RiskLevel::Conservative),
];

pub fn normalize_risk_level(raw: &str) -> RiskLevel {
    first_match(RISK_RULES, &fold(raw)).unwrap_or(RiskLevel::Conservative)
}

// Order matters: the deposit markers must be tested before the bare "금"
// gold marker, since 예금/적금 contain it.
const ASSET_CLASS_RULES: &[Rule<AssetClass>] = &[
    (&["주식"], AssetClass::Equity),
    (&["예금", "정기", "적금"], AssetClass::Deposit),
    (&["금"], AssetClass::Gold),
    (&["채권"], AssetClass::Bond),
    (&["코인", "암호화폐", "가상화폐"], AssetClass::Crypto),
];

pub fn normalize_asset_class(raw: &str) -> AssetClass {
    first_match(ASSET_CLASS_RULES, &fold(raw)).unwrap_or(AssetClass::Equity)
}

const SUB_CLASS_RULES: &[Rule<SubClass>] = &[
    (&["성장"], SubClass::Growth),
    (&["배당"], SubClass::Dividend),
    (&["국채", "국고"], SubClass::GovernmentBond),
    (&["회사", "기업"], SubClass::CorporateBond),
];

/// No default here: an asset with no recognizable sub-class simply has none.
pub fn normalize_sub_class(raw: &str) -> Option<SubClass> {
    first_match(SUB_CLASS_RULES, &fold(raw))
}

/// Cash-equivalent instruments whose per-unit price is meaningless in the
/// source sheets (quantity/price cells are routinely left blank for these).
const CASH_LIKE_MARKERS: &[&str] = &[
    "예금",
    "적금",
    "청약",
    "포인트",
    "현금",
    "파킹",
    "발행어음",
    "rp",
    "mmf",
    "mmw",
    "cma",
];

pub fn is_cash_like(asset_name: &str) -> bool {
    let folded = fold(asset_name);
    CASH_LIKE_MARKERS.iter().any(|m| folded.contains(m))
}

/// Currency is derived, never read from a cell: an exchange rate above 1
/// only shows up on USD-denominated holdings.
pub fn infer_currency(exchange_rate: Option<f64>) -> Currency {
    match exchange_rate {
        Some(rate) if rate > 1.0 => Currency::Usd,
        _ => Currency::Krw,
    }
}
