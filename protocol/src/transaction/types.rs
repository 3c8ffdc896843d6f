//! Core type definitions for ledger transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{AMOUNT_DISPLAY_DECIMALS, CURRENCY_SYMBOL};
use crate::crypto::hash::serialize_js_number;
use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A single value transfer.
///
/// Field order matches the canonical block projection: `sender`, `receiver`,
/// `amount`, `timestamp`. The struct is serialised as-is inside the hashed
/// projection, so do not reorder or add fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Paying party. Free-form text.
    pub sender: String,
    /// Receiving party. Free-form text.
    pub receiver: String,
    /// Transferred quantity. No sign constraint.
    #[serde(serialize_with = "serialize_js_number")]
    pub amount: f64,
    /// Human-readable creation time.
    pub timestamp: String,
}

impl Transaction {
    /// Creates a transaction from already-validated parts.
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            timestamp: timestamp.into(),
        }
    }

    /// Overwrites one editable field from raw user input.
    ///
    /// Amounts go through [`parse_amount`]; text fields are stored trimmed.
    pub fn set_field(&mut self, field: TxField, raw: &str) {
        match field {
            TxField::Sender => self.sender = raw.trim().to_string(),
            TxField::Receiver => self.receiver = raw.trim().to_string(),
            TxField::Amount => self.amount = parse_amount(raw),
        }
    }

    /// Returns the current value of a field as display text.
    pub fn field_text(&self, field: TxField) -> String {
        match field {
            TxField::Sender => self.sender.clone(),
            TxField::Receiver => self.receiver.clone(),
            TxField::Amount => format_amount(self.amount),
        }
    }
}

// ---------------------------------------------------------------------------
// TxField
// ---------------------------------------------------------------------------

/// The user-editable fields of a transaction. The timestamp is display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxField {
    /// The `sender` field.
    Sender,
    /// The `receiver` field.
    Receiver,
    /// The `amount` field.
    Amount,
}

impl TxField {
    /// Lowercase wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sender => "sender",
            Self::Receiver => "receiver",
            Self::Amount => "amount",
        }
    }
}

impl fmt::Display for TxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxField {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sender" => Ok(Self::Sender),
            "receiver" => Ok(Self::Receiver),
            "amount" => Ok(Self::Amount),
            other => Err(LedgerError::UnknownField(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Amount parsing & formatting
// ---------------------------------------------------------------------------

/// Parses user input into an amount, never failing.
///
/// Leading/trailing whitespace and the first currency symbol are removed,
/// then the longest leading decimal literal is parsed (`"12.5abc"` is
/// `12.5`, `"1e3"` is `1000`, `"-Infinity"` is negative infinity). Input
/// with no numeric prefix, and negative zero, yield `0`.
pub fn parse_amount(raw: &str) -> f64 {
    let stripped = raw.trim().replacen(CURRENCY_SYMBOL, "", 1);
    let prefix = numeric_prefix(stripped.trim_start());
    match prefix.parse::<f64>() {
        Ok(v) if v.is_nan() || v == 0.0 => 0.0,
        Ok(v) => v,
        Err(_) => 0.0,
    }
}

/// Renders an amount the way the ledger view shows it: `$10.00`.
pub fn format_amount(amount: f64) -> String {
    if amount.is_nan() {
        format!("{}NaN", CURRENCY_SYMBOL)
    } else if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{}{}Infinity", CURRENCY_SYMBOL, sign)
    } else {
        format!(
            "{}{:.*}",
            CURRENCY_SYMBOL, AMOUNT_DISPLAY_DECIMALS, amount
        )
    }
}

/// Returns the longest prefix of `s` that reads as a decimal float literal.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return &s[..end + "Infinity".len()];
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return "";
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
