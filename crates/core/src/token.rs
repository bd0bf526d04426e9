//! Ledger token amounts.
//!
//! The ledger denominates everything in e8s: 10^8 minor units per whole
//! token. Amounts travel as integers end to end; conversion to and from the
//! decimal strings users type happens only at the edges, in this module.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minor units per whole token (10^8).
pub const E8S_PER_TOKEN: u64 = 100_000_000;

/// Maximum number of fractional digits an amount string may carry.
const MAX_FRACTION_DIGITS: usize = 8;

// ---------------------------------------------------------------------------
// TokenAmount
// ---------------------------------------------------------------------------

/// A non-negative token amount in e8s minor units.
///
/// Wraps a `u64` so arithmetic mistakes (floats, negative values) cannot
/// reach the ledger. Serializes transparently as the integer minor-unit
/// count, which is the wire representation the ledger expects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TokenAmount(u64);

impl TokenAmount {
    /// Wrap a raw minor-unit count.
    pub const fn from_e8s(e8s: u64) -> Self {
        Self(e8s)
    }

    /// The raw minor-unit count.
    pub const fn e8s(self) -> u64 {
        self.0
    }

    /// Whole-token integer part (fraction truncated).
    pub const fn whole_tokens(self) -> u64 {
        self.0 / E8S_PER_TOKEN
    }

    /// Checked addition in minor units. `None` on overflow; amounts are
    /// never silently saturated.
    pub fn checked_add(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_add(other.0).map(TokenAmount)
    }

    /// Parse a user-entered decimal string into minor units.
    ///
    /// Accepts digits with an optional fraction of up to eight places
    /// ("3", "0.5", "12.00000001"). Everything else is rejected: empty
    /// input, signs, non-digits, zero, and fractions finer than e8s. This
    /// runs before any wallet or ledger call, so a bad amount never leaves
    /// the process.
    pub fn parse(text: &str) -> Result<Self, AmountParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountParseError::NotPositive);
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            // Just "." on its own.
            return Err(AmountParseError::NotNumeric);
        }
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountParseError::NotNumeric);
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(AmountParseError::TooPrecise);
        }

        let whole_units: u64 = if whole.is_empty() {
            0
        } else {
            // All-digit input, so the only possible failure is overflow.
            whole.parse().map_err(|_| AmountParseError::Overflow)?
        };
        let mut e8s = whole_units
            .checked_mul(E8S_PER_TOKEN)
            .ok_or(AmountParseError::Overflow)?;

        if !fraction.is_empty() {
            let scale = 10u64.pow((MAX_FRACTION_DIGITS - fraction.len()) as u32);
            let fraction_units: u64 = fraction.parse().map_err(|_| AmountParseError::NotNumeric)?;
            e8s = e8s
                .checked_add(fraction_units * scale)
                .ok_or(AmountParseError::Overflow)?;
        }

        if e8s == 0 {
            return Err(AmountParseError::NotPositive);
        }
        Ok(Self(e8s))
    }
}

impl fmt::Display for TokenAmount {
    /// Renders whole tokens with the fraction trimmed of trailing zeros
    /// ("1", "0.5", "2.25").
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / E8S_PER_TOKEN;
        let fraction = self.0 % E8S_PER_TOKEN;
        if fraction == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{fraction:08}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

// ---------------------------------------------------------------------------
// TokenBalance
// ---------------------------------------------------------------------------

/// One entry of the wallet's balance array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    /// Token symbol as reported by the wallet (e.g. `"ICP"`).
    pub symbol: String,
    pub amount: TokenAmount,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a user-entered amount string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("Amount is required")]
    Empty,

    #[error("Amount must be a number")]
    NotNumeric,

    #[error("Amount must be greater than 0")]
    NotPositive,

    #[error("Amount supports at most 8 decimal places")]
    TooPrecise,

    #[error("Amount is too large")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
