//! Value objects shared by the catalog and cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount with 2-decimal currency semantics.
///
/// All arithmetic stays in [`Decimal`]; floats never touch money, so totals
/// cannot pick up drift when a unit price is multiplied by a quantity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    /// From minor units: `Money::cents(900)` is 9,00€.
    pub fn cents(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }

    /// Plain subtraction; may go below zero. Callers that need the price
    /// floor apply [`Money::floor_zero`] once at the end.
    pub fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }

    pub fn times(self, qty: u32) -> Money {
        Money(self.0 * Decimal::from(qty))
    }

    pub fn floor_zero(self) -> Money {
        if self.0 < Decimal::ZERO {
            Money::ZERO
        } else {
            self
        }
    }
}

impl fmt::Display for Money {
    /// French display format: comma decimal separator, trailing euro sign.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = format!("{:.2}", self.0);
        write!(f, "{}€", plain.replace('.', ","))
    }
}

/// Category display key derived from its label, used for navigation anchors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug: lowercase, trim, strip characters outside
    /// `[a-z0-9\s-]`, collapse each whitespace run to a single hyphen.
    /// "Naan Burger" → "naan-burger"; diacritics and punctuation are dropped.
    pub fn derive(label: &str) -> Self {
        let lowered = label.to_lowercase();
        let trimmed = lowered.trim();
        let mut out = String::with_capacity(trimmed.len());
        let mut gap = false;
        for c in trimmed.chars() {
            if c.is_whitespace() {
                gap = true;
            } else if matches!(c, 'a'..='z' | '0'..='9' | '-') {
                if gap {
                    out.push('-');
                    gap = false;
                }
                out.push(c);
            }
        }
        if gap {
            out.push('-');
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
