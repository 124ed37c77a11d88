//! Rupee amounts using decimal arithmetic.
//!
//! The shop sells in a single currency (INR), so `Money` carries no currency
//! code. Amounts are stored in rupees, not paise; the payment backend is
//! responsible for converting to the gateway's minor unit.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount of Indian Rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Currency symbol used in all customer-facing text.
    pub const SYMBOL: &'static str = "₹";

    /// ISO 4217 code sent to the payment backend.
    pub const CURRENCY_CODE: &'static str = "INR";

    /// Wrap a decimal rupee amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// A whole number of rupees.
    #[must_use]
    pub fn rupees(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount in paise, as the gateway counts it.
    ///
    /// ```
    /// use glowglaz_core::Money;
    ///
    /// assert_eq!(Money::rupees(1598).paise(), Some(159_800));
    /// assert_eq!(Money::rupees(1499).discounted(20).paise(), Some(119_920));
    /// ```
    #[must_use]
    pub fn paise(&self) -> Option<i64> {
        (self.0 * Decimal::ONE_HUNDRED).round().to_i64()
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Apply a percentage discount, rounded to paise.
    ///
    /// ```
    /// use glowglaz_core::Money;
    ///
    /// assert_eq!(Money::rupees(3990).discounted(15).to_string(), "₹3,391.50");
    /// assert_eq!(Money::rupees(1499).discounted(0), Money::rupees(1499));
    /// ```
    #[must_use]
    pub fn discounted(self, percent: u32) -> Self {
        let percent = Decimal::from(percent.min(100));
        let factor = (Decimal::ONE_HUNDRED - percent) / Decimal::ONE_HUNDRED;
        Self(
            (self.0 * factor)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Formats with the rupee symbol and Indian digit grouping.
///
/// The last three integer digits form one group and the rest are grouped in
/// pairs (`₹1,00,000`). Paise are shown only when non-zero.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.2}", rounded.abs());
        let (whole, paise) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        if rounded.is_sign_negative() && !rounded.is_zero() {
            f.write_str("-")?;
        }
        f.write_str(Self::SYMBOL)?;
        f.write_str(&group_indian(whole))?;
        if paise != "00" {
            write!(f, ".{paise}")?;
        }
        Ok(())
    }
}

/// Insert en-IN thousands separators into a string of ASCII digits.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}
