//! Checkout step and payment method enums.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// One stage of the linear checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    /// 1-based position shown in the progress indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Confirmation => 3,
        }
    }

    /// The step after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    /// The step before this one, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Shipping => None,
            Self::Payment => Some(Self::Shipping),
            Self::Confirmation => Some(Self::Payment),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Confirmation => "Confirmation",
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Hosted payment gateway modal (Razorpay).
    Gateway,
    /// Card details captured on the payment step.
    #[default]
    Card,
    /// Pay the courier on delivery.
    CashOnDelivery,
}

/// Error returned when a form value names no known payment method.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct PaymentMethodError(pub String);

impl PaymentMethod {
    /// Value used in HTML forms.
    #[must_use]
    pub const fn form_value(self) -> &'static str {
        match self {
            Self::Gateway => "razorpay",
            Self::Card => "card",
            Self::CashOnDelivery => "cod",
        }
    }

    /// Label used on the confirmation page and in order emails.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gateway => "Razorpay",
            Self::Card => "Credit Card",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "razorpay" | "gateway" => Ok(Self::Gateway),
            "card" => Ok(Self::Card),
            "cod" | "cash_on_delivery" => Ok(Self::CashOnDelivery),
            other => Err(PaymentMethodError(other.to_owned())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_linear() {
        assert_eq!(CheckoutStep::Shipping.next(), Some(CheckoutStep::Payment));
        assert_eq!(CheckoutStep::Payment.next(), Some(CheckoutStep::Confirmation));
        assert_eq!(CheckoutStep::Confirmation.next(), None);
        assert_eq!(CheckoutStep::Shipping.previous(), None);
        assert_eq!(CheckoutStep::Payment.previous(), Some(CheckoutStep::Shipping));
        assert!(CheckoutStep::Shipping < CheckoutStep::Confirmation);
    }

    #[test]
    fn step_numbers_match_progress_indicator() {
        let numbers: Vec<u8> = [
            CheckoutStep::Shipping,
            CheckoutStep::Payment,
            CheckoutStep::Confirmation,
        ]
        .into_iter()
        .map(CheckoutStep::number)
        .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn payment_method_round_trips_form_values() {
        for method in [
            PaymentMethod::Gateway,
            PaymentMethod::Card,
            PaymentMethod::CashOnDelivery,
        ] {
            assert_eq!(method.form_value().parse::<PaymentMethod>(), Ok(method));
        }
        assert!("paypal".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn payment_method_labels() {
        assert_eq!(PaymentMethod::Gateway.label(), "Razorpay");
        assert_eq!(PaymentMethod::CashOnDelivery.to_string(), "Cash on Delivery");
    }
}
