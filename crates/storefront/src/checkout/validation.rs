//! Checkout form validation.
//!
//! Each step's form is validated as a whole so every problem can be shown
//! next to its field at once. Messages are customer-facing.

use std::sync::LazyLock;

use glowglaz_core::Email;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));
static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{16}$").expect("card number pattern is valid"));
static EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("expiry pattern is valid"));
static CVV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("cvv pattern is valid"));

/// Field-level validation messages, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field, message.into()));
        }
    }

    /// The message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Whether `field` has a message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

/// Raw shipping form as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Validated shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl ShippingDetails {
    /// "First Last", as sent to the payment gateway.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Form values for re-rendering the shipping step.
    #[must_use]
    pub fn to_form(&self) -> ShippingForm {
        ShippingForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.to_string(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
        }
    }
}

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    message: &str,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
    }
    value.to_owned()
}

impl ShippingForm {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns all field messages when any field is missing or malformed.
    pub fn validate(&self) -> Result<ShippingDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let first_name = required(&mut errors, "first_name", &self.first_name, "First name is required");
        let last_name = required(&mut errors, "last_name", &self.last_name, "Last name is required");

        let email_text = self.email.trim();
        let email = if email_text.is_empty() {
            errors.add("email", "Email is required");
            None
        } else if EMAIL_SHAPE.is_match(email_text) {
            Email::parse(email_text).ok().or_else(|| {
                errors.add("email", "Email address is invalid");
                None
            })
        } else {
            errors.add("email", "Email address is invalid");
            None
        };

        let phone = required(&mut errors, "phone", &self.phone, "Phone is required");
        let address = required(&mut errors, "address", &self.address, "Address is required");
        let city = required(&mut errors, "city", &self.city, "City is required");
        let state = required(&mut errors, "state", &self.state, "State is required");
        let pincode = required(&mut errors, "pincode", &self.pincode, "Pincode is required");

        match email {
            Some(email) if errors.is_empty() => Ok(ShippingDetails {
                first_name,
                last_name,
                email,
                phone,
                address,
                city,
                state,
                pincode,
            }),
            _ => Err(errors),
        }
    }
}

/// Card fields from the payment step. Never persisted.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardForm {
    pub card_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl std::fmt::Debug for CardForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardForm")
            .field("card_name", &self.card_name)
            .field("card_number", &"[REDACTED]")
            .field("expiry_date", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

impl CardForm {
    /// Validate the card fields.
    ///
    /// # Errors
    ///
    /// Returns all field messages when any field is missing or malformed.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.card_name.trim().is_empty() {
            errors.add("card_name", "Name on card is required");
        }

        let number: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if self.card_number.trim().is_empty() {
            errors.add("card_number", "Card number is required");
        } else if !CARD_NUMBER.is_match(&number) {
            errors.add("card_number", "Invalid card number");
        }

        let expiry = self.expiry_date.trim();
        if expiry.is_empty() {
            errors.add("expiry_date", "Expiry date is required");
        } else if !EXPIRY.is_match(expiry) {
            errors.add("expiry_date", "Use format MM/YY");
        }

        let cvv = self.cvv.trim();
        if cvv.is_empty() {
            errors.add("cvv", "CVV is required");
        } else if !CVV.is_match(cvv) {
            errors.add("cvv", "Invalid CVV");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
