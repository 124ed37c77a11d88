//! Core types for GlowGlaz.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod checkout;
pub mod email;
pub mod id;
pub mod money;

pub use checkout::{CheckoutStep, PaymentMethod, PaymentMethodError};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::Money;
