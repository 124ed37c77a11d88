//! GlowGlaz Core - Shared domain types.
//!
//! This crate provides the types used across the GlowGlaz components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout)
//! - `cli` - Command-line tools for migrations and queue maintenance
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, rupee amounts, emails and checkout enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
