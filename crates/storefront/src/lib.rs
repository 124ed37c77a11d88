//! GlowGlaz storefront library.
//!
//! Catalog browsing, a session cart and a three-step checkout with
//! abandoned checkout recovery. The binary in `main.rs` wires these into
//! an axum server; the CLI and integration tests use them directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod payments;
pub mod routes;
pub mod services;
pub mod state;
