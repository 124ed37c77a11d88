//! Background services for storefront.
//!
//! - `recovery` - Abandoned checkout reminder sweeper

pub mod recovery;
