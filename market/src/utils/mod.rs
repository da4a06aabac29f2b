//! # Utility Functions
//!
//! Helpers used across the marketplace core and the CLI shell.
//!
//! ## Modules
//!
//! - **[`validation`]**: Input validation (listing fields, amounts typed by the user)
//! - **[`pricing`]**: Display-only price breakdown (8% surcharge)
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Money and id formatting
//! - [`crate::core`]: Core abstractions and error types

pub mod pricing;
pub mod validation;

pub use pricing::{PriceBreakdown, TAX_RATE};
