//! Raritone Core - Shared domain types.
//!
//! This crate provides common types used across all Raritone components:
//! - `storefront` - Public-facing storefront service
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, emails, and the cart/product/scan/chat
//!   domain records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
