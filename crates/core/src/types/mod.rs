//! Core types for the Raritone storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod chat;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod scan;
pub mod search;

pub use cart::{Cart, CartItem, LineKey};
pub use chat::{ASSISTANT_AUTHOR, ChatMessage};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{Product, StockStatus};
pub use scan::{DeviceClass, ScanRecord, ScanSnapshot};
pub use search::RecentSearches;
