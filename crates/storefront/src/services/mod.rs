//! Application services sitting between routes and storage.

pub mod cart;
pub mod chat;
pub mod identity;
pub mod wishlist;
