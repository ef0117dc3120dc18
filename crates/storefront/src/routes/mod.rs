//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Products
//! GET  /products               - Product listing (q, category, stockStatus, sortBy)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Current cart
//! POST /cart/add               - Add a line (triggers cart-updated)
//! POST /cart/update            - Replace a line's quantity (triggers cart-updated)
//! POST /cart/remove            - Remove a line (triggers cart-updated)
//! GET  /cart/count             - Cart quantity badge
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist ids
//! POST /wishlist/toggle        - Toggle a product (triggers wishlist-updated)
//! GET  /wishlist/count         - Wishlist count badge
//!
//! # Auth
//! POST /auth/login             - Email/password sign-in
//! POST /auth/register          - Email/password registration
//! POST /auth/provider          - Federated ID-token sign-in
//! POST /auth/logout            - Sign out
//!
//! # Scan (requires auth)
//! POST /scan/events            - Report a capture event
//! GET  /scan/status            - Current capture status
//! GET  /scan/history           - Past scan records
//!
//! # Chat
//! GET  /chat/messages          - Conversation (requires auth)
//! POST /chat/messages          - Send a message (requires auth)
//! POST /chat/guest             - Guest message with contact email
//!
//! # Search
//! POST /search/record          - Record a search term
//! GET  /search/recent          - Recent search terms
//!
//! # Account (requires auth)
//! GET  /account                - Account profile
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod chat;
pub mod products;
pub mod scan;
pub mod search;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/count", get(wishlist::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/provider", post(auth::provider))
        .route("/logout", post(auth::logout))
}

/// Create the scan routes router.
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(scan::events))
        .route("/status", get(scan::status))
        .route("/history", get(scan::history))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(chat::messages).post(chat::send))
        .route("/guest", post(chat::guest))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/record", post(search::record))
        .route("/recent", get(search::recent))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/auth", auth_routes())
        .nest("/scan", scan_routes())
        .nest("/chat", chat_routes())
        .nest("/search", search_routes())
        .route("/account", get(account::show))
}
