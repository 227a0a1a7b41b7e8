//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Auth
//! POST /api/auth/signup                 - Register and receive a token
//! POST /api/auth/login                  - Login and receive a token
//! GET  /api/auth/me                     - Current user (requires auth)
//!
//! # Products
//! GET    /api/products                  - List with filters and pagination
//! GET    /api/products/{id}             - Product detail
//! POST   /api/products                  - Create (admin)
//! PUT    /api/products/{id}             - Update (admin)
//! DELETE /api/products/{id}             - Delete (admin)
//!
//! # Cart (requires auth)
//! GET    /api/cart                      - Current cart
//! POST   /api/cart                      - Add a product, merging quantities
//! PUT    /api/cart/{productId}          - Set a line's quantity
//! DELETE /api/cart/clear                - Empty the cart
//! DELETE /api/cart/{productId}          - Remove a line
//!
//! # Orders (requires auth)
//! POST /api/orders                      - Place an order
//! GET  /api/orders                      - Own order history
//! GET  /api/orders/{id}                 - Order detail (owner or admin)
//! POST /api/orders/create-payment-intent - Price the cart for payment
//!
//! # Admin (requires admin)
//! GET /api/admin/dashboard              - Store-wide stats
//! GET /api/admin/orders                 - All orders, filterable
//! PUT /api/admin/orders/{id}/status     - Update an order's status
//! GET /api/admin/users                  - All users, without password hashes
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/clear", delete(cart::clear))
        .route("/{productId}", put(cart::update).delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::list))
        .route("/create-payment-intent", post(orders::create_payment_intent))
        .route("/{id}", get(orders::show))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/orders", get(admin::orders))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route("/users", get(admin::users))
}

/// Assemble the full API under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/admin", admin_routes())
}
