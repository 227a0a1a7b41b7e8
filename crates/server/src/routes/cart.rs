//! Cart handlers.
//!
//! The cart is stored on the user record. Every handler re-reads the user
//! fresh, computes the new cart, and writes it back through a typed patch.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use gadget_grove_core::{CartLine, ProductId, UserPatch};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::repos::{ProductRepository, UserRepository};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub cart: Vec<CartLine>,
}

/// GET /api/cart
pub async fn show(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartLine>>> {
    // Re-read rather than trusting the extractor's snapshot; another
    // request may have written the cart since the token check.
    let fresh = UserRepository::new(state.store())
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    Ok(Json(fresh.cart))
}

/// POST /api/cart
///
/// Adds a product to the cart, merging with an existing line. The combined
/// quantity must not exceed the product's current stock.
pub async fn add(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let product = ProductRepository::new(state.store())
        .find_by_id(&body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let users = UserRepository::new(state.store());
    let mut cart = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?
        .cart;

    let requested = match cart.iter().find(|l| l.product_id == body.product_id) {
        Some(line) => line.quantity.saturating_add(body.quantity),
        None => body.quantity,
    };
    if requested > product.stock {
        return Err(AppError::BadRequest("Insufficient stock".to_string()));
    }

    match cart.iter_mut().find(|l| l.product_id == body.product_id) {
        Some(line) => line.quantity = requested,
        None => cart.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: body.quantity,
        }),
    }

    let updated = users.update(&user.id, UserPatch::cart(cart)).await?;
    Ok(Json(CartResponse {
        message: "Item added to cart".to_string(),
        cart: updated.cart,
    }))
}

/// PUT /api/cart/{productId}
pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let product = ProductRepository::new(state.store())
        .find_by_id(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    if body.quantity > product.stock {
        return Err(AppError::BadRequest("Insufficient stock".to_string()));
    }

    let users = UserRepository::new(state.store());
    let mut cart = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?
        .cart;

    let line = cart
        .iter_mut()
        .find(|l| l.product_id == product_id)
        .ok_or_else(|| AppError::NotFound("Item not found in cart".to_string()))?;
    line.quantity = body.quantity;

    let updated = users.update(&user.id, UserPatch::cart(cart)).await?;
    Ok(Json(CartResponse {
        message: "Cart item updated".to_string(),
        cart: updated.cart,
    }))
}

/// DELETE /api/cart/{productId}
pub async fn remove(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>> {
    let users = UserRepository::new(state.store());
    let mut cart = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?
        .cart;

    cart.retain(|l| l.product_id != product_id);

    let updated = users.update(&user.id, UserPatch::cart(cart)).await?;
    Ok(Json(CartResponse {
        message: "Item removed from cart".to_string(),
        cart: updated.cart,
    }))
}

/// DELETE /api/cart/clear
pub async fn clear(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<CartResponse>> {
    let users = UserRepository::new(state.store());
    let updated = users.update(&user.id, UserPatch::cart(Vec::new())).await?;
    Ok(Json(CartResponse {
        message: "Cart cleared".to_string(),
        cart: updated.cart,
    }))
}
