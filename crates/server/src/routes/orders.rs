//! Order placement and history handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gadget_grove_core::{Order, OrderId, OrderLine, ShippingAddress};

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::repos::OrderRepository;
use crate::services::CheckoutService;
use crate::services::checkout::{CheckoutError, RequestedLine};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<RequestedLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    pub items: Vec<RequestedLine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub message: String,
    pub order: Order,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: rust_decimal::Decimal,
    pub items: Vec<OrderLine>,
}

/// POST /api/orders
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    if body.items.is_empty() {
        return Err(AppError::BadRequest("Order must contain items".to_string()));
    }

    let checkout = CheckoutService::new(state.store());
    let order = checkout
        .place_order(
            &user.id,
            &body.items,
            body.shipping_address,
            body.payment_method,
            body.payment_reference,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order created successfully".to_string(),
            order,
        }),
    ))
}

/// POST /api/orders/create-payment-intent
///
/// Prices the requested lines and hands back an opaque payment reference.
/// Requires a configured payment secret; no stock is reserved here.
pub async fn create_payment_intent(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Json(body): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>> {
    if state.config().payment_secret.is_none() {
        return Err(AppError::Checkout(CheckoutError::PaymentDisabled));
    }
    if body.items.is_empty() {
        return Err(AppError::BadRequest("Order must contain items".to_string()));
    }

    let checkout = CheckoutService::new(state.store());
    let quote = checkout.quote(&body.items).await?;

    let reference = format!("pi_{}", Uuid::new_v4().simple());
    let client_secret = format!("{reference}_secret_{}", Uuid::new_v4().simple());

    Ok(Json(PaymentIntentResponse {
        client_secret,
        total: quote.total,
        items: quote.items,
    }))
}

/// GET /api/orders
pub async fn list(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let mut orders = OrderRepository::new(state.store())
        .find_by_user(&user.id)
        .await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(orders))
}

/// GET /api/orders/{id}
///
/// Owners see their own orders; admins see all.
pub async fn show(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.store())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    if order.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    Ok(Json(order))
}
