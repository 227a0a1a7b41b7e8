//! Admin handlers. Every route requires the admin role.

use std::cmp::Ordering;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gadget_grove_core::{Order, OrderId, OrderPatch, OrderStatus, Product, PublicUser};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::repos::{OrderRepository, ProductRepository, RepositoryError, UserRepository};
use crate::state::AppState;

const RECENT_ORDERS: usize = 10;
const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub total_users: usize,
    pub total_products: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
    pub top_products: Vec<Product>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminOrderParams {
    pub status: Option<OrderStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AdminOrderListResponse {
    pub orders: Vec<Order>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub order: Order,
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>> {
    let orders = OrderRepository::new(state.store()).get_all().await?;
    let users = UserRepository::new(state.store()).get_all().await?;
    let products = ProductRepository::new(state.store()).get_all().await?;

    let total_revenue = orders.iter().map(|o| o.total).sum();
    let stats = DashboardStats {
        total_revenue,
        total_orders: orders.len(),
        total_users: users.len(),
        total_products: products.len(),
    };

    let mut recent_orders = orders;
    recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_orders.truncate(RECENT_ORDERS);

    // Popularity proxy: rating weighted by review count.
    let mut top_products = products;
    top_products.sort_by(|a, b| {
        let score_a = a.rating * f64::from(a.reviews);
        let score_b = b.rating * f64::from(b.reviews);
        score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
    });
    top_products.truncate(TOP_PRODUCTS);

    Ok(Json(DashboardResponse {
        stats,
        recent_orders,
        top_products,
    }))
}

/// GET /api/admin/orders
pub async fn orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AdminOrderParams>,
) -> Result<Json<AdminOrderListResponse>> {
    let mut orders = OrderRepository::new(state.store()).get_all().await?;

    if let Some(status) = params.status {
        orders.retain(|o| o.status == status);
    }
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = orders.len();
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(total);
    let orders = orders.into_iter().skip(offset).take(limit).collect();

    Ok(Json(AdminOrderListResponse { orders, total }))
}

/// PUT /api/admin/orders/{id}/status
pub async fn update_order_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let status = body
        .status
        .parse::<OrderStatus>()
        .map_err(|_| AppError::BadRequest("Invalid order status".to_string()))?;

    let order = OrderRepository::new(state.store())
        .update(&id, OrderPatch::status(status))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order not found".to_string()),
            other => AppError::Repository(other),
        })?;

    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
    Ok(Json(UpdateStatusResponse {
        message: "Order status updated".to_string(),
        order,
    }))
}

/// GET /api/admin/users
pub async fn users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicUser>>> {
    let users = UserRepository::new(state.store()).get_all().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}
