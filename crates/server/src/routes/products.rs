//! Product catalog handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gadget_grove_core::{Category, NewProduct, Product, ProductId, ProductPatch};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::repos::ProductRepository;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub category: Option<Category>,
    pub subcategory: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

/// GET /api/products
///
/// A search query replaces the category and subcategory filters; otherwise
/// both filters apply. Pagination happens after filtering.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductListResponse>> {
    let repo = ProductRepository::new(state.store());

    let filtered = match params.search.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => repo.search(query).await?,
        _ => {
            let mut products = match params.category {
                Some(category) => repo.find_by_category(category).await?,
                None => repo.get_all().await?,
            };
            if let Some(subcategory) = &params.subcategory {
                let needle = subcategory.to_lowercase();
                products.retain(|p| p.subcategory.to_lowercase() == needle);
            }
            products
        }
    };

    let total = filtered.len();
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(total);
    let products = filtered.into_iter().skip(offset).take(limit).collect();

    Ok(Json(ProductListResponse {
        products,
        total,
        limit,
        offset,
    }))
}

/// GET /api/products/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.store())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

/// POST /api/products (admin)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    input.validate().map_err(AppError::BadRequest)?;

    let product = ProductRepository::new(state.store()).create(input).await?;
    tracing::info!(product_id = %product.id, "product created");
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// PUT /api/products/{id} (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductResponse>> {
    validate_patch(&patch)?;

    let repo = ProductRepository::new(state.store());
    let product = repo.update(&id, patch).await.map_err(|e| match e {
        crate::repos::RepositoryError::NotFound => {
            AppError::NotFound("Product not found".to_string())
        }
        other => AppError::Repository(other),
    })?;

    Ok(Json(ProductResponse {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

/// DELETE /api/products/{id} (admin)
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.store());
    if repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    repo.delete(&id).await?;

    tracing::info!(product_id = %id, "product deleted");
    Ok(Json(
        serde_json::json!({ "message": "Product deleted successfully" }),
    ))
}

/// Apply the creation rules to whichever fields the patch provides.
fn validate_patch(patch: &ProductPatch) -> Result<()> {
    if let Some(name) = &patch.name
        && name.trim().len() < 2
    {
        return Err(AppError::BadRequest(
            "Product name is required and must be at least 2 characters".to_string(),
        ));
    }
    if let Some(description) = &patch.description
        && description.trim().len() < 10
    {
        return Err(AppError::BadRequest(
            "Product description is required and must be at least 10 characters".to_string(),
        ));
    }
    if let Some(price) = patch.price
        && price <= Decimal::ZERO
    {
        return Err(AppError::BadRequest("Valid price is required".to_string()));
    }
    if let Some(image) = &patch.image
        && image.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Product image URL is required".to_string(),
        ));
    }
    if let Some(subcategory) = &patch.subcategory
        && subcategory.trim().is_empty()
    {
        return Err(AppError::BadRequest("Subcategory is required".to_string()));
    }
    Ok(())
}
