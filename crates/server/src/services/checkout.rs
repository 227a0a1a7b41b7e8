//! Checkout service.
//!
//! Turns a set of requested product quantities into a priced quote or a
//! placed order. Stock validation and decrement happen inside a single
//! products-document mutation, so an order either reserves all of its
//! stock or none of it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use gadget_grove_core::{
    NewOrder, Order, OrderLine, OrderStatus, Product, ProductId, ShippingAddress, UserId,
    UserPatch,
};

use crate::repos::{OrderRepository, RepositoryError, UserRepository};
use crate::store::{JsonStore, StoreError};

/// A product and quantity requested at checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A priced snapshot of requested lines, before any stock is reserved.
#[derive(Debug, Clone)]
pub struct Quote {
    pub items: Vec<OrderLine>,
    pub total: Decimal,
}

/// Errors from quoting or placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The ordering user does not exist.
    #[error("user not found")]
    UserNotFound,

    /// A requested product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A requested quantity exceeds the available stock.
    #[error("insufficient stock for {name}")]
    StockInsufficient { name: String },

    /// No payment provider secret is configured.
    #[error("payment processing is not configured")]
    PaymentDisabled,

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<StoreError> for CheckoutError {
    fn from(e: StoreError) -> Self {
        Self::Repository(RepositoryError::Storage(e))
    }
}

/// Resolve and price the requested lines against the catalog.
///
/// Tracks the remaining stock per product across lines, so duplicate lines
/// for the same product are validated against their combined quantity and
/// can never pass individually while exceeding stock together.
fn snapshot_lines(
    products: &[Product],
    requested: &[RequestedLine],
) -> Result<Vec<OrderLine>, CheckoutError> {
    let mut remaining: HashMap<&ProductId, u32> = HashMap::new();
    let mut items = Vec::with_capacity(requested.len());
    for line in requested {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| CheckoutError::ProductNotFound(line.product_id.clone()))?;
        let left = remaining.entry(&product.id).or_insert(product.stock);
        *left = left
            .checked_sub(line.quantity)
            .ok_or_else(|| CheckoutError::StockInsufficient {
                name: product.name.clone(),
            })?;
        items.push(OrderLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: line.quantity,
        });
    }
    Ok(items)
}

/// Checkout service.
pub struct CheckoutService<'a> {
    store: &'a JsonStore,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(store: &'a JsonStore) -> Self {
        Self { store }
    }

    /// Price the requested lines against the current catalog without
    /// reserving any stock.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::ProductNotFound` or
    /// `CheckoutError::StockInsufficient` if any line cannot be fulfilled.
    pub async fn quote(&self, requested: &[RequestedLine]) -> Result<Quote, CheckoutError> {
        let products = self.store.products().read_all().await?;
        let items = snapshot_lines(&products, requested)?;
        let total = items.iter().map(OrderLine::line_total).sum();
        Ok(Quote { items, total })
    }

    /// Place an order for a user.
    ///
    /// Validates every line and decrements stock inside one products
    /// mutation; if any line fails, no stock changes. The order is created
    /// with status `processing` and the user's cart is cleared afterwards.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::UserNotFound` if the user does not exist,
    /// `CheckoutError::ProductNotFound` or `CheckoutError::StockInsufficient`
    /// if a line cannot be fulfilled.
    pub async fn place_order(
        &self,
        user_id: &UserId,
        requested: &[RequestedLine],
        shipping_address: ShippingAddress,
        payment_method: String,
        payment_reference: Option<String>,
    ) -> Result<Order, CheckoutError> {
        let users = UserRepository::new(self.store);
        if users.find_by_id(user_id).await?.is_none() {
            return Err(CheckoutError::UserNotFound);
        }

        // Validate all lines, then decrement, under the products lock. The
        // document is only rewritten when the whole closure succeeds.
        let items = self
            .store
            .products()
            .mutate(|products| {
                let items = snapshot_lines(products, requested)?;
                // Validation bounded every aggregate by the stock, so the
                // subtraction cannot go below zero.
                for line in requested {
                    if let Some(product) = products.iter_mut().find(|p| p.id == line.product_id) {
                        product.stock = product.stock.saturating_sub(line.quantity);
                    }
                }
                Ok::<_, CheckoutError>(items)
            })
            .await?;

        let total = items.iter().map(OrderLine::line_total).sum();
        let orders = OrderRepository::new(self.store);
        let order = orders
            .create(NewOrder {
                user_id: user_id.clone(),
                items,
                total,
                status: OrderStatus::Processing,
                shipping_address,
                payment_method,
                payment_reference,
            })
            .await?;

        users.update(user_id, UserPatch::cart(Vec::new())).await?;

        tracing::info!(order_id = %order.id, user_id = %user_id, total = %order.total, "order placed");
        Ok(order)
    }
}
