//! Order repository.

use chrono::Utc;
use gadget_grove_core::{NewOrder, Order, OrderId, OrderPatch, UserId};

use crate::store::{Document, JsonStore};

use super::RepositoryError;

/// Typed access to the orders document.
pub struct OrderRepository<'a> {
    doc: &'a Document<Order>,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a JsonStore) -> Self {
        Self { doc: store.orders() }
    }

    /// All orders, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn get_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.doc.read_all().await?)
    }

    /// Look up an order by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.doc.read_all().await?;
        Ok(orders.into_iter().find(|o| o.id == *id))
    }

    /// Orders placed by a user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.doc.read_all().await?;
        Ok(orders
            .into_iter()
            .filter(|o| o.user_id == *user_id)
            .collect())
    }

    /// Create an order. The repository assigns the id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on a document failure.
    pub async fn create(&self, input: NewOrder) -> Result<Order, RepositoryError> {
        self.doc
            .mutate(|orders| {
                let order = Order {
                    id: OrderId::generate(),
                    user_id: input.user_id,
                    items: input.items,
                    total: input.total,
                    status: input.status,
                    shipping_address: input.shipping_address,
                    payment_method: input.payment_method,
                    payment_reference: input.payment_reference,
                    created_at: Utc::now(),
                };
                orders.push(order.clone());
                Ok::<_, RepositoryError>(order)
            })
            .await
    }

    /// Apply a partial update to an order and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no order has the id, in
    /// which case the document is not rewritten.
    pub async fn update(&self, id: &OrderId, patch: OrderPatch) -> Result<Order, RepositoryError> {
        self.doc
            .mutate(|orders| {
                let order = orders
                    .iter_mut()
                    .find(|o| o.id == *id)
                    .ok_or(RepositoryError::NotFound)?;
                order.apply_patch(patch);
                Ok(order.clone())
            })
            .await
    }

    /// Remove an order if present. Deleting an absent id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on a document failure.
    pub async fn delete(&self, id: &OrderId) -> Result<(), RepositoryError> {
        self.doc
            .mutate(|orders| {
                orders.retain(|o| o.id != *id);
                Ok::<_, RepositoryError>(())
            })
            .await
    }
}
