//! Product repository.

use chrono::Utc;
use gadget_grove_core::{Category, NewProduct, Product, ProductId, ProductPatch};

use crate::store::{Document, JsonStore};

use super::RepositoryError;

/// Typed access to the products document.
pub struct ProductRepository<'a> {
    doc: &'a Document<Product>,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a JsonStore) -> Self {
        Self {
            doc: store.products(),
        }
    }

    /// All products, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn get_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.doc.read_all().await?)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.doc.read_all().await?;
        Ok(products.into_iter().find(|p| p.id == *id))
    }

    /// Products in a category.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn find_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.doc.read_all().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    /// Products with an exact subcategory, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn find_by_subcategory(
        &self,
        subcategory: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.doc.read_all().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.subcategory.eq_ignore_ascii_case(subcategory))
            .collect())
    }

    /// Full-text search across name, description, brand, category, and
    /// subcategory. Case-insensitive, unranked.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if the document cannot be read.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let needle = query.to_lowercase();
        let products = self.doc.read_all().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.matches_query(&needle))
            .collect())
    }

    /// Create a product. The repository assigns the id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on a document failure.
    pub async fn create(&self, input: NewProduct) -> Result<Product, RepositoryError> {
        self.doc
            .mutate(|products| {
                let product = Product {
                    id: ProductId::generate(),
                    name: input.name,
                    description: input.description,
                    price: input.price,
                    image: input.image,
                    category: input.category,
                    subcategory: input.subcategory,
                    stock: input.stock,
                    rating: input.rating,
                    reviews: input.reviews,
                    brand: input.brand,
                    features: input.features,
                    created_at: Utc::now(),
                };
                products.push(product.clone());
                Ok::<_, RepositoryError>(product)
            })
            .await
    }

    /// Apply a partial update to a product and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no product has the id, in
    /// which case the document is not rewritten.
    pub async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        self.doc
            .mutate(|products| {
                let product = products
                    .iter_mut()
                    .find(|p| p.id == *id)
                    .ok_or(RepositoryError::NotFound)?;
                product.apply_patch(patch);
                Ok(product.clone())
            })
            .await
    }

    /// Remove a product if present. Deleting an absent id is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on a document failure.
    pub async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        self.doc
            .mutate(|products| {
                products.retain(|p| p.id != *id);
                Ok::<_, RepositoryError>(())
            })
            .await
    }
}
