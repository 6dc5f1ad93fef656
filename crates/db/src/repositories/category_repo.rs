//! Repository for the `categories` collection.

use chrono::Utc;

use crate::collections::CATEGORIES;
use crate::models::category::Category;
use crate::store::{self, oid, DocumentStore, Filter, FindOptions, Order, StoreError};

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Create a category.
    pub async fn create(
        store: &dyn DocumentStore,
        name: &str,
        slug: &str,
    ) -> Result<Category, StoreError> {
        let mut category = Category {
            id: String::new(),
            name: name.to_string(),
            slug: slug.to_string(),
            created_at: Utc::now(),
        };
        let id = store::insert_entity(store, CATEGORIES, &category).await?;
        category.id = id.to_hex();
        Ok(category)
    }

    /// List all categories, name ascending.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<Category>, StoreError> {
        store::fetch_many(
            store,
            CATEGORIES,
            "category",
            Filter::new(),
            FindOptions::new().sort("name", Order::Asc),
        )
        .await
    }

    /// Fetch a category by name. Absence is a normal outcome.
    pub async fn get_by_name(
        store: &dyn DocumentStore,
        name: &str,
    ) -> Result<Option<Category>, StoreError> {
        store::fetch_one(store, CATEGORIES, "category", Filter::new().eq("name", name)).await
    }

    /// Delete a category by ID.
    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
        oid::validate(id)?;
        store.delete_one(CATEGORIES, Filter::new().id(id)).await?;
        Ok(())
    }
}
