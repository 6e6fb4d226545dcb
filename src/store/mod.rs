use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Class, NewOrder};
use crate::search::ClassQuery;
use crate::updates::ClassUpdate;

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Inserted document has no object id")]
    MissingInsertedId,
}

/// Persistence for classes and orders.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_classes(&self, query: &ClassQuery) -> Result<Vec<Class>, StoreError>;

    async fn insert_order(&self, order: NewOrder) -> Result<ObjectId, StoreError>;

    /// Applies `update` and returns the class as stored afterwards, or `None`
    /// when no class has this id.
    async fn update_class(
        &self,
        id: ObjectId,
        update: &ClassUpdate,
    ) -> Result<Option<Class>, StoreError>;
}
