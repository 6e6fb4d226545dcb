use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info};

use super::{Store, StoreError};
use crate::models::{Class, NewClass, NewOrder};
use crate::search::ClassQuery;
use crate::updates::ClassUpdate;

const CLASSES: &str = "classes";
const ORDERS: &str = "orders";
const LEGACY_ID_INDEX: &str = "id_1";

/// MongoDB-backed store. One client is shared by every request; call
/// [`MongoStore::close`] once the server has stopped.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    classes: Collection<Class>,
    orders: Collection<Document>,
}

impl MongoStore {
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let database = client.database(db_name);
        let store = Self {
            classes: database.collection(CLASSES),
            orders: database.collection(ORDERS),
            client,
        };

        let text_index = IndexModel::builder()
            .keys(doc! { "subject": "text", "location": "text", "description": "text" })
            .build();
        store.classes.create_index(text_index).await?;

        info!(db = db_name, "Connected to MongoDB");
        Ok(store)
    }

    /// Replaces every class with `classes` and clears all orders.
    pub async fn reseed(&self, classes: &[NewClass]) -> Result<usize, StoreError> {
        match self.classes.drop_index(LEGACY_ID_INDEX).await {
            Ok(()) => info!("Dropped legacy {LEGACY_ID_INDEX} index"),
            Err(err) if is_missing_index(&err) => {}
            Err(err) => return Err(err.into()),
        }

        let removed_classes = self.classes.delete_many(doc! {}).await?.deleted_count;
        let removed_orders = self.orders.delete_many(doc! {}).await?.deleted_count;
        debug!(removed_classes, removed_orders, "Cleared collections");

        let inserted = self
            .classes
            .clone_with_type::<NewClass>()
            .insert_many(classes)
            .await?;
        Ok(inserted.inserted_ids.len())
    }

    pub async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB connection closed");
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn find_classes(&self, query: &ClassQuery) -> Result<Vec<Class>, StoreError> {
        let mut find = self.classes.find(query.filter());
        if let Some(sort) = query.sort() {
            find = find.sort(sort);
        }
        let classes: Vec<Class> = find.await?.try_collect().await?;
        Ok(classes)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<ObjectId, StoreError> {
        let result = self.orders.insert_one(order_document(&order)).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::MissingInsertedId)
    }

    async fn update_class(
        &self,
        id: ObjectId,
        update: &ClassUpdate,
    ) -> Result<Option<Class>, StoreError> {
        let updated = self
            .classes
            .find_one_and_update(doc! { "_id": id }, update.to_document())
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }
}

fn order_document(order: &NewOrder) -> Document {
    let items: Vec<Document> = order
        .items
        .iter()
        .map(|item| doc! { "classId": item.class_id, "quantity": item.quantity })
        .collect();

    doc! {
        "name": order.name.as_str(),
        "phone": order.phone.as_str(),
        "items": items,
        "createdAt": DateTime::from_millis(order.created_at.timestamp_millis())
    }
}

// Dropping an index that was never created, or on a fresh database, is fine.
fn is_missing_index(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Command(command)
            if matches!(command.code_name.as_str(), "IndexNotFound" | "NamespaceNotFound")
    )
}
