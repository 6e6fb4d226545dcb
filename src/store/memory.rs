use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{Class, NewClass, NewOrder, Order};
use crate::search::ClassQuery;
use crate::updates::ClassUpdate;

/// In-process store with the same query semantics as [`super::MongoStore`].
#[derive(Default)]
pub struct MemoryStore {
    classes: RwLock<Vec<Class>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classes(classes: impl IntoIterator<Item = NewClass>) -> Self {
        let classes = classes
            .into_iter()
            .map(|class| class.with_id(ObjectId::new()))
            .collect();
        Self {
            classes: RwLock::new(classes),
            orders: RwLock::default(),
        }
    }

    pub async fn classes(&self) -> Vec<Class> {
        self.classes.read().await.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_classes(&self, query: &ClassQuery) -> Result<Vec<Class>, StoreError> {
        let mut found: Vec<Class> = self
            .classes
            .read()
            .await
            .iter()
            .filter(|class| query.matches(class))
            .cloned()
            .collect();
        if query.sort().is_some() {
            found.sort_by(|a, b| a.subject.cmp(&b.subject));
        }
        Ok(found)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.orders.write().await.push(order.with_id(id));
        Ok(id)
    }

    async fn update_class(
        &self,
        id: ObjectId,
        update: &ClassUpdate,
    ) -> Result<Option<Class>, StoreError> {
        let mut classes = self.classes.write().await;
        let Some(class) = classes.iter_mut().find(|class| class.id == id) else {
            return Ok(None);
        };
        update.apply(class);
        Ok(Some(class.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::seed::sample_classes;

    #[tokio::test]
    async fn test_find_all_sorted_by_subject() {
        let store = MemoryStore::with_classes(sample_classes());
        let classes = store.find_classes(&ClassQuery::all()).await.unwrap();

        assert_eq!(classes.len(), sample_classes().len());
        assert!(classes.windows(2).all(|pair| pair[0].subject <= pair[1].subject));
    }

    #[tokio::test]
    async fn test_update_unknown_class() {
        let store = MemoryStore::with_classes(sample_classes());
        let update = ClassUpdate {
            spaces: Some(1),
            ..ClassUpdate::default()
        };
        let result = store.update_class(ObjectId::new(), &update).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_insert_order_assigns_id() {
        let store = MemoryStore::new();
        let order = NewOrder {
            name: "Ada".to_string(),
            phone: "123456".to_string(),
            items: vec![],
            created_at: Utc::now(),
        };

        let id = store.insert_order(order).await.unwrap();
        let orders = store.orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, id);
    }
}
