use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

/// A bookable after-school class as stored in the `classes` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Class {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    #[schema(value_type = String, example = "6650f1c2a9d3b5e4f0a1b2c3")]
    pub id: ObjectId,
    pub subject: String,
    pub location: String,
    #[schema(example = 95)]
    pub price: f64,
    #[schema(example = 5)]
    pub spaces: u32,
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[schema(example = "/images/placeholder.svg")]
    pub image: String,
}

/// A class that has not been assigned an identifier yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewClass {
    pub subject: String,
    pub location: String,
    pub price: f64,
    pub spaces: u32,
    pub day: String,
    pub description: String,
    pub image: String,
}

impl NewClass {
    pub fn with_id(self, id: ObjectId) -> Class {
        Class {
            id,
            subject: self.subject,
            location: self.location,
            price: self.price,
            spaces: self.spaces,
            day: self.day,
            description: self.description,
            image: self.image,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub class_id: ObjectId,
    pub quantity: i64,
}

/// A validated order stamped with its creation time, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub name: String,
    pub phone: String,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: ObjectId,
    pub name: String,
    pub phone: String,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn with_id(self, id: ObjectId) -> Order {
        Order {
            id,
            name: self.name,
            phone: self.phone,
            items: self.items,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderCreated {
    #[serde(rename = "orderId", serialize_with = "serialize_object_id")]
    #[schema(value_type = String, example = "6650f1c2a9d3b5e4f0a1b2c4")]
    pub order_id: ObjectId,
}

// Identifiers leave the API as plain hex strings.
fn serialize_object_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_serializes_hex_id() {
        let id = ObjectId::parse_str("6650f1c2a9d3b5e4f0a1b2c3").unwrap();
        let class = NewClass {
            subject: "Drama Club".to_string(),
            location: "Mill Hill".to_string(),
            price: 85.0,
            spaces: 5,
            day: "Friday".to_string(),
            description: String::new(),
            image: "/images/placeholder.svg".to_string(),
        }
        .with_id(id);

        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["_id"], "6650f1c2a9d3b5e4f0a1b2c3");
        assert_eq!(json["subject"], "Drama Club");
        assert_eq!(json["spaces"], 5);
    }

    #[test]
    fn test_order_created_uses_order_id_key() {
        let id = ObjectId::parse_str("6650f1c2a9d3b5e4f0a1b2c4").unwrap();
        let json = serde_json::to_value(OrderCreated { order_id: id }).unwrap();
        assert_eq!(json, serde_json::json!({"orderId": "6650f1c2a9d3b5e4f0a1b2c4"}));
    }
}
