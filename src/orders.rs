use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{NewOrder, OrderItem};
use crate::validation::coerce_integer;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("regex compiles"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6,}$").expect("regex compiles"));

const INVALID_NAME: &str = "Name is required and must contain letters only.";
const INVALID_PHONE: &str = "Phone is required and must contain digits only.";
const MISSING_ITEMS: &str = "At least one item is required.";

/// An order payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub name: String,
    pub phone: String,
    pub items: Vec<OrderItem>,
}

impl OrderRequest {
    /// Validates an untyped order body.
    ///
    /// Every rule is checked before failing so the caller sees all
    /// violations at once.
    pub fn parse(payload: &Value) -> Result<Self, ApiError> {
        let mut errors = Vec::new();

        let name = payload
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| NAME_PATTERN.is_match(name) && !name.trim().is_empty());
        if name.is_none() {
            errors.push(INVALID_NAME.to_string());
        }

        let phone = payload
            .get("phone")
            .and_then(Value::as_str)
            .filter(|phone| PHONE_PATTERN.is_match(phone));
        if phone.is_none() {
            errors.push(INVALID_PHONE.to_string());
        }

        let raw_items = match payload.get("items") {
            Some(Value::Array(items)) if !items.is_empty() => items.as_slice(),
            _ => {
                errors.push(MISSING_ITEMS.to_string());
                &[]
            }
        };

        let mut items = Vec::with_capacity(raw_items.len());
        for (index, item) in raw_items.iter().enumerate() {
            match parse_item(index + 1, item) {
                Ok(item) => items.push(item),
                Err(message) => errors.push(message),
            }
        }

        match (name, phone) {
            (Some(name), Some(phone)) if errors.is_empty() => Ok(Self {
                name: name.trim().to_string(),
                phone: phone.trim().to_string(),
                items,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }

    pub fn placed_at(self, created_at: DateTime<Utc>) -> NewOrder {
        NewOrder {
            name: self.name,
            phone: self.phone,
            items: self.items,
            created_at,
        }
    }
}

// Reports only the first problem with each item.
fn parse_item(position: usize, item: &Value) -> Result<OrderItem, String> {
    let class_id = match item.get("classId") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) if id.is_empty() => None,
        Some(id) => Some(id),
    };
    let Some(class_id) = class_id else {
        return Err(format!("Item {position} is missing classId."));
    };

    let quantity = item
        .get("quantity")
        .and_then(coerce_integer)
        .filter(|quantity| *quantity > 0)
        .ok_or_else(|| format!("Item {position} must have a positive integer quantity."))?;

    let class_id = class_id
        .as_str()
        .and_then(|id| ObjectId::parse_str(id).ok())
        .ok_or_else(|| format!("Item {position} has an invalid classId."))?;

    Ok(OrderItem { class_id, quantity })
}
