use mongodb::bson::{Document, doc};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::Class;
use crate::validation::{coerce_integer, coerce_number};

/// Sparse set of class fields a client may change.
///
/// Anything outside `subject`, `location`, `description`, `price`, `spaces`
/// and `image` is dropped when parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassUpdate {
    pub subject: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub spaces: Option<u32>,
    pub image: Option<String>,
}

impl ClassUpdate {
    pub fn from_payload(payload: &Value) -> Result<Self, ApiError> {
        let empty = Map::new();
        let fields = payload.as_object().unwrap_or(&empty);
        let mut errors = Vec::new();

        let mut text = |key: &str, label: &str| -> Option<String> {
            match fields.get(key)? {
                Value::String(value) => Some(value.clone()),
                _ => {
                    errors.push(format!("{label} must be a string."));
                    None
                }
            }
        };
        let subject = text("subject", "Subject");
        let location = text("location", "Location");
        let description = text("description", "Description");
        let image = text("image", "Image");

        let price = fields.get("price").and_then(|raw| {
            let price = coerce_number(raw).filter(|price| *price >= 0.0);
            if price.is_none() {
                errors.push("Price must be a positive number.".to_string());
            }
            price
        });

        let spaces = fields.get("spaces").and_then(|raw| {
            let spaces = coerce_integer(raw).and_then(|spaces| u32::try_from(spaces).ok());
            if spaces.is_none() {
                errors.push("Spaces must be a non-negative integer.".to_string());
            }
            spaces
        });

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        let update = Self {
            subject,
            location,
            description,
            price,
            spaces,
            image,
        };
        if update.is_empty() {
            return Err(ApiError::NoValidFields);
        }
        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The `$set` body for this update.
    pub fn to_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(subject) = &self.subject {
            set.insert("subject", subject.as_str());
        }
        if let Some(location) = &self.location {
            set.insert("location", location.as_str());
        }
        if let Some(description) = &self.description {
            set.insert("description", description.as_str());
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(spaces) = self.spaces {
            set.insert("spaces", i64::from(spaces));
        }
        if let Some(image) = &self.image {
            set.insert("image", image.as_str());
        }
        doc! { "$set": set }
    }

    pub fn apply(&self, class: &mut Class) {
        if let Some(subject) = &self.subject {
            class.subject.clone_from(subject);
        }
        if let Some(location) = &self.location {
            class.location.clone_from(location);
        }
        if let Some(description) = &self.description {
            class.description.clone_from(description);
        }
        if let Some(price) = self.price {
            class.price = price;
        }
        if let Some(spaces) = self.spaces {
            class.spaces = spaces;
        }
        if let Some(image) = &self.image {
            class.image.clone_from(image);
        }
    }
}
