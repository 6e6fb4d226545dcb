use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::models::{Class, OrderCreated};

/// Body accepted by `POST /orders`.
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct OrderSubmission {
    #[schema(example = "Ada Lovelace", pattern = r"^[A-Za-z\s]+$")]
    name: String,
    #[schema(example = "07700900123", pattern = r"^[0-9]{6,}$")]
    phone: String,
    #[schema(min_items = 1)]
    items: Vec<OrderLine>,
}

#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct OrderLine {
    #[serde(rename = "classId")]
    #[schema(example = "6650f1c2a9d3b5e4f0a1b2c3")]
    class_id: String,
    #[schema(minimum = 1, example = 1)]
    quantity: u32,
}

/// Body accepted by `PUT /lessons/{id}`; unknown fields are ignored.
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct ClassChanges {
    subject: Option<String>,
    location: Option<String>,
    description: Option<String>,
    #[schema(minimum = 0)]
    price: Option<f64>,
    #[schema(minimum = 0)]
    spaces: Option<u32>,
    image: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health,
        crate::handlers::list_lessons,
        crate::handlers::search_lessons,
        crate::handlers::create_order,
        crate::handlers::update_lesson
    ),
    components(schemas(Class, OrderCreated, OrderSubmission, OrderLine, ClassChanges)),
    tags(
        (name = "health", description = "Liveness"),
        (name = "lessons", description = "Browse, search and edit after-school classes"),
        (name = "orders", description = "Place class orders")
    )
)]
pub struct ApiDoc;
