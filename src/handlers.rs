use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use tracing::info;

use crate::openapi::{ClassChanges, OrderSubmission};
use crate::{
    AppState,
    error::ApiError,
    models::{Class, OrderCreated},
    orders::OrderRequest,
    search::ClassQuery,
    updates::ClassUpdate,
};

#[derive(Debug, serde::Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[utoipa::path(get, path = "/health", tag = "health")]
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/lessons",
    responses(
        (status = 200, description = "All classes sorted by subject", body = [Class])
    ),
    tag = "lessons"
)]
pub async fn list_lessons(State(state): State<AppState>) -> Result<Json<Vec<Class>>, ApiError> {
    let classes = state.store.find_classes(&ClassQuery::all()).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/search",
    params(
        ("q" = Option<String>, Query, description = "Text matched against subject, location, price and spaces")
    ),
    responses(
        (status = 200, description = "Matching classes", body = [Class])
    ),
    tag = "lessons"
)]
pub async fn search_lessons(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Class>>, ApiError> {
    let query = ClassQuery::parse(params.q.as_deref());
    let classes = state.store.find_classes(&query).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderSubmission,
    responses(
        (status = 201, description = "Order stored", body = OrderCreated),
        (status = 400, description = "Order failed validation")
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let order = OrderRequest::parse(&payload)?.placed_at(Utc::now());
    let item_count = order.items.len();

    let order_id = state.store.insert_order(order).await?;
    info!(order_id = %order_id, items = item_count, "order placed");

    Ok((StatusCode::CREATED, Json(OrderCreated { order_id })))
}

#[utoipa::path(
    put,
    path = "/lessons/{id}",
    params(
        ("id" = String, Path, description = "Class identifier")
    ),
    request_body = ClassChanges,
    responses(
        (status = 200, description = "Updated class", body = Class),
        (status = 400, description = "Invalid fields or class identifier"),
        (status = 404, description = "Class not found")
    ),
    tag = "lessons"
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Class>, ApiError> {
    let Json(payload) = payload?;
    let update = ClassUpdate::from_payload(&payload)?;
    let class_id = id
        .ok()
        .and_then(|Path(id)| ObjectId::parse_str(&id).ok())
        .ok_or(ApiError::MalformedIdentifier)?;

    let class = state
        .store
        .update_class(class_id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Class not found.".into()))?;
    info!(class_id = %class_id, "class updated");

    Ok(Json(class))
}

pub async fn image_not_found() -> ApiError {
    ApiError::NotFound("Image not found".into())
}
