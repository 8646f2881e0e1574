//! HTTP request handlers for the collection API
//!
//! Handlers are thin: they map paths and bodies onto [`CollectionStore`]
//! operations and the results onto status codes. Only a failed create is
//! reported as a server error; every other store failure already arrives here
//! as "nothing found".
//!
//! [`CollectionStore`]: crate::storage::CollectionStore

use axum::{
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::core::AppState;
use crate::types::{Item, ItemId};

// Response types

/// Success body carrying a message and, usually, the affected item
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    /// Human readable outcome
    pub message: String,
    /// Affected item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// System health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current system status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Rejection returned by handlers and extractors
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl<T> MessageResponse<T> {
    /// Message with an attached item
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    /// Message only
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

impl ErrorResponse {
    /// Build an error body
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

fn not_found(collection: &str, id: &str) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        format!("Item {} not found in {}", id, collection),
    )
}

/// Item ids are numbers; any other path segment can never match
fn parse_id(raw: &str) -> Option<ItemId> {
    raw.parse().ok()
}

/// JSON object body extractor.
///
/// An empty body is rejected with 400 unless `server.require_body` is off, in
/// which case it reads as `{}`. Malformed JSON and non-object values are 400s.
#[derive(Debug)]
pub struct ItemPayload(pub Item);

impl FromRequest<AppState> for ItemPayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            warn!("Failed to read request body: {}", e);
            api_error(StatusCode::BAD_REQUEST, "Failed to read request body")
        })?;

        if body.iter().all(u8::is_ascii_whitespace) {
            if state.config.server.require_body {
                return Err(api_error(StatusCode::BAD_REQUEST, "Request body is required"));
            }
            return Ok(ItemPayload(Item::new()));
        }

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(item)) => Ok(ItemPayload(item)),
            Ok(_) => Err(api_error(
                StatusCode::BAD_REQUEST,
                "Request body must be a JSON object",
            )),
            Err(e) => {
                debug!("Malformed JSON body: {}", e);
                Err(api_error(StatusCode::BAD_REQUEST, "Malformed JSON"))
            }
        }
    }
}

// Collection handlers

/// `GET /{collection}`: every item, empty array when there is nothing to read
pub async fn list_items(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Json<Vec<Item>> {
    Json(state.store.list_all(&collection).await)
}

/// `POST /{collection}`: append an item under a fresh id
pub async fn create_item(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    ItemPayload(payload): ItemPayload,
) -> Result<(StatusCode, Json<MessageResponse<Item>>), ApiError> {
    match state.store.create(&collection, payload).await {
        Ok(item) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse::with_data("Item created", item)),
        )),
        Err(e) => {
            error!("Create in {:?} failed: {}", collection, e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create item",
            ))
        }
    }
}

/// `GET /{collection}/{id}`
pub async fn get_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Item>, ApiError> {
    let Some(item_id) = parse_id(&id) else {
        return Err(not_found(&collection, &id));
    };

    state
        .store
        .get_one(&collection, item_id)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&collection, &id))
}

/// `PATCH|PUT /{collection}/{id}`: merge the body into the item; `id` is kept
pub async fn update_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    ItemPayload(patch): ItemPayload,
) -> Result<Json<MessageResponse<Item>>, ApiError> {
    let Some(item_id) = parse_id(&id) else {
        return Err(not_found(&collection, &id));
    };

    state
        .store
        .update_item(&collection, item_id, patch)
        .await
        .map(|item| Json(MessageResponse::with_data("Item updated", item)))
        .ok_or_else(|| not_found(&collection, &id))
}

/// `DELETE /{collection}/{id}`
pub async fn delete_item(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<MessageResponse<Item>>, ApiError> {
    let Some(item_id) = parse_id(&id) else {
        return Err(not_found(&collection, &id));
    };

    if state.store.delete_item(&collection, item_id).await {
        Ok(Json(MessageResponse::message("Item deleted")))
    } else {
        Err(not_found(&collection, &id))
    }
}

// System handlers

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// API root: service information and the collections currently stored
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    let prefix = &state.config.server.api_prefix;
    Json(json!({
        "service": crate::NAME,
        "version": crate::VERSION,
        "status": "operational",
        "collections": state.store.collection_names().await,
        "endpoints": {
            "list": format!("GET {}/{{collection}}", prefix),
            "create": format!("POST {}/{{collection}}", prefix),
            "get": format!("GET {}/{{collection}}/{{id}}", prefix),
            "update": format!("PATCH {}/{{collection}}/{{id}}", prefix),
            "delete": format!("DELETE {}/{{collection}}/{{id}}", prefix),
            "health": "/health"
        }
    }))
}
