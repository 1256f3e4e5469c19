//! In-memory stand-in for the Yext Knowledge Graph Entities endpoints.
//!
//! Serves `/v2/accounts/{accountId}/entities[/{entityId}]`, checks that
//! `api_key` and `v` are present, and wraps every body in the standard
//! `{meta, response}` envelope, including error bodies.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Error code for a missing or empty `api_key`.
pub const CODE_UNAUTHORIZED: i64 = 1;
/// Error code for a missing `v` or malformed request.
pub const CODE_BAD_REQUEST: i64 = 2;
/// Error code for an unknown entity id.
pub const CODE_NOT_FOUND: i64 = 2000;
/// Error code for creating an entity whose id is taken.
pub const CODE_CONFLICT: i64 = 2001;

#[derive(Debug, Default, Deserialize)]
pub struct CommonParams {
    pub api_key: Option<String>,
    pub v: Option<String>,
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
}

/// Entities keyed by external id.
pub type Db = Arc<RwLock<HashMap<String, Map<String, Value>>>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/v2/accounts/{account_id}/entities", post(create_entity))
        .route(
            "/v2/accounts/{account_id}/entities/{entity_id}",
            get(get_entity).put(update_entity).delete(delete_entity),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Wrap `response` in a success envelope.
pub fn envelope(status: StatusCode, response: Value) -> Reply {
    (
        status,
        Json(json!({
            "meta": {"uuid": Uuid::new_v4().to_string(), "errors": []},
            "response": response,
        })),
    )
}

/// Envelope with one fatal error and an empty response.
pub fn failure(status: StatusCode, code: i64, message: &str) -> Reply {
    (
        status,
        Json(json!({
            "meta": {
                "uuid": Uuid::new_v4().to_string(),
                "errors": [{"code": code, "type": "FATAL_ERROR", "message": message}],
            },
            "response": {},
        })),
    )
}

fn check_auth(params: &CommonParams) -> Result<(), Reply> {
    if params.api_key.as_deref().unwrap_or("").is_empty() {
        return Err(failure(
            StatusCode::UNAUTHORIZED,
            CODE_UNAUTHORIZED,
            "Missing api_key",
        ));
    }
    if params.v.as_deref().unwrap_or("").is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            CODE_BAD_REQUEST,
            "Missing v parameter",
        ));
    }
    Ok(())
}

fn not_found(entity_id: &str) -> Reply {
    failure(
        StatusCode::NOT_FOUND,
        CODE_NOT_FOUND,
        &format!("Entity not found: {entity_id}"),
    )
}

/// Apply `f` to the entity's `meta` object, creating it when absent or not
/// an object.
fn edit_meta(entity: &mut Map<String, Value>, f: impl FnOnce(&mut Map<String, Value>)) {
    let mut meta = match entity.remove("meta") {
        Some(Value::Object(meta)) => meta,
        _ => Map::new(),
    };
    f(&mut meta);
    entity.insert("meta".to_string(), Value::Object(meta));
}

async fn create_entity(
    State(db): State<Db>,
    Path(account_id): Path<String>,
    Query(params): Query<CommonParams>,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(reply) = check_auth(&params) {
        return reply;
    }
    let Some(entity_type) = params.entity_type.filter(|t| !t.is_empty()) else {
        return failure(
            StatusCode::BAD_REQUEST,
            CODE_BAD_REQUEST,
            "Missing entityType parameter",
        );
    };
    let Value::Object(mut entity) = body else {
        return failure(
            StatusCode::BAD_REQUEST,
            CODE_BAD_REQUEST,
            "Body must be an object",
        );
    };
    let Some(id) = entity
        .get("meta")
        .and_then(|m| m.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        return failure(StatusCode::BAD_REQUEST, CODE_BAD_REQUEST, "Missing meta.id");
    };

    let mut entities = db.write().await;
    if entities.contains_key(&id) {
        return failure(
            StatusCode::CONFLICT,
            CODE_CONFLICT,
            &format!("Entity already exists: {id}"),
        );
    }
    edit_meta(&mut entity, |meta| {
        meta.insert("accountId".to_string(), Value::String(account_id));
        meta.insert("entityType".to_string(), Value::String(entity_type));
        meta.insert("uid".to_string(), Value::String(Uuid::new_v4().simple().to_string()));
    });
    entities.insert(id.clone(), entity.clone());
    tracing::debug!(%id, "created entity");
    envelope(StatusCode::CREATED, Value::Object(entity))
}

async fn get_entity(
    State(db): State<Db>,
    Path((_account_id, entity_id)): Path<(String, String)>,
    Query(params): Query<CommonParams>,
) -> Reply {
    if let Err(reply) = check_auth(&params) {
        return reply;
    }
    match db.read().await.get(&entity_id) {
        Some(entity) => envelope(StatusCode::OK, Value::Object(entity.clone())),
        None => not_found(&entity_id),
    }
}

async fn update_entity(
    State(db): State<Db>,
    Path((_account_id, entity_id)): Path<(String, String)>,
    Query(params): Query<CommonParams>,
    Json(body): Json<Value>,
) -> Reply {
    if let Err(reply) = check_auth(&params) {
        return reply;
    }
    let Value::Object(patch) = body else {
        return failure(
            StatusCode::BAD_REQUEST,
            CODE_BAD_REQUEST,
            "Body must be an object",
        );
    };
    let mut entities = db.write().await;
    let Some(entity) = entities.get_mut(&entity_id) else {
        return not_found(&entity_id);
    };
    for (key, value) in patch {
        if key == "meta" {
            // Only labels and folder can be changed through meta.
            if let Value::Object(meta_patch) = value {
                edit_meta(entity, |meta| {
                    for field in ["folderId", "labels"] {
                        if let Some(v) = meta_patch.get(field) {
                            meta.insert(field.to_string(), v.clone());
                        }
                    }
                });
            }
        } else {
            entity.insert(key, value);
        }
    }
    tracing::debug!(%entity_id, "updated entity");
    envelope(StatusCode::OK, Value::Object(entity.clone()))
}

async fn delete_entity(
    State(db): State<Db>,
    Path((_account_id, entity_id)): Path<(String, String)>,
    Query(params): Query<CommonParams>,
) -> Reply {
    if let Err(reply) = check_auth(&params) {
        return reply;
    }
    match db.write().await.remove(&entity_id) {
        Some(_) => {
            tracing::debug!(%entity_id, "deleted entity");
            envelope(StatusCode::OK, json!({}))
        }
        None => not_found(&entity_id),
    }
}
