//! Wrappers for the Knowledge Graph Entities endpoints.
//!
//! Every method is one `Client::call` plus envelope unwrapping. The only
//! policy living here is that a 404 from Get or Delete means "no such
//! entity" rather than an error; every other failure is returned unchanged.

use serde_json::Value;

use crate::client::Client;
use crate::config::Config;
use crate::entity::EntityRecord;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::{QueryParams, QueryValue};

/// Access to the Knowledge Graph API.
#[derive(Debug, Clone)]
pub struct KnowledgeGraphApi {
    client: Client,
}

impl KnowledgeGraphApi {
    pub fn new(config: Config) -> Self {
        Self::from_client(Client::new(config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Entities: Create.
    ///
    /// `entity_id` becomes the new entity's external id (`meta.id`); any
    /// other `meta` fields on `entity` are kept. Returns the full created
    /// entity.
    pub async fn create_entity<T: EntityRecord>(
        &self,
        entity_id: &str,
        entity_type: &str,
        entity: &T,
    ) -> Result<T, ApiError> {
        let body = with_external_id(entity, entity_id)?;
        let query: QueryParams = vec![("entityType".to_string(), QueryValue::from(entity_type))];
        let envelope = self
            .client
            .call(HttpMethod::Post, "entities", &query, Some(&body))
            .await?;
        envelope.into_response()
    }

    /// Entities: Get. Returns `None` when no entity has `entity_id`.
    pub async fn get_entity<T: EntityRecord>(&self, entity_id: &str) -> Result<Option<T>, ApiError> {
        let path = entity_path(entity_id);
        match self
            .client
            .call::<Value>(HttpMethod::Get, &path, &QueryParams::new(), None)
            .await
        {
            Ok(envelope) => envelope.into_response().map(Some),
            Err(e) if e.is_not_found() => {
                tracing::debug!(entity_id, "entity not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Entities: Update. `entity` holds only the fields to change and is
    /// sent as is. Returns the full updated entity.
    pub async fn update_entity<T: EntityRecord>(
        &self,
        entity_id: &str,
        entity: &T,
    ) -> Result<T, ApiError> {
        let envelope = self
            .client
            .call(HttpMethod::Put, &entity_path(entity_id), &QueryParams::new(), Some(entity))
            .await?;
        envelope.into_response()
    }

    /// Entities: Delete. Returns `false` when no entity has `entity_id`.
    pub async fn delete_entity(&self, entity_id: &str) -> Result<bool, ApiError> {
        match self
            .client
            .call::<Value>(HttpMethod::Delete, &entity_path(entity_id), &QueryParams::new(), None)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => {
                tracing::debug!(entity_id, "entity not found");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn entity_path(entity_id: &str) -> String {
    format!("entities/{entity_id}")
}

/// Serialize `entity` and set `meta.id`, merging with any existing `meta`.
fn with_external_id<T: EntityRecord>(entity: &T, entity_id: &str) -> Result<Value, ApiError> {
    let mut body = serde_json::to_value(entity).map_err(ApiError::Serialization)?;
    let kind = json_kind(&body);
    let fields = body.as_object_mut().ok_or(ApiError::InvalidRecord(kind))?;
    let meta = fields
        .entry("meta")
        .or_insert_with(|| Value::Object(Default::default()));
    if !meta.is_object() {
        *meta = Value::Object(Default::default());
    }
    if let Value::Object(meta) = meta {
        meta.insert("id".to_string(), Value::String(entity_id.to_string()));
    }
    Ok(body)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityMeta};
    use serde_json::json;

    #[test]
    fn external_id_is_injected_into_meta() {
        let body = with_external_id(&Entity::named("Store"), "loc1").unwrap();
        assert_eq!(body, json!({"name": "Store", "meta": {"id": "loc1"}}));
    }

    #[test]
    fn existing_meta_is_preserved() {
        let mut entity = Entity::named("Store");
        entity.meta = Some(EntityMeta {
            folder_id: Some("7".to_string()),
            id: Some("old".to_string()),
            ..EntityMeta::default()
        });
        let body = with_external_id(&entity, "loc1").unwrap();
        assert_eq!(body["meta"], json!({"folderId": "7", "id": "loc1"}));
    }

    #[test]
    fn non_object_meta_is_replaced() {
        let body = with_external_id(&json!({"meta": null, "name": "x"}), "loc1").unwrap();
        assert_eq!(body["meta"], json!({"id": "loc1"}));
    }

    #[test]
    fn non_object_record_is_rejected() {
        let err = with_external_id(&json!(["a"]), "loc1").unwrap_err();
        assert!(matches!(err, ApiError::InvalidRecord("an array")));
    }

    #[test]
    fn entity_path_appends_id() {
        assert_eq!(entity_path("loc1"), "entities/loc1");
    }
}
