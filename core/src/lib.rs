//! Typed async client for the Yext REST API.
//!
//! # Overview
//! `Client` turns a method, an endpoint path, query parameters and an
//! optional JSON body into one HTTPS request against
//! `https://{host}/v2/accounts/{accountId}/`, adding the `api_key` and `v`
//! parameters every Yext call needs. Successful responses come back as an
//! `ApiResponse` envelope; any non-2xx status is an `ApiError::Status`
//! carrying the raw response. `KnowledgeGraphApi` builds the Entities
//! endpoints on top of it.
//!
//! # Design
//! - `Client` is immutable after construction and cheap to clone.
//! - Request building and response classification are plain functions over
//!   `HttpRequest` / `HttpResponse`, so the I/O boundary is explicit and the
//!   network is reached only through the `HttpTransport` trait.
//! - One round-trip per call: no retries, caching or batching.
//!
//! ```rust,no_run
//! use yext_core::{Config, Entity, KnowledgeGraphApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let kg = KnowledgeGraphApi::new(Config::new("your-api-key"));
//! let created: Entity = kg
//!     .create_entity("loc1", "location", &Entity::named("Store"))
//!     .await?;
//! let fetched: Option<Entity> = kg.get_entity("loc1").await?;
//! # let _ = (created, fetched);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod http;
pub mod knowledge_graph;
pub mod query;
pub mod transport;

pub use client::Client;
pub use config::{Config, Environment, DEFAULT_ACCOUNT_ID, DEFAULT_V_PARAM};
pub use entity::{AddressValue, Entity, EntityMeta, EntityRecord, FieldValue, Location};
pub use envelope::{ApiResponse, MessageType, ResponseMessage, ResponseMeta};
pub use error::{ApiError, ConfigError, NetworkError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use knowledge_graph::KnowledgeGraphApi;
pub use query::{query, QueryParams, QueryValue};
pub use transport::{HttpTransport, ReqwestTransport};
