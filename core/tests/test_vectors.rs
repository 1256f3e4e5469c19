//! Verify request building and response handling against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each entity vector describes an operation, the request the client must
//! send, a simulated response, and the expected outcome. A canned transport
//! records the request and replays the response. Comparing parsed JSON (not
//! raw strings) avoids false negatives from field ordering.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::Value;
use yext_core::{
    ApiError, Client, Config, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
    KnowledgeGraphApi, NetworkError, DEFAULT_V_PARAM,
};

const API_KEY: &str = "vector-key";

/// Replays one response and remembers every request it was given.
struct CannedTransport {
    response: HttpResponse,
    seen: Mutex<Vec<HttpRequest>>,
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Base URL
// ---------------------------------------------------------------------------

#[test]
fn base_url_test_vectors() {
    let raw = include_str!("../../test-vectors/base_url.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config: Config = serde_json::from_value(case["config"].clone()).unwrap();
        let client = Client::new(config);
        assert_eq!(
            client.base_url(),
            case["expected_base_url"].as_str().unwrap(),
            "{name}"
        );
        assert_eq!(client.v_param(), DEFAULT_V_PARAM, "{name}");
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

async fn run_operation(kg: &KnowledgeGraphApi, case: &Value) -> Result<Value, ApiError> {
    let entity_id = case["entity_id"].as_str().unwrap();
    match case["operation"].as_str().unwrap() {
        "create" => {
            let entity_type = case["entity_type"].as_str().unwrap();
            kg.create_entity(entity_id, entity_type, &case["input"]).await
        }
        "get" => kg
            .get_entity::<Value>(entity_id)
            .await
            .map(|found| found.unwrap_or(Value::Null)),
        "update" => kg.update_entity(entity_id, &case["input"]).await,
        "delete" => kg.delete_entity(entity_id).await.map(Value::Bool),
        other => panic!("unknown operation: {other}"),
    }
}

#[tokio::test]
async fn entity_test_vectors() {
    let raw = include_str!("../../test-vectors/entities.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let transport = Arc::new(CannedTransport {
            response: HttpResponse {
                status: sim["status"].as_u64().unwrap() as u16,
                headers: Vec::new(),
                body: sim["body"].as_str().unwrap().into(),
            },
            seen: Mutex::new(Vec::new()),
        });
        let client = Client::with_transport(Config::new(API_KEY), transport.clone());
        let kg = KnowledgeGraphApi::from_client(client);

        let result = run_operation(&kg, case).await;

        // Exactly one request, shaped as the vector says.
        let seen = transport.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1, "{name}: request count");
        let req = &seen[0];
        let expected_req = &case["expected_request"];
        assert_eq!(
            req.method,
            parse_method(expected_req["method"].as_str().unwrap()),
            "{name}: method"
        );

        let url = url::Url::parse(&req.url).unwrap();
        assert_eq!(url.host_str(), Some("api.yext.com"), "{name}: host");
        assert_eq!(
            url.path(),
            format!("/v2/accounts/me/{}", expected_req["path"].as_str().unwrap()),
            "{name}: path"
        );

        let mut expected_query = vec![
            ("api_key".to_string(), API_KEY.to_string()),
            ("v".to_string(), DEFAULT_V_PARAM.to_string()),
        ];
        for pair in expected_req["query"].as_array().unwrap() {
            expected_query.push((
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            ));
        }
        let actual_query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(actual_query, expected_query, "{name}: query");

        if expected_req["body"].is_null() {
            assert!(req.body.is_none(), "{name}: no body");
            assert!(req.headers.is_empty(), "{name}: no content-type");
        } else {
            let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(body, expected_req["body"], "{name}: body");
            assert_eq!(
                req.headers,
                vec![(
                    "content-type".to_string(),
                    "application/json; charset=utf-8".to_string()
                )],
                "{name}: headers"
            );
        }

        // Outcome.
        let expected = &case["expected_result"];
        match expected.get("error_status") {
            Some(status) => {
                let err = result.expect_err(name);
                assert_eq!(
                    err.status(),
                    Some(status.as_u64().unwrap() as u16),
                    "{name}: status"
                );
                assert_eq!(
                    err.response().unwrap().text(),
                    sim["body"].as_str().unwrap(),
                    "{name}: raw body kept"
                );
            }
            None => {
                let value = result.unwrap_or_else(|e| panic!("{name}: {e}"));
                assert_eq!(value, expected["value"], "{name}: result");
            }
        }
    }
}
