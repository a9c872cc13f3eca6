//! API integration tests
//!
//! Drive the full router, middleware included, against in-memory ports.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::PortError;
use domain_catalog::MockPlanCatalog;
use domain_quote::MockSubmissionPort;
use interface_api::{config::ApiConfig, create_router, handlers::quotes, AppState};
use test_utils::{assert_error_body, PlanFixtures, QuoteFixtures};

struct TestApp {
    server: TestServer,
    state: AppState,
    port: Arc<MockSubmissionPort>,
    catalog: Arc<MockPlanCatalog>,
}

impl TestApp {
    fn new() -> Self {
        Self::build(ApiConfig::default(), MockSubmissionPort::new())
    }

    /// App whose quote backend answers only after `latency`
    fn slow(latency: Duration) -> Self {
        Self::build(ApiConfig::default(), MockSubmissionPort::with_latency(latency))
    }

    fn build(config: ApiConfig, port: MockSubmissionPort) -> Self {
        let port = Arc::new(port);
        let catalog = Arc::new(PlanFixtures::mock_catalog());
        let state = AppState::new(config, port.clone(), catalog.clone());
        Self {
            server: TestServer::new(create_router(state.clone())).unwrap(),
            state,
            port,
            catalog,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match method {
            "GET" => self.server.get(uri),
            "POST" => self.server.post(uri),
            "PUT" => self.server.put(uri),
            "DELETE" => self.server.delete(uri),
            other => panic!("unsupported method {}", other),
        };
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };

        let response = request.await;
        let status = response.status_code();
        let text = response.text();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, body)
    }

    async fn open(&self) -> String {
        let (status, view) = self.send("POST", "/api/v1/quotes", None).await;
        assert_eq!(status, StatusCode::CREATED);
        view["session_id"].as_str().unwrap().to_string()
    }

    async fn set(&self, id: &str, fields: Value) -> (StatusCode, Value) {
        self.send(
            "PUT",
            &format!("/api/v1/quotes/{}/fields", id),
            Some(json!({ "fields": fields })),
        )
        .await
    }

    async fn advance(&self, id: &str) -> (StatusCode, Value) {
        self.send("POST", &format!("/api/v1/quotes/{}/advance", id), None)
            .await
    }

    /// Fills the reference quote and stops on the contact step
    async fn reference_to_contact(&self) -> String {
        let id = self.open().await;
        let inputs = QuoteFixtures::reference_inputs();
        let last = inputs.len() - 1;
        for (index, step_inputs) in inputs.into_iter().enumerate() {
            let fields: Vec<Value> = step_inputs
                .into_iter()
                .map(|(path, raw)| json!({ "path": path.as_str(), "value": raw }))
                .collect();
            let (status, _) = self.set(&id, Value::Array(fields)).await;
            assert_eq!(status, StatusCode::OK);
            if index < last {
                let (status, body) = self.advance(&id).await;
                assert_eq!(status, StatusCode::OK, "advance failed: {}", body);
            }
        }
        id
    }
}

fn field<'a>(view: &'a Value, path: &str) -> Option<&'a Value> {
    view["fields"]
        .as_array()
        .and_then(|fields| fields.iter().find(|f| f["path"] == path))
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_open_session_starts_on_step_one() {
        let app = TestApp::new();
        let (status, view) = app.send("POST", "/api/v1/quotes", None).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view["step"], 1);
        assert_eq!(view["can_retreat"], false);
        assert_eq!(view["can_advance"], true);
        assert!(field(&view, "householdGroup").is_some());
        assert!(field(&view, "residenceZone").is_some());
        assert_eq!(field(&view, "householdGroup").unwrap()["options"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_set_fields_accepts_numbers_and_strings() {
        let app = TestApp::new();
        let id = app.open().await;

        app.set(
            &id,
            json!([
                { "path": "householdGroup", "value": "SELF_PARTNER_CHILDREN" },
                { "path": "residenceZone", "value": "GBA_NORTH" },
            ]),
        )
        .await;
        app.advance(&id).await;

        let (status, view) = app
            .set(
                &id,
                json!([
                    { "path": "primaryAge", "value": 41 },
                    { "path": "childCount", "value": "2" },
                    { "path": "firstChildAge", "value": "7" },
                ]),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], 2);
        assert_eq!(field(&view, "primaryAge").unwrap()["value"], 41);
        assert_eq!(field(&view, "firstChildAge").unwrap()["value"], 7);
        assert!(field(&view, "partnerAge").is_some());
    }

    #[tokio::test]
    async fn test_advance_without_choices_is_unprocessable() {
        let app = TestApp::new();
        let id = app.open().await;

        let (status, body) = app.advance(&id).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_error_body(&body, "validation_error");
        assert_eq!(body["details"], json!(["householdGroup"]));

        let (_, view) = app.send("GET", &format!("/api/v1/quotes/{}", id), None).await;
        assert_eq!(view["step"], 1);
        assert_eq!(view["last_error"]["kind"], "validation");
    }

    #[tokio::test]
    async fn test_unknown_field_path_is_bad_request() {
        let app = TestApp::new();
        let id = app.open().await;

        let (status, body) = app.set(&id, json!([{ "path": "contact.age", "value": "3" }])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_body(&body, "bad_request");
    }

    #[tokio::test]
    async fn test_batch_with_unknown_path_applies_nothing() {
        let app = TestApp::new();
        let id = app.open().await;

        let (status, body) = app
            .set(
                &id,
                json!([
                    { "path": "householdGroup", "value": "SELF_ONLY" },
                    { "path": "residenceZone", "value": "CABA" },
                    { "path": "contact.age", "value": "3" },
                ]),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_body(&body, "bad_request");

        let (_, view) = app.send("GET", &format!("/api/v1/quotes/{}", id), None).await;
        assert_eq!(field(&view, "householdGroup").unwrap()["value"], Value::Null);
        assert_eq!(field(&view, "residenceZone").unwrap()["value"], Value::Null);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let config = ApiConfig {
            session_ttl_secs: 0,
            ..Default::default()
        };
        let app = TestApp::build(config, MockSubmissionPort::new());
        let stale = app.open().await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let fresh = app.open().await;
        let (status, _) = app.send("GET", &format!("/api/v1/quotes/{}", stale), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(app.state.sessions.contains(fresh.parse().unwrap()).await);
        assert_eq!(app.state.sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_sessions() {
        let app = TestApp::new();

        let unknown = uuid_like();
        let (status, body) = app.send("GET", &format!("/api/v1/quotes/{}", unknown), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error_body(&body, "not_found");

        let (status, body) = app.send("GET", "/api/v1/quotes/not-a-session", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error_body(&body, "bad_request");
    }

    #[tokio::test]
    async fn test_retreat_and_reset() {
        let app = TestApp::new();
        let id = app.reference_to_contact().await;

        let (status, view) = app
            .send("POST", &format!("/api/v1/quotes/{}/retreat", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], 3);
        assert_eq!(field(&view, "enrollmentType").unwrap()["value"], "PRIVATE");

        let (status, view) = app
            .send("POST", &format!("/api/v1/quotes/{}/reset", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["step"], 1);
        assert_eq!(field(&view, "householdGroup").unwrap()["value"], Value::Null);
    }

    #[tokio::test]
    async fn test_close_session() {
        let app = TestApp::new();
        let id = app.open().await;
        let uri = format!("/api/v1/quotes/{}", id);

        let (status, _) = app.send("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.send("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn uuid_like() -> &'static str {
        "0191c8a2-5d2e-7c3b-9a10-3f5e2d1c0b9a"
    }
}

mod submission_tests {
    use super::*;

    #[tokio::test]
    async fn test_reference_quote_is_submitted() {
        let app = TestApp::new();
        let id = app.reference_to_contact().await;

        let (_, view) = app.send("GET", &format!("/api/v1/quotes/{}", id), None).await;
        assert_eq!(view["step"], 4);
        assert_eq!(view["submits_on_advance"], true);

        let (status, body) = app.advance(&id).await;
        assert_eq!(status, StatusCode::OK, "submission failed: {}", body);
        assert_eq!(body["view"]["step"], 5);
        assert_eq!(body["view"]["can_advance"], false);
        assert_eq!(body["receipt"]["response"], json!({ "success": true }));

        let accepted = app.port.accepted().await;
        assert_eq!(accepted.len(), 1);
        assert_eq!(
            serde_json::to_value(&accepted[0]).unwrap(),
            QuoteFixtures::reference_wire_payload()
        );
    }

    #[tokio::test]
    async fn test_failed_submission_can_be_retried() {
        let app = TestApp::new();
        let id = app.reference_to_contact().await;
        app.port
            .fail_next(PortError::Connection {
                message: "connection refused".to_string(),
                source: None,
            })
            .await;

        let (status, body) = app.advance(&id).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_error_body(&body, "submission_failed");
        assert_eq!(body["message"], "Could not connect to the server");

        let (_, view) = app.send("GET", &format!("/api/v1/quotes/{}", id), None).await;
        assert_eq!(view["step"], 4);
        assert_eq!(view["is_submitting"], false);
        assert_eq!(view["last_error"]["kind"], "submission");

        let (status, body) = app.advance(&id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["step"], 5);
        assert_eq!(body["view"]["last_error"], Value::Null);
        assert_eq!(app.port.attempts().await, 2);
        assert_eq!(app.port.accepted().await.len(), 1);
    }

    #[tokio::test]
    async fn test_completed_session_rejects_navigation() {
        let app = TestApp::new();
        let id = app.reference_to_contact().await;
        app.advance(&id).await;

        let (status, body) = app.advance(&id).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_error_body(&body, "conflict");

        let (status, _) = app
            .send("POST", &format!("/api/v1/quotes/{}/retreat", id), None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(app.port.attempts().await, 1);
    }

    #[tokio::test]
    async fn test_dropped_advance_still_completes_submission() {
        let app = TestApp::slow(Duration::from_millis(500));
        let id = app.reference_to_contact().await;

        let dropped = tokio::time::timeout(
            Duration::from_millis(50),
            quotes::advance(State(app.state.clone()), Path(id.clone())),
        )
        .await;
        assert!(dropped.is_err());

        tokio::time::sleep(Duration::from_millis(600)).await;

        let (status, view) = app.send("GET", &format!("/api/v1/quotes/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["is_submitting"], false);
        assert_eq!(view["step"], 5);
        assert_eq!(app.port.attempts().await, 1);
        assert_eq!(app.port.accepted().await.len(), 1);
    }

    #[tokio::test]
    async fn test_session_closed_mid_submission() {
        let app = TestApp::slow(Duration::from_millis(300));
        let id = app.reference_to_contact().await;
        let uri = format!("/api/v1/quotes/{}", id);

        let close = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            app.send("DELETE", &uri, None).await
        };
        let ((advance_status, body), (close_status, _)) = tokio::join!(app.advance(&id), close);

        assert_eq!(close_status, StatusCode::NO_CONTENT);
        assert_eq!(advance_status, StatusCode::NOT_FOUND);
        assert_error_body(&body, "not_found");
        assert!(body.get("receipt").is_none());

        let (status, _) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(app.state.sessions.is_empty().await);
        assert_eq!(app.port.attempts().await, 1);
    }
}

mod plan_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_plans_in_catalog_order() {
        let app = TestApp::new();
        let (status, body) = app.send("GET", "/api/v1/plans", None).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["as-200", "as-300", "g-azul"]);
        assert_eq!(body[2]["price"], 36500.0);
        assert_eq!(body[0]["attribute_groups"][0]["name"], "Coberturas");
    }

    #[tokio::test]
    async fn test_get_plan() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/api/v1/plans/as-300", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "Avalian");

        let (status, body) = app.send("GET", "/api/v1/plans/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error_body(&body, "not_found");
    }

    #[tokio::test]
    async fn test_catalog_outage_is_service_unavailable() {
        let app = TestApp::new();
        app.catalog
            .fail_next(PortError::ServiceUnavailable {
                service: "catalog".to_string(),
            })
            .await;

        let (status, body) = app.send("GET", "/api/v1/plans", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_error_body(&body, "service_unavailable");
    }
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new();
        let (status, body) = app.send("GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_counts_sessions() {
        let app = TestApp::new();
        app.open().await;
        app.open().await;

        let (status, body) = app.send("GET", "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["open_sessions"], 2);
        assert_eq!(body["adapters"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let app = TestApp::new();
        let response = app
            .server
            .get("/health")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("req-123"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("x-request-id"), "req-123");
    }
}
