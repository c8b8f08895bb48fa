//! API module - HTTP surface the automation host talks to

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::phone::{CommandClient, Coordinator, PhoneClient};

/// Shared handler state; everything is injected from `main`
#[derive(Clone)]
pub struct BridgeState {
    pub coordinator: Arc<Coordinator>,
    pub commands: Arc<CommandClient>,
    pub client: PhoneClient,
    pub instance_id: String,
}

pub fn routes() -> Router<BridgeState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/api/status", get(handlers::get_status))
        // Sensors
        .route("/api/sensors", get(handlers::list_sensors))
        .route("/api/sensors/:key", get(handlers::get_sensor))
        // Services
        .route("/api/services/call", post(handlers::call_service))
        .route("/api/services/broadcast", post(handlers::broadcast_service))
        .route("/api/services/hangup", post(handlers::hangup_service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phone::RefreshRequester;
    use crate::testing::{phone_system_router, MockPhoneSystem};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn bridge(mock: &MockPhoneSystem) -> BridgeState {
        let client = mock.client();
        let coordinator = Arc::new(Coordinator::new(client.clone(), 10, Duration::from_secs(5)));
        let refresher: Arc<dyn RefreshRequester> = coordinator.clone();
        BridgeState {
            coordinator,
            commands: Arc::new(CommandClient::new(client.clone(), refresher)),
            client,
            instance_id: format!("127.0.0.1:{}", mock.port()),
        }
    }

    async fn send(state: BridgeState, req: Request<Body>) -> (StatusCode, Value) {
        let resp: Response = routes().with_state(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_req(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_sensor_endpoints() {
        let mock = MockPhoneSystem::start(phone_system_router(vec![])).await;
        let state = bridge(&mock);
        state.coordinator.refresh().await.unwrap();

        let (status, body) = send(state.clone(), get_req("/api/sensors/active_calls")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], json!(1));
        assert_eq!(body["available"], json!(true));
        assert_eq!(body["attributes"]["calls"][0]["call_id"], json!("c1"));

        let (status, body) = send(state.clone(), get_req("/api/sensors")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(|a| a.len()), Some(4));

        let (status, _) = send(state, get_req("/api/sensors/voicemail")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_call_service_validation_is_bad_request() {
        let mock = MockPhoneSystem::start(phone_system_router(vec![])).await;
        let state = bridge(&mock);

        let (status, body) = send(
            state,
            post_req("/api/services/call", json!({"phone_number": "+1555"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], json!(400));
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_call_service_upstream_failure_is_bad_gateway() {
        let router = phone_system_router(vec![(
            "/api/call",
            axum::routing::post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )]);
        let mock = MockPhoneSystem::start(router).await;
        let state = bridge(&mock);

        let (status, _) = send(
            state,
            post_req(
                "/api/services/call",
                json!({"phone_number": "+1555", "tts_text": "hello"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_hangup_service() {
        let router = phone_system_router(vec![(
            "/api/calls/:call_id/hangup",
            axum::routing::post(|| async { StatusCode::OK }),
        )]);
        let mock = MockPhoneSystem::start(router).await;
        let state = bridge(&mock);

        let (status, body) = send(
            state,
            post_req("/api/services/hangup", json!({"call_id": "c1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true, "call_id": "c1"}));
    }

    #[tokio::test]
    async fn test_unreadable_service_data_is_json_bad_request() {
        let mock = MockPhoneSystem::start(phone_system_router(vec![])).await;
        let state = bridge(&mock);

        let missing = Request::post("/api/services/hangup")
            .header("content-type", "application/json")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(state.clone(), missing).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], json!(400));
        assert!(body["error"].is_string());

        let malformed = Request::post("/api/services/hangup")
            .header("content-type", "application/json")
            .body(Body::from("{\"call_id\":"))
            .unwrap();
        let (status, body) = send(state.clone(), malformed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], json!(400));

        let (status, body) = send(
            state,
            post_req("/api/services/call", json!({"phone_number": 1555})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], json!(400));
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_health_route() {
        let mock = MockPhoneSystem::start(phone_system_router(vec![])).await;
        let state = bridge(&mock);

        let (status, _) = send(state.clone(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(state, get_req("/api/health")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_reports_staleness() {
        let mock = MockPhoneSystem::start(phone_system_router(vec![])).await;
        let state = bridge(&mock);

        let (status, body) = send(state.clone(), get_req("/api/status")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reachable"], json!(true));
        assert_eq!(body["available"], json!(false));

        state.coordinator.refresh().await.unwrap();
        let (_, body) = send(state, get_req("/api/status")).await;
        assert_eq!(body["available"], json!(true));
        assert!(body["last_updated"].is_string());
    }
}
