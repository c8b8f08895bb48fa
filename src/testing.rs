//! Test helpers: an in-process stand-in for the telephony service

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};

use crate::phone::{PhoneClient, RefreshRequester};

/// Serves `router` on an ephemeral localhost port and counts every request it sees
pub struct MockPhoneSystem {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockPhoneSystem {
    pub async fn start(router: Router) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = router.layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let resp: Response = next.run(req).await;
                    resp
                }
            },
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, hits }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn client(&self) -> PhoneClient {
        PhoneClient::new("127.0.0.1", self.port(), Duration::from_secs(5)).unwrap()
    }

    /// Requests received so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A port nothing listens on
pub async fn unused_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Records refresh requests instead of polling
#[derive(Default)]
pub struct RefreshCounter(AtomicUsize);

impl RefreshCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl RefreshRequester for RefreshCounter {
    fn request_refresh(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// GET route that always answers with `body`
pub fn static_json(body: Value) -> MethodRouter {
    get(move || {
        let body = body.clone();
        async move { Json(body) }
    })
}

/// A healthy telephony service; `overrides` replace individual routes by path
pub fn phone_system_router(overrides: Vec<(&'static str, MethodRouter)>) -> Router {
    let mut routes: Vec<(&'static str, MethodRouter)> = vec![
        (
            "/api/calls/active",
            static_json(json!({"active_calls": [
                {"call_id": "c1", "phone_number": "+1555", "status": "ringing", "duration": 5}
            ]})),
        ),
        (
            "/api/call_history",
            static_json(json!({"calls": [
                {"call_id": "h1", "phone_number": "+1666", "status": "completed", "duration": 61},
                {"call_id": "h2", "phone_number": "+1777", "status": "failed", "duration": 0}
            ]})),
        ),
        (
            "/api/groups",
            static_json(json!({"groups": [{"name": "family", "member_count": 4}]})),
        ),
        (
            "/api/broadcasts",
            static_json(json!({"broadcasts": [
                {"name": "b1", "status": "processing", "total_numbers": 10, "completed": 3}
            ]})),
        ),
        ("/health", get(|| async { "ok" })),
    ];

    for (path, route) in overrides {
        match routes.iter_mut().find(|(p, _)| *p == path) {
            Some(existing) => existing.1 = route,
            None => routes.push((path, route)),
        }
    }

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, route)| router.route(path, route))
}
