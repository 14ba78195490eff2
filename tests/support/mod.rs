// Shared stub backend and fakes for the API client integration tests.
use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tour_frontend::domain::{Notification, NotificationSink, SessionInvalidator};

// Slower than any client timeout used in tests.
pub const SLOW_RESPONSE: Duration = Duration::from_millis(500);

// Start the stub backend on an ephemeral port and return its API base URL.
pub async fn spawn_backend() -> String {
    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    // Serve on the test runtime; the task ends with the test.
    tokio::spawn(async move {
        axum::serve(listener, Router::new().nest("/api", routes()))
            .await
            .expect("stub backend failed");
    });

    format!("http://{addr}/api")
}

// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}/api")
}

fn routes() -> Router {
    Router::new()
        .route("/excursions", get(list_excursions))
        .route("/bookings", post(create_booking))
        .route("/bookings/{id}", delete(cancel_booking))
        .route("/signup", post(signup))
        .route("/profile", get(profile))
        .route("/status", get(unavailable))
        .route("/slow", get(slow))
        .route("/broken", get(broken))
        .route("/whoami", get(whoami))
}

async fn list_excursions() -> Json<Value> {
    Json(json!([
        { "id": 1, "title": "Harbor sunset cruise", "seatsLeft": 12 },
        { "id": 2, "title": "Waterfall trail", "seatsLeft": 0 }
    ]))
}

async fn create_booking() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "validationErrors": { "nomeCompleto": "obrigatório" } })),
    )
}

async fn signup() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "code": "VALIDATION_FAILED",
            "errors": { "email": "already registered", "senha": "too short" }
        })),
    )
}

async fn cancel_booking() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn profile() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "message": "session expired", "code": "TOKEN_EXPIRED" } })),
    )
}

async fn unavailable() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_RESPONSE).await;
    Json(json!({ "ok": true }))
}

async fn broken() -> &'static str {
    "<html>maintenance</html>"
}

async fn whoami(headers: HeaderMap) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({ "authorization": authorization }))
}

// Sink that keeps every toast so tests can assert on what users would see.
#[derive(Clone, Default)]
pub struct RecordingSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .expect("notifications mutex poisoned")
            .iter()
            .map(|notification| notification.message.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("notifications mutex poisoned")
            .push(notification);
    }
}

// Counts how often the client asked the auth collaborator to drop the session.
#[derive(Clone, Default)]
pub struct CountingInvalidator {
    calls: Arc<AtomicUsize>,
}

impl CountingInvalidator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SessionInvalidator for CountingInvalidator {
    async fn invalidate_session(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
