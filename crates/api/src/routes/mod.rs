//! Route handlers for the chat API.

pub mod chat;
pub mod conversations;
pub mod dashboard;
pub mod health;
pub mod leads;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Chat widget
        .route("/api/chat", post(chat::chat))
        // Health check
        .route("/health", get(health::health))
        // Leads
        .route("/leads/recent", get(leads::recent))
        .route("/leads/:lead_id", put(leads::update))
        .route("/leads/conversation/:conversation_id", get(leads::conversation_messages))
        // Conversations
        .route("/conversations", get(conversations::list))
        .route("/conversations/:conversation_id", get(conversations::detail))
        // Dashboard
        .route("/dashboard/summary", get(dashboard::summary))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use brain_core::Brain;
    use database::Database;
    use mock_brain::ScriptedBrain;
    use orchestrator::{Orchestrator, OrchestratorConfig, SalesKnowledge};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::AppState;

    pub async fn test_state(reply: &str) -> AppState {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();

        let brain: Box<dyn Brain> = Box::new(ScriptedBrain::new(reply));
        let orchestrator = Orchestrator::new(
            brain,
            db.clone(),
            &SalesKnowledge::default(),
            OrchestratorConfig::default(),
        );
        AppState::new(db, orchestrator)
    }

    pub fn app(state: AppState) -> Router {
        super::router().with_state(state)
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}
