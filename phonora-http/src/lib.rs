mod error;
pub mod recognizer;
mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use phonora::{PronunciationAssessor, SentenceBank};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use recognizer::{NoRecognizer, SpeechRecognizer, WhisperConfig, WhisperRecognizer};

/// Everything a request handler needs; shared read-only across requests.
pub struct AppState {
    pub assessor: PronunciationAssessor,
    pub sentences: SentenceBank,
    pub recognizer: Arc<dyn SpeechRecognizer>,
}

/// Builds the router. When `frontend_dir` is given, unmatched paths are
/// served from it, so `/` returns its `index.html`.
pub fn create_server(state: AppState, frontend_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/ping", get(routes::ping))
        .route("/get-sentences", get(routes::get_sentences))
        .route("/evaluate", post(routes::evaluate));

    let router = match frontend_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app.into_make_service()).await
}
