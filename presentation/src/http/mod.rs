//! HTTP surface
//!
//! Routes:
//!
//! | Method | Path                  | Response                        |
//! |--------|-----------------------|---------------------------------|
//! | POST   | `/stream/single`      | SSE token relay                 |
//! | POST   | `/stream/compare`     | SSE three-tier comparison       |
//! | POST   | `/completion`         | JSON single completion          |
//! | POST   | `/compare/analyze`    | JSON verdict over tier answers  |
//! | POST   | `/completion/analyze` | JSON verdict over temperatures  |
//! | GET    | `/health`             | plain-text liveness             |

pub mod dto;
pub mod handlers;
pub mod sse;
pub mod state;

pub use state::AppState;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/stream/single", post(handlers::stream_single))
        .route("/stream/compare", post(handlers::stream_compare))
        .route("/completion", post(handlers::completion))
        .route("/compare/analyze", post(handlers::compare_analyze))
        .route("/completion/analyze", post(handlers::completion_analyze))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
