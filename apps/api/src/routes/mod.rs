pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(health::root_handler))
        .route(
            "/match_resume",
            post(handlers::handle_match_resume).layer(upload_limit),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Any origin, method and header: the browser frontend is served from elsewhere.
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::ExtractorRegistry;
    use crate::llm_client::{ScoringError, ScoringService};

    struct Unused;

    #[async_trait]
    impl ScoringService for Unused {
        async fn score(&self, _prompt: &str) -> Result<String, ScoringError> {
            Err(ScoringError::Unavailable("not expected in this test".into()))
        }

        fn model(&self) -> &str {
            "unused"
        }
    }

    fn router() -> Router {
        let config = Config::from_lookup(|key| (key == "GEMINI_API_KEY").then(|| "k".to_string()))
            .unwrap();
        build_router(AppState {
            extractors: Arc::new(ExtractorRegistry::with_defaults()),
            scorer: Arc::new(Unused),
            config,
        })
    }

    #[tokio::test]
    async fn test_root_reports_running() {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Resume Matcher API is running.");
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/match_resume")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_get_on_match_resume_is_not_allowed() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/match_resume")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
