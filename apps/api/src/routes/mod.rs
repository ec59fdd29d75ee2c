pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/score", post(handlers::handle_score))
        .route("/api/v1/summarize", post(handlers::handle_summarize))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/example", get(handlers::handle_example))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::scoring::HeuristicScorer;
    use crate::config::Config;
    use crate::state::AppState;
    use crate::webhook::WebhookClient;

    fn test_state() -> AppState {
        AppState {
            config: Config {
                ai_api_key: None,
                ai_model: "llama3-70b-8192".to_string(),
                webhook_shared_secret: "dev-secret".to_string(),
                port: 8080,
                rust_log: "info".to_string(),
            },
            llm: None,
            webhook: WebhookClient::new("dev-secret".to_string()),
            scorer: Arc::new(HeuristicScorer),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_score_endpoint_returns_score_result() {
        let app = build_router(test_state());
        let payload = json!({
            "cv_text": "Data analyst, 10 years in python and sql. Master of Science.",
            "job_description": "Data Analyst with Python and SQL"
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["scores"]["overall"], 57);
        assert_eq!(body["scores"]["details"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_score_endpoint_rejects_empty_cv_text() {
        let app = build_router(test_state());
        let payload = json!({"cv_text": "", "job_description": "anything"});
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/score")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_summarize_endpoint_without_credential_is_503() {
        let app = build_router(test_state());
        let payload = json!({"cv_text": "John Doe, 6 years of python"});
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/summarize")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_example_endpoint_returns_cv_text() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["cv_text"].as_str().unwrap().contains("John Doe"));
    }

    fn multipart_body(boundary: &str, parts: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in parts {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    #[tokio::test]
    async fn test_extract_endpoint_degrades_to_empty_text() {
        let app = build_router(test_state());
        let boundary = "test-boundary";
        let body = multipart_body(boundary, &[("file", "definitely not a pdf")]);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/extract")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["cv_text"], "");
    }

    #[tokio::test]
    async fn test_analyze_endpoint_rejects_unreadable_upload() {
        let app = build_router(test_state());
        let boundary = "test-boundary";
        let body = multipart_body(
            boundary,
            &[
                ("file", "definitely not a pdf"),
                ("job_description", "Data Analyst"),
            ],
        );
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/analyze")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        // ValidationGap: no CV text available, scoring is not attempted.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
