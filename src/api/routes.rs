//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::{DefaultOnFailure, TraceLayer};
use tracing::Level;

use super::handlers::{dice, health, metrics, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dice", get(dice))
        .route("/metrics", get(metrics))
        // Not-ready is an expected 500; keep it out of the error log.
        .layer(
            TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadinessSource;
    use crate::metrics::{sample_value, METRIC_APP_READY, METRIC_DICE_ROLLS};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Log output captured by a thread-local subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_ansi(false)
                .with_max_level(Level::TRACE)
                .with_writer(move || writer.clone())
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok_when_ready() {
        let app = create_router(AppState::new(ReadinessSource::fixed(true)));

        let response = get(&app, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn health_endpoint_returns_500_when_not_ready() {
        let app = create_router(AppState::new(ReadinessSource::fixed(false)));

        let response = get(&app, "/health").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, r#"{"status":"not-ready"}"#);
    }

    #[tokio::test]
    async fn dice_endpoint_returns_value_in_range() {
        let state = AppState::new(ReadinessSource::fixed(true));
        let app = create_router(state.clone());

        let response = get(&app, "/dice").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let value = body["dice"].as_u64().unwrap();
        assert!((1..=6).contains(&value));
        assert_eq!(state.rolls(), 1);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_ok_even_when_not_ready() {
        let state = AppState::new(ReadinessSource::fixed(true));
        let app = create_router(state.clone());
        state.set_ready(false);

        let response = get(&app, "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        let body = body_string(response).await;
        assert_eq!(sample_value(&body, METRIC_APP_READY), Some(0.0));
        assert_eq!(sample_value(&body, METRIC_DICE_ROLLS), Some(0.0));
    }

    #[tokio::test]
    async fn metrics_counter_follows_dice_calls() {
        let app = create_router(AppState::new(ReadinessSource::fixed(true)));

        for _ in 0..7 {
            assert_eq!(get(&app, "/dice").await.status(), StatusCode::OK);
        }

        let body = body_string(get(&app, "/metrics").await).await;
        assert_eq!(sample_value(&body, METRIC_DICE_ROLLS), Some(7.0));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = create_router(AppState::new(ReadinessSource::fixed(true)));

        let response = get(&app, "/roll").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn not_ready_health_logs_nothing_at_error() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let app = create_router(AppState::new(ReadinessSource::fixed(false)));

        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let output = logs.contents();
        assert!(output.contains("response failed"), "trace events missing: {output}");
        assert!(!output.contains("ERROR"), "unexpected error log: {output}");
    }

    #[tokio::test]
    async fn dice_logs_rolled_value() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let app = create_router(AppState::new(ReadinessSource::fixed(true)));

        let response = get(&app, "/dice").await;
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let value = body["dice"].as_u64().unwrap();

        let output = logs.contents();
        let expected = format!("Rolled dice: {value}");
        let line = output
            .lines()
            .find(|line| line.contains(&expected))
            .unwrap_or_else(|| panic!("no roll record in: {output}"));
        assert!(line.contains("INFO"), "roll logged at wrong level: {line}");
    }
}
