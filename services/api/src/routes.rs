use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use creditline::lending::{lending_router, CustomerStore, LendingService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_lending_routes<S>(service: Arc<LendingService<S>>) -> axum::Router
where
    S: CustomerStore + 'static,
{
    lending_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryCustomerStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use creditline::lending::LendingPolicy;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let store = Arc::new(InMemoryCustomerStore::default());
        let service = Arc::new(LendingService::new(store, LendingPolicy::default()));
        with_lending_routes(service)
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload.get("status").and_then(Value::as_str), Some("ok"));
    }

    #[tokio::test]
    async fn register_then_check_eligibility_over_http() {
        let app = router();

        let response = app
            .clone()
            .oneshot(json_request(
                "/register",
                json!({
                    "first_name": "Asha",
                    "last_name": "Verma",
                    "age": 34,
                    "monthly_income": 50000.0,
                    "phone_number": "9876501234",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let registered = json_body(response).await;
        assert_eq!(
            registered.get("approved_limit").and_then(Value::as_f64),
            Some(1_800_000.0)
        );

        let response = app
            .oneshot(json_request(
                "/check-eligibility",
                json!({
                    "customer_id": 1,
                    "loan_amount": 500000.0,
                    "interest_rate": 10.0,
                    "tenure": 24,
                    "as_of": "2024-06-15",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let decision = json_body(response).await;
        assert_eq!(
            decision.get("approval").and_then(Value::as_bool),
            Some(true)
        );
        assert_eq!(
            decision.get("corrected_interest_rate").and_then(Value::as_f64),
            Some(10.0)
        );
    }

    #[tokio::test]
    async fn create_loan_then_view_it_over_http() {
        let app = router();

        let response = app
            .clone()
            .oneshot(json_request(
                "/register",
                json!({
                    "first_name": "Rohan",
                    "last_name": "Iyer",
                    "age": 41,
                    "monthly_income": 62000.0,
                    "phone_number": "9876509999",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "/create-loan",
                json!({
                    "customer_id": 1,
                    "loan_amount": 300000.0,
                    "interest_rate": 11.0,
                    "tenure": 18,
                    "as_of": "2024-06-15",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let outcome = json_body(response).await;
        assert_eq!(
            outcome.get("loan_approved").and_then(Value::as_bool),
            Some(true)
        );
        let loan_id = outcome
            .get("loan_id")
            .and_then(Value::as_u64)
            .expect("loan id");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/view-loan/{loan_id}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(
            view.get("loan_amount").and_then(Value::as_f64),
            Some(300_000.0)
        );
        assert_eq!(
            view.pointer("/customer/first_name").and_then(Value::as_str),
            Some("Rohan")
        );
    }

    #[tokio::test]
    async fn view_missing_loan_returns_not_found() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/view-loan/999")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn loan_summary_reports_empty_book() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/loans/summary")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let summary = json_body(response).await;
        assert_eq!(summary.get("total_loans").and_then(Value::as_u64), Some(0));
        assert_eq!(
            summary.get("average_interest_rate").and_then(Value::as_f64),
            Some(0.0)
        );
    }
}
