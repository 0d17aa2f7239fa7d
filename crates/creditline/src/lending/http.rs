//! HTTP surface for the lending workflow. The service binary wraps this
//! router with health, readiness, and metrics endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CustomerId, LoanId};
use super::eligibility::LoanRequest;
use super::service::{LendingService, LendingServiceError, RegistrationRequest};
use super::store::{CustomerStore, StoreError};

/// Router builder exposing the lending endpoints.
pub fn lending_router<S>(service: Arc<LendingService<S>>) -> Router
where
    S: CustomerStore + 'static,
{
    Router::new()
        .route("/register", post(register_handler::<S>))
        .route("/check-eligibility", post(check_eligibility_handler::<S>))
        .route("/create-loan", post(create_loan_handler::<S>))
        .route("/view-loan/:loan_id", get(view_loan_handler::<S>))
        .route("/view-loans/:customer_id", get(view_loans_handler::<S>))
        .route("/api/v1/customers", get(list_customers_handler::<S>))
        .route(
            "/api/v1/customers/:customer_id/stats",
            get(customer_stats_handler::<S>),
        )
        .route("/api/v1/loans/summary", get(loan_summary_handler::<S>))
        .with_state(service)
}

/// Candidate-loan payload shared by eligibility checks and loan creation.
/// `as_of` pins the evaluation date for reproducible decisions; it defaults
/// to the current local date.
#[derive(Debug, Deserialize)]
pub struct LoanApplicationPayload {
    pub customer_id: u32,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub tenure: u32,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl LoanApplicationPayload {
    fn request(&self) -> LoanRequest {
        LoanRequest {
            amount: self.loan_amount,
            interest_rate: self.interest_rate,
            term_months: self.tenure,
        }
    }

    fn evaluation_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn error_response(error: LendingServiceError) -> Response {
    let status = match &error {
        LendingServiceError::Registration(_) | LendingServiceError::Request(_) => {
            StatusCode::BAD_REQUEST
        }
        LendingServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        LendingServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        LendingServiceError::Store(StoreError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

async fn register_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
    axum::Json(payload): axum::Json<RegistrationRequest>,
) -> Response
where
    S: CustomerStore + 'static,
{
    match service.register_customer(payload) {
        Ok(customer) => {
            let body = json!({
                "customer_id": customer.id,
                "name": customer.full_name(),
                "age": customer.age,
                "monthly_income": customer.monthly_income,
                "approved_limit": customer.approved_limit,
                "phone_number": customer.phone_number,
            });
            (StatusCode::CREATED, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn check_eligibility_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
    axum::Json(payload): axum::Json<LoanApplicationPayload>,
) -> Response
where
    S: CustomerStore + 'static,
{
    let request = payload.request();
    let today = payload.evaluation_date();

    let decision = match service.check_eligibility(CustomerId(payload.customer_id), &request, today)
    {
        Ok(decision) => decision,
        Err(error) => return error_response(error),
    };

    // Quote the installment at the corrected rate, approved or not.
    let monthly_installment = match super::emi::monthly_installment(
        request.amount,
        decision.corrected_rate,
        request.term_months,
    ) {
        Ok(value) => value,
        Err(error) => return error_response(error.into()),
    };

    let body = json!({
        "customer_id": payload.customer_id,
        "approval": decision.approved,
        "interest_rate": decision.requested_rate,
        "corrected_interest_rate": decision.corrected_rate,
        "tenure": payload.tenure,
        "monthly_installment": monthly_installment,
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

async fn create_loan_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
    axum::Json(payload): axum::Json<LoanApplicationPayload>,
) -> Response
where
    S: CustomerStore + 'static,
{
    let request = payload.request();
    let today = payload.evaluation_date();

    match service.create_loan(CustomerId(payload.customer_id), &request, today) {
        Ok(outcome) => {
            let status = if outcome.approved {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let body = json!({
                "loan_id": outcome.loan_id,
                "customer_id": outcome.customer_id,
                "loan_approved": outcome.approved,
                "message": outcome.message,
                "monthly_installment": outcome.monthly_installment,
            });
            (status, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn view_loan_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
    Path(loan_id): Path<u32>,
) -> Response
where
    S: CustomerStore + 'static,
{
    match service.view_loan(LoanId(loan_id)) {
        Ok(details) => {
            let body = json!({
                "loan_id": details.loan.id,
                "customer": {
                    "id": details.customer.id,
                    "first_name": details.customer.first_name,
                    "last_name": details.customer.last_name,
                    "phone_number": details.customer.phone_number,
                    "age": details.customer.age,
                },
                "loan_amount": details.loan.principal,
                "interest_rate": details.loan.annual_rate_percent,
                "monthly_installment": details.loan.monthly_payment,
                "tenure": details.loan.term_months,
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn view_loans_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
    Path(customer_id): Path<u32>,
) -> Response
where
    S: CustomerStore + 'static,
{
    match service.loans_for_customer(CustomerId(customer_id)) {
        Ok(listing) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn list_customers_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
) -> Response
where
    S: CustomerStore + 'static,
{
    match service.customers() {
        Ok(customers) => (StatusCode::OK, axum::Json(customers)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn customer_stats_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
    Path(customer_id): Path<u32>,
) -> Response
where
    S: CustomerStore + 'static,
{
    let today = Local::now().date_naive();
    match service.customer_stats(CustomerId(customer_id), today) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn loan_summary_handler<S>(
    State(service): State<Arc<LendingService<S>>>,
) -> Response
where
    S: CustomerStore + 'static,
{
    let today = Local::now().date_naive();
    match service.portfolio_summary(today) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}
