//! The credit-decision engine and the workflow that wraps it.
//!
//! Everything under `domain`, `emi`, `score`, and `eligibility` is a pure
//! function over caller-supplied values; the current date is always an
//! explicit parameter. Persistence sits behind [`store::CustomerStore`], and
//! [`service::LendingService`] is the only place that touches both.

pub mod domain;
pub mod eligibility;
pub mod emi;
pub mod http;
pub mod ingest;
pub mod policy;
pub mod score;
pub mod service;
pub mod store;

pub use domain::{end_date_for, Customer, CustomerId, Loan, LoanId, LoanStatus};
pub use http::lending_router;
pub use eligibility::{evaluate, EligibilityDecision, LoanRequest};
pub use emi::{monthly_installment, InstallmentError};
pub use policy::LendingPolicy;
pub use score::{credit_score, score_breakdown, ScoreBreakdown};
pub use service::{LendingService, LendingServiceError, RegistrationRequest};
pub use store::{CustomerStore, StoreError};
