//! Consumer credit approval service core.
//!
//! The `lending` module holds the decision engine: the customer/loan data
//! model, the installment calculator, the credit-score engine, and the
//! eligibility engine, together with the store abstraction and the service
//! that composes them. `config`, `telemetry`, and `error` carry the runtime
//! plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
