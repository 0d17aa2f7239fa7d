use thiserror::Error;

use super::domain::{Customer, CustomerId, Loan, LoanId};

/// Storage abstraction injected into the lending workflow so the decision
/// engine stays pure and testable without a running process. Implementations
/// may be backed by anything that can resolve these synchronously.
pub trait CustomerStore: Send + Sync {
    fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;
    fn loans_for_customer(&self, id: CustomerId) -> Result<Vec<Loan>, StoreError>;
    fn find_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError>;
    fn all_customers(&self) -> Result<Vec<Customer>, StoreError>;
    fn all_loans(&self) -> Result<Vec<Loan>, StoreError>;
    fn next_customer_id(&self) -> Result<CustomerId, StoreError>;
    fn next_loan_id(&self) -> Result<LoanId, StoreError>;
    fn persist_customer(&self, customer: Customer) -> Result<(), StoreError>;
    fn persist_loan(&self, loan: Loan) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
