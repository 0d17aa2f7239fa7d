//! Workflow that wraps the decision engine: registration, eligibility
//! checks, loan creation, and reporting over an injected store.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::domain::{end_date_for, Customer, CustomerId, Loan, LoanId, LoanStatus};
use super::eligibility::{evaluate, EligibilityDecision, LoanRequest};
use super::emi::{monthly_installment, InstallmentError};
use super::policy::LendingPolicy;
use super::store::{CustomerStore, StoreError};

/// Fields collected at customer registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub monthly_income: f64,
    pub phone_number: String,
}

/// Registration boundary validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("first and last name are required")]
    NameMissing,
    #[error("age must be positive")]
    AgeMissing,
    #[error("monthly income must be positive")]
    IncomeNotPositive,
    #[error("phone number is required")]
    PhoneMissing,
}

impl RegistrationRequest {
    fn validate(&self) -> Result<(), RegistrationError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(RegistrationError::NameMissing);
        }
        if self.age == 0 {
            return Err(RegistrationError::AgeMissing);
        }
        if !(self.monthly_income > 0.0) {
            return Err(RegistrationError::IncomeNotPositive);
        }
        if self.phone_number.trim().is_empty() {
            return Err(RegistrationError::PhoneMissing);
        }
        Ok(())
    }
}

/// Result of a create-loan request: either a persisted loan id or the
/// rejection carried through from the eligibility decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanOutcome {
    pub loan_id: Option<LoanId>,
    pub customer_id: CustomerId,
    pub approved: bool,
    pub message: String,
    pub monthly_installment: f64,
}

/// A loan joined with its owning customer, for single-loan views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanDetails {
    pub loan: Loan,
    pub customer: Customer,
}

/// Per-loan line item for a customer's loan listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanAccountView {
    pub loan_id: LoanId,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub monthly_installment: f64,
    pub repayments_left: u32,
}

/// Aggregate repayment statistics for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub customer: Customer,
    pub total_loans: usize,
    pub active_loans: usize,
    pub completed_loans: usize,
    pub total_borrowed: f64,
    pub total_paid: f64,
    pub average_payment_ratio: f64,
}

/// Book-level statistics across every loan in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_loans: usize,
    pub active_loans: usize,
    pub completed_loans: usize,
    pub defaulted_loans: usize,
    pub total_amount_disbursed: f64,
    pub total_amount_collected: f64,
    pub average_interest_rate: f64,
    pub collection_ratio: f64,
}

/// Error raised by the lending workflow.
#[derive(Debug, Error)]
pub enum LendingServiceError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Request(#[from] InstallmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service composing the store, the policy, and the decision engine.
pub struct LendingService<S> {
    store: Arc<S>,
    policy: LendingPolicy,
}

impl<S> LendingService<S>
where
    S: CustomerStore + 'static,
{
    pub fn new(store: Arc<S>, policy: LendingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Register a new customer: validate, derive the approved limit from
    /// income, assign the next id, persist.
    pub fn register_customer(
        &self,
        request: RegistrationRequest,
    ) -> Result<Customer, LendingServiceError> {
        request.validate()?;

        let id = self.store.next_customer_id()?;
        let customer = Customer {
            id,
            approved_limit: self.policy.approved_limit(request.monthly_income),
            first_name: request.first_name,
            last_name: request.last_name,
            age: request.age,
            phone_number: request.phone_number,
            monthly_income: request.monthly_income,
            current_debt: 0.0,
        };
        self.store.persist_customer(customer.clone())?;
        info!(customer_id = customer.id.0, "registered customer");
        Ok(customer)
    }

    /// Evaluate a candidate loan. An unknown customer is a rejected
    /// decision, not an error: zero creditworthiness is a valid outcome.
    pub fn check_eligibility(
        &self,
        customer_id: CustomerId,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> Result<EligibilityDecision, LendingServiceError> {
        request.validate()?;

        let Some(customer) = self.store.find_customer(customer_id)? else {
            return Ok(EligibilityDecision::rejected(
                request,
                0,
                "Customer not found",
            ));
        };
        let loans = self.store.loans_for_customer(customer_id)?;
        Ok(evaluate(&customer, &loans, request, &self.policy, today)?)
    }

    /// Evaluate and, on approval, persist the loan at the corrected rate
    /// with today's date as the approval date.
    pub fn create_loan(
        &self,
        customer_id: CustomerId,
        request: &LoanRequest,
        today: NaiveDate,
    ) -> Result<LoanOutcome, LendingServiceError> {
        let decision = self.check_eligibility(customer_id, request, today)?;

        if !decision.approved {
            return Ok(LoanOutcome {
                loan_id: None,
                customer_id,
                approved: false,
                message: decision.message,
                monthly_installment: 0.0,
            });
        }

        let monthly_payment =
            monthly_installment(request.amount, decision.corrected_rate, request.term_months)?;
        let loan_id = self.store.next_loan_id()?;
        let loan = Loan {
            id: loan_id,
            customer_id,
            principal: request.amount,
            term_months: request.term_months,
            annual_rate_percent: decision.corrected_rate,
            monthly_payment,
            emis_paid_on_time: 0,
            approved_on: today,
            end_date: end_date_for(today, request.term_months),
        };
        self.store.persist_loan(loan)?;
        info!(
            loan_id = loan_id.0,
            customer_id = customer_id.0,
            rate = decision.corrected_rate,
            "loan created"
        );

        Ok(LoanOutcome {
            loan_id: Some(loan_id),
            customer_id,
            approved: true,
            message: "Loan approved successfully".to_string(),
            monthly_installment: monthly_payment,
        })
    }

    /// Every registered customer, ordered by id.
    pub fn customers(&self) -> Result<Vec<Customer>, LendingServiceError> {
        let mut customers = self.store.all_customers()?;
        customers.sort_by_key(|customer| customer.id);
        Ok(customers)
    }

    pub fn view_loan(&self, loan_id: LoanId) -> Result<LoanDetails, LendingServiceError> {
        let loan = self.store.find_loan(loan_id)?.ok_or(StoreError::NotFound)?;
        let customer = self
            .store
            .find_customer(loan.customer_id)?
            .ok_or(StoreError::NotFound)?;
        Ok(LoanDetails { loan, customer })
    }

    /// Per-loan listing for one customer. An unknown customer simply has no
    /// loans, matching the decision-engine treatment of missing customers.
    pub fn loans_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<LoanAccountView>, LendingServiceError> {
        let loans = self.store.loans_for_customer(customer_id)?;
        Ok(loans
            .into_iter()
            .map(|loan| LoanAccountView {
                loan_id: loan.id,
                loan_amount: loan.principal,
                interest_rate: loan.annual_rate_percent,
                monthly_installment: loan.monthly_payment,
                repayments_left: loan.repayments_left(),
            })
            .collect())
    }

    pub fn customer_stats(
        &self,
        customer_id: CustomerId,
        today: NaiveDate,
    ) -> Result<CustomerStats, LendingServiceError> {
        let customer = self
            .store
            .find_customer(customer_id)?
            .ok_or(StoreError::NotFound)?;
        let loans = self.store.loans_for_customer(customer_id)?;

        let active = count_status(&loans, LoanStatus::Active, today);
        let completed = count_status(&loans, LoanStatus::Completed, today);
        let total_borrowed = loans.iter().map(|loan| loan.principal).sum();
        let total_paid = loans.iter().map(Loan::total_amount_paid).sum();
        let average_payment_ratio = if loans.is_empty() {
            0.0
        } else {
            let sum: f64 = loans.iter().map(Loan::payment_ratio).sum();
            (sum / loans.len() as f64 * 100.0).round() / 100.0
        };

        Ok(CustomerStats {
            customer,
            total_loans: loans.len(),
            active_loans: active,
            completed_loans: completed,
            total_borrowed,
            total_paid,
            average_payment_ratio,
        })
    }

    pub fn portfolio_summary(
        &self,
        today: NaiveDate,
    ) -> Result<PortfolioSummary, LendingServiceError> {
        let loans = self.store.all_loans()?;

        let total_amount_disbursed: f64 = loans.iter().map(|loan| loan.principal).sum();
        let total_amount_collected: f64 = loans.iter().map(Loan::total_amount_paid).sum();
        let average_interest_rate = if loans.is_empty() {
            0.0
        } else {
            loans
                .iter()
                .map(|loan| loan.annual_rate_percent)
                .sum::<f64>()
                / loans.len() as f64
        };
        let collection_ratio = if total_amount_disbursed > 0.0 {
            total_amount_collected / total_amount_disbursed
        } else {
            0.0
        };

        Ok(PortfolioSummary {
            total_loans: loans.len(),
            active_loans: count_status(&loans, LoanStatus::Active, today),
            completed_loans: count_status(&loans, LoanStatus::Completed, today),
            defaulted_loans: count_status(&loans, LoanStatus::Defaulted, today),
            total_amount_disbursed,
            total_amount_collected,
            average_interest_rate,
            collection_ratio,
        })
    }
}

fn count_status(loans: &[Loan], status: LoanStatus, today: NaiveDate) -> usize {
    loans
        .iter()
        .filter(|loan| loan.status(today) == status)
        .count()
}
