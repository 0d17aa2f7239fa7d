//! Eligibility engine: approve/reject a candidate loan and correct its
//! interest rate to the floor the customer's score tier allows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Customer, Loan};
use super::emi::{monthly_installment, InstallmentError};
use super::policy::LendingPolicy;
use super::score::credit_score;

/// A candidate loan as requested by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub amount: f64,
    pub interest_rate: f64,
    pub term_months: u32,
}

impl LoanRequest {
    /// Boundary validation shared with the installment calculator: positive
    /// amount, non-negative rate, at least one month of tenure.
    pub fn validate(&self) -> Result<(), InstallmentError> {
        monthly_installment(self.amount, self.interest_rate, self.term_months).map(|_| ())
    }
}

/// Outcome of an eligibility evaluation. Pure decision data; persisting an
/// approved loan is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityDecision {
    pub approved: bool,
    pub requested_rate: f64,
    /// Rate the loan would actually carry; equals `requested_rate` unless
    /// the score tier forced a correction.
    pub corrected_rate: f64,
    pub credit_score: u8,
    pub message: String,
}

impl EligibilityDecision {
    /// Rejection that leaves the requested rate untouched.
    pub fn rejected(request: &LoanRequest, credit_score: u8, message: &str) -> Self {
        Self {
            approved: false,
            requested_rate: request.interest_rate,
            corrected_rate: request.interest_rate,
            credit_score,
            message: message.to_string(),
        }
    }

    pub fn rate_was_corrected(&self) -> bool {
        self.corrected_rate != self.requested_rate
    }
}

/// Decide whether `customer` may take `request` given their loan history.
///
/// The affordability check (all active EMIs plus the requested EMI against
/// half the monthly income) takes precedence over the score tiers, so an
/// over-committed customer is rejected with the EMI message even when their
/// score would reject them anyway.
pub fn evaluate(
    customer: &Customer,
    loans: &[Loan],
    request: &LoanRequest,
    policy: &LendingPolicy,
    today: NaiveDate,
) -> Result<EligibilityDecision, InstallmentError> {
    request.validate()?;

    let score = credit_score(customer, loans, today);

    let mut committed_emi = 0.0;
    for loan in loans.iter().filter(|loan| loan.is_active(today)) {
        // Recompute at the loan's own stored terms rather than trusting the
        // stored payment, which seed data may round differently.
        committed_emi +=
            monthly_installment(loan.principal, loan.annual_rate_percent, loan.term_months)?;
    }
    let requested_emi =
        monthly_installment(request.amount, request.interest_rate, request.term_months)?;

    if committed_emi + requested_emi > policy.emi_income_cap * customer.monthly_income {
        return Ok(EligibilityDecision::rejected(
            request,
            score,
            "Sum of all EMIs exceeds 50% of monthly salary",
        ));
    }

    let Some(floor) = policy.rate_floor(score) else {
        return Ok(EligibilityDecision::rejected(
            request,
            score,
            "Loan rejected due to low credit score",
        ));
    };

    if request.interest_rate < floor {
        Ok(EligibilityDecision {
            approved: true,
            requested_rate: request.interest_rate,
            corrected_rate: floor,
            credit_score: score,
            message: "Loan approved with corrected interest rate".to_string(),
        })
    } else {
        Ok(EligibilityDecision {
            approved: true,
            requested_rate: request.interest_rate,
            corrected_rate: request.interest_rate,
            credit_score: score,
            message: "Loan approved".to_string(),
        })
    }
}
