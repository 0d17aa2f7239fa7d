use crate::infra::InMemoryCustomerStore;
use chrono::{Datelike, NaiveDate};
use clap::Args;
use creditline::error::AppError;
use creditline::lending::{
    end_date_for, monthly_installment, CustomerId, CustomerStore, LendingPolicy, LendingService,
    LendingServiceError, Loan, LoanRequest, RegistrationRequest,
};
use std::sync::Arc;

/// Fixed evaluation date so repeated demo runs print the same decisions.
const DEFAULT_AS_OF: &str = "2024-06-15";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Evaluation date for every decision (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date, default_value = DEFAULT_AS_OF)]
    pub(crate) as_of: NaiveDate,
}

#[derive(Args, Debug)]
pub(crate) struct InstallmentArgs {
    /// Principal amount
    #[arg(long)]
    pub(crate) amount: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    pub(crate) rate: f64,
    /// Tenure in months
    #[arg(long)]
    pub(crate) tenure: u32,
}

pub(crate) fn run_installment_quote(args: InstallmentArgs) -> Result<(), AppError> {
    let installment =
        monthly_installment(args.amount, args.rate, args.tenure).map_err(LendingServiceError::from)?;
    let total = installment * f64::from(args.tenure);

    println!(
        "Principal {:.2} at {:.2}% over {} months",
        args.amount, args.rate, args.tenure
    );
    println!("Monthly installment: {installment:.2}");
    println!("Total payable: {total:.2}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = args.as_of;

    println!("Credit approval walkthrough (as of {as_of})");

    let store = Arc::new(InMemoryCustomerStore::default());
    let service = LendingService::new(store.clone(), LendingPolicy::default());

    let customer = service.register_customer(RegistrationRequest {
        first_name: "Asha".to_string(),
        last_name: "Verma".to_string(),
        age: 34,
        monthly_income: 50_000.0,
        phone_number: "9876501234".to_string(),
    })?;
    println!(
        "\nRegistered {} (customer {}) with approved limit {:.0}",
        customer.full_name(),
        customer.id.0,
        customer.approved_limit
    );

    let first_request = LoanRequest {
        amount: 500_000.0,
        interest_rate: 10.0,
        term_months: 24,
    };
    let decision = service.check_eligibility(customer.id, &first_request, as_of)?;
    println!(
        "\nFresh history: score {} -> {} at {:.1}%",
        decision.credit_score, decision.message, decision.corrected_rate
    );

    seed_defaulted_history(store.as_ref(), customer.id.0, as_of)?;
    println!("\nSeeded seven short defaulted loans from earlier in the year");

    let second_request = LoanRequest {
        amount: 100_000.0,
        interest_rate: 8.0,
        term_months: 12,
    };
    let decision = service.check_eligibility(customer.id, &second_request, as_of)?;
    println!(
        "Troubled history: score {} -> {} (requested {:.1}%, carries {:.1}%)",
        decision.credit_score, decision.message, decision.requested_rate, decision.corrected_rate
    );

    let outcome = service.create_loan(customer.id, &second_request, as_of)?;
    println!(
        "\n{}: loan {:?} at {:.2} per month",
        outcome.message,
        outcome.loan_id.map(|id| id.0),
        outcome.monthly_installment
    );

    let listing = service.loans_for_customer(customer.id)?;
    println!("\nLoan book for customer {}:", customer.id.0);
    for entry in &listing {
        println!(
            "  - loan {}: {:.0} at {:.1}% | {:.2}/month | {} repayments left",
            entry.loan_id.0,
            entry.loan_amount,
            entry.interest_rate,
            entry.monthly_installment,
            entry.repayments_left
        );
    }

    let summary = service.portfolio_summary(as_of)?;
    println!(
        "\nPortfolio: {} loans ({} active, {} completed, {} defaulted) | avg rate {:.2}% | collection ratio {:.2}",
        summary.total_loans,
        summary.active_loans,
        summary.completed_loans,
        summary.defaulted_loans,
        summary.average_interest_rate,
        summary.collection_ratio
    );

    Ok(())
}

/// Seven unpaid two-month loans approved in January of the evaluation year
/// push the score into the corrected-rate tier.
fn seed_defaulted_history(
    store: &InMemoryCustomerStore,
    customer_id: u32,
    as_of: NaiveDate,
) -> Result<(), AppError> {
    let approved = NaiveDate::from_ymd_opt(as_of.year(), 1, 15).unwrap_or(as_of);
    for _ in 0..7 {
        let loan_id = store.next_loan_id()?;
        store.persist_loan(Loan {
            id: loan_id,
            customer_id: CustomerId(customer_id),
            principal: 200_000.0,
            term_months: 2,
            annual_rate_percent: 10.0,
            monthly_payment: 101_000.0,
            emis_paid_on_time: 0,
            approved_on: approved,
            end_date: end_date_for(approved, 2),
        })?;
    }
    Ok(())
}
