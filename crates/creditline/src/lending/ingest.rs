//! Bulk seed ingestion from CSV exports of the legacy workbooks.
//!
//! Column headers follow the original spreadsheets. Ingestion is a boundary
//! mapping: derived fields the workbook omits (monthly payment, end date)
//! are computed here, and everything lands on the canonical domain schema.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::domain::{end_date_for, Customer, CustomerId, Loan, LoanId};
use super::emi::monthly_installment;
use super::policy::LendingPolicy;
use super::store::{CustomerStore, StoreError};

#[derive(Debug, Error)]
pub enum SeedImportError {
    #[error("failed to read seed data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    #[serde(rename = "Customer ID")]
    customer_id: u32,
    #[serde(rename = "First Name")]
    first_name: String,
    #[serde(rename = "Last Name")]
    last_name: String,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Phone Number")]
    phone_number: String,
    #[serde(rename = "Monthly Salary")]
    monthly_salary: f64,
    #[serde(rename = "Approved Limit", default)]
    approved_limit: Option<f64>,
    #[serde(rename = "Current Debt", default)]
    current_debt: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LoanRow {
    #[serde(rename = "Customer ID")]
    customer_id: u32,
    #[serde(rename = "Loan ID")]
    loan_id: u32,
    #[serde(rename = "Loan Amount")]
    loan_amount: f64,
    #[serde(rename = "Tenure")]
    tenure: u32,
    #[serde(rename = "Interest Rate")]
    interest_rate: f64,
    #[serde(rename = "Monthly payment", default)]
    monthly_payment: Option<f64>,
    #[serde(rename = "EMIs paid on Time", default)]
    emis_paid_on_time: Option<u32>,
    #[serde(rename = "Date of Approval")]
    date_of_approval: String,
    #[serde(rename = "End Date", default)]
    end_date: Option<String>,
}

/// Totals from a completed seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers: usize,
    pub loans: usize,
    /// Loans referencing a customer id absent from the customer sheet are
    /// dropped, matching the legacy loader.
    pub orphaned_loans: usize,
}

pub fn customers_from_path<P: AsRef<Path>>(
    path: P,
    policy: &LendingPolicy,
) -> Result<Vec<Customer>, SeedImportError> {
    let file = std::fs::File::open(path)?;
    customers_from_reader(file, policy)
}

pub fn customers_from_reader<R: Read>(
    reader: R,
    policy: &LendingPolicy,
) -> Result<Vec<Customer>, SeedImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut customers = Vec::new();

    for result in csv_reader.deserialize::<CustomerRow>() {
        let row = result?;
        customers.push(Customer {
            id: CustomerId(row.customer_id),
            approved_limit: row
                .approved_limit
                .unwrap_or_else(|| policy.approved_limit(row.monthly_salary)),
            first_name: row.first_name,
            last_name: row.last_name,
            age: row.age,
            phone_number: row.phone_number,
            monthly_income: row.monthly_salary,
            current_debt: row.current_debt.unwrap_or(0.0),
        });
    }

    Ok(customers)
}

pub fn loans_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Loan>, SeedImportError> {
    let file = std::fs::File::open(path)?;
    loans_from_reader(file)
}

pub fn loans_from_reader<R: Read>(reader: R) -> Result<Vec<Loan>, SeedImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut loans = Vec::new();

    for (index, result) in csv_reader.deserialize::<LoanRow>().enumerate() {
        // Header occupies the first line, so data rows start at 2.
        let row_number = index + 2;
        let row = result?;

        let approved_on = parse_seed_date(&row.date_of_approval, row_number)?;
        let end_date = match row.end_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_seed_date(raw, row_number)?,
            _ => end_date_for(approved_on, row.tenure),
        };
        let monthly_payment = match row.monthly_payment {
            Some(payment) => payment,
            None => monthly_installment(row.loan_amount, row.interest_rate, row.tenure).map_err(
                |err| SeedImportError::Malformed {
                    row: row_number,
                    message: err.to_string(),
                },
            )?,
        };

        loans.push(Loan {
            id: LoanId(row.loan_id),
            customer_id: CustomerId(row.customer_id),
            principal: row.loan_amount,
            term_months: row.tenure,
            annual_rate_percent: row.interest_rate,
            monthly_payment,
            emis_paid_on_time: row.emis_paid_on_time.unwrap_or(0),
            approved_on,
            end_date,
        });
    }

    Ok(loans)
}

fn parse_seed_date(raw: &str, row: usize) -> Result<NaiveDate, SeedImportError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| SeedImportError::Malformed {
        row,
        message: format!("'{raw}' is not a YYYY-MM-DD date ({err})"),
    })
}

/// Load parsed seed data into a store. Customers land first; loans pointing
/// at unknown customers are counted and dropped.
pub fn seed_store<S: CustomerStore>(
    store: &S,
    customers: Vec<Customer>,
    loans: Vec<Loan>,
) -> Result<SeedSummary, StoreError> {
    let mut summary = SeedSummary {
        customers: 0,
        loans: 0,
        orphaned_loans: 0,
    };

    for customer in customers {
        store.persist_customer(customer)?;
        summary.customers += 1;
    }

    for loan in loans {
        if store.find_customer(loan.customer_id)?.is_none() {
            summary.orphaned_loans += 1;
            continue;
        }
        store.persist_loan(loan)?;
        summary.loans += 1;
    }

    Ok(summary)
}
