use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a registered customer by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CustomerId(pub u32);

/// Identifier assigned to a disbursed loan by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LoanId(pub u32);

/// A registered customer. Immutable after registration; `current_debt` is a
/// snapshot supplied by the store, not a running balance the engine mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub phone_number: String,
    pub monthly_income: f64,
    /// Policy ceiling fixed at registration, never adjusted by loan activity.
    pub approved_limit: f64,
    pub current_debt: f64,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A disbursed loan. Principal, rate, and term are immutable; the count of
/// EMIs paid on time is externally mutated as payments land and is treated
/// as input here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub principal: f64,
    pub term_months: u32,
    pub annual_rate_percent: f64,
    pub monthly_payment: f64,
    pub emis_paid_on_time: u32,
    pub approved_on: NaiveDate,
    pub end_date: NaiveDate,
}

/// Derived repayment state of a loan as of a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
    Completed,
    Defaulted,
}

impl LoanStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Completed => "COMPLETED",
            LoanStatus::Defaulted => "DEFAULTED",
        }
    }
}

/// End date for a loan approved on `approved_on` running `term_months`
/// months. Month arithmetic clamps at month boundaries, so a loan approved
/// on January 31st with a one month term ends on the last day of February.
pub fn end_date_for(approved_on: NaiveDate, term_months: u32) -> NaiveDate {
    approved_on
        .checked_add_months(Months::new(term_months))
        .unwrap_or(NaiveDate::MAX)
}

impl Loan {
    /// Status is derived, never stored: a loan stays `Active` through its
    /// end date, and afterwards is `Completed` only when every installment
    /// landed on schedule.
    pub fn status(&self, today: NaiveDate) -> LoanStatus {
        if today <= self.end_date {
            LoanStatus::Active
        } else if self.emis_paid_on_time >= self.term_months {
            LoanStatus::Completed
        } else {
            LoanStatus::Defaulted
        }
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.status(today) == LoanStatus::Active
    }

    /// Fraction of scheduled installments paid on time. Zero-term loans do
    /// not occur through the approval workflow but can appear in seed data.
    pub fn payment_ratio(&self) -> f64 {
        if self.term_months == 0 {
            0.0
        } else {
            f64::from(self.emis_paid_on_time) / f64::from(self.term_months)
        }
    }

    pub fn total_amount_paid(&self) -> f64 {
        f64::from(self.emis_paid_on_time) * self.monthly_payment
    }

    /// Outstanding balance under simple total interest, floored at zero.
    pub fn remaining_amount(&self) -> f64 {
        let total_interest =
            self.principal * self.annual_rate_percent * f64::from(self.term_months) / 1200.0;
        (self.principal + total_interest - self.total_amount_paid()).max(0.0)
    }

    pub fn repayments_left(&self) -> u32 {
        self.term_months.saturating_sub(self.emis_paid_on_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(paid: u32) -> Loan {
        Loan {
            id: LoanId(1),
            customer_id: CustomerId(7),
            principal: 120_000.0,
            term_months: 12,
            annual_rate_percent: 10.0,
            monthly_payment: 11_000.0,
            emis_paid_on_time: paid,
            approved_on: NaiveDate::from_ymd_opt(2023, 1, 10).expect("valid date"),
            end_date: end_date_for(
                NaiveDate::from_ymd_opt(2023, 1, 10).expect("valid date"),
                12,
            ),
        }
    }

    #[test]
    fn status_is_active_through_end_date() {
        let loan = loan(3);
        assert_eq!(loan.end_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(loan.status(loan.end_date), LoanStatus::Active);
        assert_eq!(
            loan.status(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()),
            LoanStatus::Active
        );
    }

    #[test]
    fn past_end_date_splits_completed_and_defaulted_on_paid_count() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date");
        assert_eq!(loan(12).status(today), LoanStatus::Completed);
        assert_eq!(loan(8).status(today), LoanStatus::Defaulted);
        // Overpaid counts still read as completed.
        assert_eq!(loan(13).status(today), LoanStatus::Completed);
    }

    #[test]
    fn end_date_clamps_at_month_boundaries() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date");
        assert_eq!(
            end_date_for(jan31, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29).expect("leap february")
        );
        assert_eq!(
            end_date_for(jan31, 13),
            NaiveDate::from_ymd_opt(2025, 2, 28).expect("plain february")
        );
    }

    #[test]
    fn payment_ratio_guards_zero_term() {
        let mut zero = loan(0);
        zero.term_months = 0;
        assert_eq!(zero.payment_ratio(), 0.0);
        assert_eq!(loan(6).payment_ratio(), 0.5);
    }

    #[test]
    fn remaining_amount_uses_simple_total_interest() {
        // 120,000 at 10% over 12 months: 12,000 simple interest.
        let part_paid = loan(4);
        assert_eq!(part_paid.total_amount_paid(), 44_000.0);
        assert_eq!(part_paid.remaining_amount(), 88_000.0);

        let paid_off = loan(12);
        assert_eq!(paid_off.remaining_amount(), 0.0);
    }

    #[test]
    fn repayments_left_never_underflows() {
        assert_eq!(loan(8).repayments_left(), 4);
        assert_eq!(loan(14).repayments_left(), 0);
    }
}
