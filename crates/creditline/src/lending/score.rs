//! Credit-score engine: five weighted components over a customer's loan
//! history, gated by the approved limit.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{Customer, Loan, LoanStatus};

/// Per-component audit view of a credit score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// On-time repayment quality, max 25.
    pub repayment_history: f64,
    /// Inverse loan-count points, max 15.
    pub loan_count: u8,
    /// Current-year activity points, max 20.
    pub recent_activity: u8,
    /// Lifetime borrowed volume vs. limit, max 25.
    pub approved_volume: u8,
    /// Active debt vs. limit, max 15.
    pub debt_ratio: u8,
    /// Active principal exceeded the approved limit; forces a zero score.
    pub over_limit: bool,
    pub total: u8,
}

/// Credit score in `[0, 100]` for `customer` given their full loan history,
/// evaluated as of `today`.
pub fn credit_score(customer: &Customer, loans: &[Loan], today: NaiveDate) -> u8 {
    score_breakdown(customer, loans, today).total
}

/// Full component breakdown behind [`credit_score`].
pub fn score_breakdown(customer: &Customer, loans: &[Loan], today: NaiveDate) -> ScoreBreakdown {
    let active_principal: f64 = loans
        .iter()
        .filter(|loan| loan.is_active(today))
        .map(|loan| loan.principal)
        .sum();

    // Hard gate: active exposure above the approved limit zeroes the score
    // outright; no component is worth evaluating.
    if active_principal > customer.approved_limit {
        return ScoreBreakdown {
            repayment_history: 0.0,
            loan_count: 0,
            recent_activity: 0,
            approved_volume: 0,
            debt_ratio: 0,
            over_limit: true,
            total: 0,
        };
    }

    let repayment_history = repayment_component(loans, today);
    let loan_count = loan_count_component(loans.len());
    let recent_activity = recent_activity_component(loans, today);
    let approved_volume = approved_volume_component(loans, customer.approved_limit);
    let debt_ratio = debt_ratio_component(active_principal, customer.approved_limit);

    let raw = repayment_history
        + f64::from(loan_count)
        + f64::from(recent_activity)
        + f64::from(approved_volume)
        + f64::from(debt_ratio);
    let total = raw.min(100.0).round() as u8;

    ScoreBreakdown {
        repayment_history,
        loan_count,
        recent_activity,
        approved_volume,
        debt_ratio,
        over_limit: false,
        total,
    }
}

/// On-time repayment quality (max 25). Completed loans contribute their
/// paid/term ratio, but the average deliberately divides by the count of
/// ALL loans: in-flight and defaulted loans dilute the component.
fn repayment_component(loans: &[Loan], today: NaiveDate) -> f64 {
    if loans.is_empty() {
        return 0.0;
    }
    let completed_ratio_sum: f64 = loans
        .iter()
        .filter(|loan| loan.status(today) == LoanStatus::Completed)
        .map(Loan::payment_ratio)
        .sum();
    let average = completed_ratio_sum / loans.len() as f64;
    (average * 25.0).min(25.0)
}

/// Fewer lifetime loans score higher (max 15).
fn loan_count_component(total_loans: usize) -> u8 {
    match total_loans {
        0..=2 => 15,
        3..=5 => 10,
        6..=10 => 5,
        _ => 0,
    }
}

/// Loans approved in the current calendar year (max 20); a quiet year
/// scores best.
fn recent_activity_component(loans: &[Loan], today: NaiveDate) -> u8 {
    let this_year = loans
        .iter()
        .filter(|loan| loan.approved_on.year() == today.year())
        .count();
    match this_year {
        0 => 20,
        1..=2 => 15,
        3..=4 => 10,
        _ => 5,
    }
}

/// Lifetime borrowed volume against the approved limit (max 25).
fn approved_volume_component(loans: &[Loan], approved_limit: f64) -> u8 {
    let total_borrowed: f64 = loans.iter().map(|loan| loan.principal).sum();
    if total_borrowed == 0.0 {
        25
    } else if total_borrowed <= approved_limit * 0.5 {
        25
    } else if total_borrowed <= approved_limit * 0.75 {
        20
    } else if total_borrowed <= approved_limit {
        15
    } else {
        5
    }
}

/// Active principal against the approved limit (max 15).
fn debt_ratio_component(active_principal: f64, approved_limit: f64) -> u8 {
    let ratio = active_principal / approved_limit;
    if active_principal == 0.0 {
        15
    } else if ratio <= 0.3 {
        15
    } else if ratio <= 0.5 {
        10
    } else if ratio <= 0.7 {
        5
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lending::domain::{end_date_for, CustomerId, LoanId};

    fn customer() -> Customer {
        Customer {
            id: CustomerId(1),
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            age: 34,
            phone_number: "9876501234".to_string(),
            monthly_income: 50_000.0,
            approved_limit: 1_800_000.0,
            current_debt: 0.0,
        }
    }

    fn loan(id: u32, principal: f64, term: u32, paid: u32, approved_on: NaiveDate) -> Loan {
        Loan {
            id: LoanId(id),
            customer_id: CustomerId(1),
            principal,
            term_months: term,
            annual_rate_percent: 10.0,
            monthly_payment: 1_000.0,
            emis_paid_on_time: paid,
            approved_on,
            end_date: end_date_for(approved_on, term),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
    }

    #[test]
    fn fresh_customer_scores_75() {
        let breakdown = score_breakdown(&customer(), &[], today());
        assert_eq!(breakdown.repayment_history, 0.0);
        assert_eq!(breakdown.loan_count, 15);
        assert_eq!(breakdown.recent_activity, 20);
        assert_eq!(breakdown.approved_volume, 25);
        assert_eq!(breakdown.debt_ratio, 15);
        assert!(!breakdown.over_limit);
        assert_eq!(breakdown.total, 75);
    }

    #[test]
    fn over_limit_active_principal_forces_zero() {
        let approved = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let loans = vec![
            loan(1, 1_000_000.0, 24, 1, approved),
            loan(2, 900_000.0, 24, 1, approved),
        ];
        let breakdown = score_breakdown(&customer(), &loans, today());
        assert!(breakdown.over_limit);
        assert_eq!(breakdown.total, 0);
    }

    #[test]
    fn completed_history_divides_by_all_loans() {
        // One completed loan paid in full, one active loan: the completed
        // ratio of 1.0 is averaged across both, giving 12.5 points.
        let past = NaiveDate::from_ymd_opt(2022, 3, 1).expect("valid date");
        let recent = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let loans = vec![
            loan(1, 100_000.0, 12, 12, past),
            loan(2, 100_000.0, 24, 2, recent),
        ];
        let breakdown = score_breakdown(&customer(), &loans, today());
        assert_eq!(breakdown.repayment_history, 12.5);
    }

    #[test]
    fn defaulted_loans_contribute_nothing_to_repayment() {
        let past = NaiveDate::from_ymd_opt(2022, 3, 1).expect("valid date");
        let loans = vec![loan(1, 100_000.0, 12, 8, past)];
        let breakdown = score_breakdown(&customer(), &loans, today());
        assert_eq!(breakdown.repayment_history, 0.0);
    }

    #[test]
    fn loan_count_buckets_are_inclusive() {
        assert_eq!(loan_count_component(0), 15);
        assert_eq!(loan_count_component(2), 15);
        assert_eq!(loan_count_component(3), 10);
        assert_eq!(loan_count_component(5), 10);
        assert_eq!(loan_count_component(6), 5);
        assert_eq!(loan_count_component(10), 5);
        assert_eq!(loan_count_component(11), 0);
    }

    #[test]
    fn recent_activity_counts_current_year_approvals() {
        let last_year = NaiveDate::from_ymd_opt(2023, 8, 1).expect("valid date");
        let this_year = NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date");

        let quiet = vec![loan(1, 50_000.0, 12, 4, last_year)];
        assert_eq!(recent_activity_component(&quiet, today()), 20);

        let busy: Vec<Loan> = (0..5)
            .map(|i| loan(i, 50_000.0, 12, 0, this_year))
            .collect();
        assert_eq!(recent_activity_component(&busy, today()), 5);
    }

    #[test]
    fn volume_thresholds_are_inclusive_of_upper_bound() {
        let limit = 1_800_000.0;
        let approved = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
        let with_total = |amount: f64| vec![loan(1, amount, 12, 12, approved)];
        assert_eq!(approved_volume_component(&[], limit), 25);
        assert_eq!(approved_volume_component(&with_total(900_000.0), limit), 25);
        assert_eq!(
            approved_volume_component(&with_total(1_350_000.0), limit),
            20
        );
        assert_eq!(
            approved_volume_component(&with_total(1_800_000.0), limit),
            15
        );
        assert_eq!(
            approved_volume_component(&with_total(1_800_001.0), limit),
            5
        );
    }

    #[test]
    fn debt_ratio_thresholds_are_inclusive_of_upper_bound() {
        let limit = 1_000_000.0;
        assert_eq!(debt_ratio_component(0.0, limit), 15);
        assert_eq!(debt_ratio_component(300_000.0, limit), 15);
        assert_eq!(debt_ratio_component(500_000.0, limit), 10);
        assert_eq!(debt_ratio_component(700_000.0, limit), 5);
        assert_eq!(debt_ratio_component(700_001.0, limit), 0);
    }

    #[test]
    fn score_is_always_within_bounds() {
        let approved = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid date");
        let histories: Vec<Vec<Loan>> = vec![
            Vec::new(),
            vec![loan(1, 100_000.0, 12, 12, approved)],
            (0..12)
                .map(|i| loan(i, 200_000.0, 6, 6, approved))
                .collect(),
        ];
        for loans in histories {
            let score = credit_score(&customer(), &loans, today());
            assert!(score <= 100);
        }
    }

    #[test]
    fn identical_inputs_yield_identical_scores() {
        let approved = NaiveDate::from_ymd_opt(2023, 4, 1).expect("valid date");
        let loans = vec![loan(1, 250_000.0, 18, 6, approved)];
        let first = score_breakdown(&customer(), &loans, today());
        let second = score_breakdown(&customer(), &loans, today());
        assert_eq!(first, second);
    }
}
