//! Equated monthly installment under compound interest.

use thiserror::Error;

/// Input validation failures for installment math. These are boundary
/// errors the caller maps to a transport response, never panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstallmentError {
    #[error("loan amount must be positive, got {0}")]
    AmountNotPositive(f64),
    #[error("interest rate must not be negative, got {0}")]
    RateNegative(f64),
    #[error("tenure must be at least one month")]
    TermMissing,
}

/// Fixed monthly payment amortizing `principal` over `term_months` at
/// `annual_rate_percent`, rounded to currency precision (2 decimals).
///
/// The standard formula divides by `(1+r)^n - 1`, which is zero at a zero
/// rate, so an interest-free loan is special-cased as straight-line
/// `principal / term`.
pub fn monthly_installment(
    principal: f64,
    annual_rate_percent: f64,
    term_months: u32,
) -> Result<f64, InstallmentError> {
    if !(principal > 0.0) {
        return Err(InstallmentError::AmountNotPositive(principal));
    }
    if !(annual_rate_percent >= 0.0) {
        return Err(InstallmentError::RateNegative(annual_rate_percent));
    }
    if term_months == 0 {
        return Err(InstallmentError::TermMissing);
    }

    if annual_rate_percent == 0.0 {
        return Ok(round_to_cents(principal / f64::from(term_months)));
    }

    let monthly_rate = annual_rate_percent / 1200.0;
    let growth = (1.0 + monthly_rate).powi(term_months as i32);
    let emi = principal * monthly_rate * growth / (growth - 1.0);
    Ok(round_to_cents(emi))
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
