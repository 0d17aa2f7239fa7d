use serde::{Deserialize, Serialize};

/// Lending policy constants applied around the scoring engine.
///
/// The defaults mirror the product rules: a customer may not commit more
/// than half of their monthly income to installments, mid-tier scores are
/// priced at a 12% floor, low-tier at 16%, and the approved limit is
/// 36x monthly income rounded to the nearest 100,000.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingPolicy {
    pub emi_income_cap: f64,
    pub moderate_tier_rate_floor: f64,
    pub low_tier_rate_floor: f64,
    pub limit_income_multiplier: f64,
    pub limit_rounding_unit: f64,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            emi_income_cap: 0.5,
            moderate_tier_rate_floor: 12.0,
            low_tier_rate_floor: 16.0,
            limit_income_multiplier: 36.0,
            limit_rounding_unit: 100_000.0,
        }
    }
}

impl LendingPolicy {
    /// Approved credit limit for a monthly income, rounded to the nearest
    /// rounding unit.
    pub fn approved_limit(&self, monthly_income: f64) -> f64 {
        let raw = self.limit_income_multiplier * monthly_income;
        (raw / self.limit_rounding_unit).round() * self.limit_rounding_unit
    }

    /// Minimum interest rate the score tier allows, or `None` when the
    /// score is too low for any approval. Tier bounds are exclusive below
    /// and inclusive above: a score of exactly 50 lands in the 12% tier.
    pub fn rate_floor(&self, score: u8) -> Option<f64> {
        if score > 50 {
            Some(0.0)
        } else if score > 30 {
            Some(self.moderate_tier_rate_floor)
        } else if score > 10 {
            Some(self.low_tier_rate_floor)
        } else {
            None
        }
    }
}
