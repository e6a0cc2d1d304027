//! Valuation model — simplified Graham-style intrinsic value.
//!
//! fair value = EPS × (8.5 + 2 × adjusted growth), where adjusted growth is
//! revenue growth in percentage points capped at 20. Zero/absent EPS yields
//! a zero fair value — the documented default for missing fundamentals, not
//! an error.

use marketlens_core::domain::FundamentalsRecord;
use serde::{Deserialize, Serialize};

/// Growth cap in percentage points.
const GROWTH_CAP: f64 = 20.0;

/// Intrinsic value per share from EPS and revenue growth.
pub fn fair_value(fundamentals: &FundamentalsRecord) -> f64 {
    let growth_pct = fundamentals.revenue_growth * 100.0;
    let adjusted_growth = growth_pct.min(GROWTH_CAP);
    fundamentals.eps * (8.5 + 2.0 * adjusted_growth)
}

/// Upside from current price to fair value, in percent.
///
/// `None` when the current price is not positive — the upside is undefined,
/// not zero. Callers that need a number (the rating engine) treat `None` as 0.
pub fn upside_percent(fair_value: f64, current_price: f64) -> Option<f64> {
    if current_price <= 0.0 {
        return None;
    }
    Some((fair_value - current_price) / current_price * 100.0)
}

/// Discrete valuation verdict derived from the upside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationStatus {
    Undervalued,
    SlightlyUndervalued,
    FairlyValued,
    Overvalued,
}

impl ValuationStatus {
    pub fn from_upside(upside_pct: f64) -> Self {
        if upside_pct > 15.0 {
            Self::Undervalued
        } else if upside_pct > 5.0 {
            Self::SlightlyUndervalued
        } else if upside_pct > -5.0 {
            Self::FairlyValued
        } else {
            Self::Overvalued
        }
    }
}
