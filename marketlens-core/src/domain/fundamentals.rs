//! Fundamentals record — named per-share and company-level metrics.

use serde::{Deserialize, Serialize};

/// Key fundamental metrics for one ticker.
///
/// Any metric may be absent from the upstream feed; absent fields default to
/// 0.0 and downstream formulas treat zero defensively (no division by zero).
/// The one exception is `revenue_growth`, which defaults to 0.10 — a missing
/// growth estimate is read as 10%, not as zero growth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalsRecord {
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default)]
    pub trailing_pe: f64,
    #[serde(default)]
    pub forward_pe: f64,
    #[serde(default)]
    pub peg_ratio: f64,
    #[serde(default)]
    pub price_to_book: f64,
    #[serde(default)]
    pub return_on_equity: f64,
    #[serde(default)]
    pub profit_margin: f64,
    /// Mean analyst target price.
    #[serde(default)]
    pub analyst_target: f64,
    #[serde(default)]
    pub current_price: f64,
    /// Trailing earnings per share.
    #[serde(default)]
    pub eps: f64,
    /// Revenue growth as a fraction (0.25 = 25%).
    #[serde(default = "default_revenue_growth")]
    pub revenue_growth: f64,
}

fn default_revenue_growth() -> f64 {
    0.10
}

impl Default for FundamentalsRecord {
    fn default() -> Self {
        Self {
            market_cap: 0.0,
            trailing_pe: 0.0,
            forward_pe: 0.0,
            peg_ratio: 0.0,
            price_to_book: 0.0,
            return_on_equity: 0.0,
            profit_margin: 0.0,
            analyst_target: 0.0,
            current_price: 0.0,
            eps: 0.0,
            revenue_growth: default_revenue_growth(),
        }
    }
}
