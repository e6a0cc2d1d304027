//! Factor regression — linear multi-factor shock model ("what if").
//!
//! Regresses an asset's daily returns on four macro factor series: a broad
//! market index, a rate proxy, a commodity proxy, and a currency proxy.
//! Market/commodity/currency enter as percentage returns; the rate proxy
//! enters as an absolute level change, since rate series are already quoted
//! in percentage points.
//!
//! The fit is ordinary least squares with an intercept, solved through the
//! normal equations (the system is a fixed 5×5). The fitted model prices
//! hypothetical shocks: predicted return = intercept + Σ coefficient·shock.

use marketlens_core::error::AnalyticsError;
use serde::{Deserialize, Serialize};

use crate::config::RegressionConfig;
use crate::stats;

/// Number of regressors (one per factor).
const NUM_FACTORS: usize = 4;

/// The four shock factors, in coefficient order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// Broad equity market (return shock).
    Market,
    /// Rate proxy (absolute level change, percentage points).
    Rates,
    /// Commodity proxy (return shock).
    Commodity,
    /// Currency proxy (return shock).
    Currency,
}

impl Factor {
    pub const ALL: [Factor; NUM_FACTORS] = [
        Factor::Market,
        Factor::Rates,
        Factor::Commodity,
        Factor::Currency,
    ];

    fn index(self) -> usize {
        match self {
            Factor::Market => 0,
            Factor::Rates => 1,
            Factor::Commodity => 2,
            Factor::Currency => 3,
        }
    }
}

/// Aligned factor histories. Market/commodity/currency are close prices;
/// rates is a level series (e.g. a 10Y yield quoted in percent).
#[derive(Debug, Clone)]
pub struct FactorSeries {
    pub market: Vec<f64>,
    pub rates: Vec<f64>,
    pub commodity: Vec<f64>,
    pub currency: Vec<f64>,
}

/// Hypothetical factor shocks for prediction. Omitted factors default to 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FactorShocks {
    /// Market return shock (e.g. -0.02 = market down 2%).
    #[serde(default)]
    pub market: f64,
    /// Rate level change in percentage points (e.g. 0.25 = +25bp).
    #[serde(default)]
    pub rates: f64,
    #[serde(default)]
    pub commodity: f64,
    #[serde(default)]
    pub currency: f64,
}

impl FactorShocks {
    fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Market => self.market,
            Factor::Rates => self.rates,
            Factor::Commodity => self.commodity,
            Factor::Currency => self.currency,
        }
    }
}

/// Fitted shock model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorModel {
    pub intercept: f64,
    coefficients: [f64; NUM_FACTORS],
    pub r_squared: f64,
    pub sample_size: usize,
}

impl FactorModel {
    pub fn coefficient(&self, factor: Factor) -> f64 {
        self.coefficients[factor.index()]
    }

    /// Predicted asset return under a shock scenario.
    pub fn predict(&self, shocks: &FactorShocks) -> f64 {
        Factor::ALL.iter().fold(self.intercept, |acc, &f| {
            acc + self.coefficient(f) * shocks.get(f)
        })
    }
}

/// Fit the four-factor model from aligned price/level histories.
///
/// All five series must have equal length (`DegenerateInput` otherwise) and
/// at least `config.min_overlap` rows (`InsufficientData` otherwise).
pub fn fit(
    asset_closes: &[f64],
    factors: &FactorSeries,
    config: &RegressionConfig,
) -> Result<FactorModel, AnalyticsError> {
    let rows = asset_closes.len();
    if [
        factors.market.len(),
        factors.rates.len(),
        factors.commodity.len(),
        factors.currency.len(),
    ]
    .iter()
    .any(|&len| len != rows)
    {
        return Err(AnalyticsError::DegenerateInput(
            "factor series are not aligned to a common index",
        ));
    }
    if rows < config.min_overlap {
        return Err(AnalyticsError::InsufficientData {
            operation: "factor regression",
            required: config.min_overlap,
            actual: rows,
        });
    }
    for series in [
        asset_closes,
        factors.market.as_slice(),
        factors.commodity.as_slice(),
        factors.currency.as_slice(),
    ] {
        if series[..rows - 1].iter().any(|&v| v == 0.0) {
            return Err(AnalyticsError::DegenerateInput(
                "zero price makes returns undefined",
            ));
        }
    }

    let y = stats::simple_returns(asset_closes);
    let x_market = stats::simple_returns(&factors.market);
    let x_rates: Vec<f64> = factors.rates.windows(2).map(|w| w[1] - w[0]).collect();
    let x_commodity = stats::simple_returns(&factors.commodity);
    let x_currency = stats::simple_returns(&factors.currency);

    let n = y.len();
    // Design matrix rows: [1, market, rates, commodity, currency]
    let design: Vec<[f64; NUM_FACTORS + 1]> = (0..n)
        .map(|i| [1.0, x_market[i], x_rates[i], x_commodity[i], x_currency[i]])
        .collect();

    let beta = solve_normal_equations(&design, &y)?;

    let ss_res: f64 = design
        .iter()
        .zip(&y)
        .map(|(row, &yi)| {
            let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
            (yi - fitted).powi(2)
        })
        .sum();
    let y_mean = stats::mean(&y);
    let ss_tot: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let r_squared = if ss_tot != 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(FactorModel {
        intercept: beta[0],
        coefficients: [beta[1], beta[2], beta[3], beta[4]],
        r_squared,
        sample_size: n,
    })
}

/// Solve XᵀX β = Xᵀy by Gaussian elimination with partial pivoting.
fn solve_normal_equations(
    design: &[[f64; NUM_FACTORS + 1]],
    y: &[f64],
) -> Result<Vec<f64>, AnalyticsError> {
    const K: usize = NUM_FACTORS + 1;

    // Build the (K x K | K) augmented system
    let mut aug = [[0.0f64; K + 1]; K];
    for row in design.iter().zip(y) {
        let (x, &yi) = row;
        for i in 0..K {
            for j in 0..K {
                aug[i][j] += x[i] * x[j];
            }
            aug[i][K] += x[i] * yi;
        }
    }

    // Forward elimination with partial pivoting
    for col in 0..K {
        let pivot_row = (col..K)
            .max_by(|&a, &b| {
                aug[a][col]
                    .abs()
                    .partial_cmp(&aug[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap();
        if aug[pivot_row][col].abs() < 1e-12 {
            return Err(AnalyticsError::DegenerateInput(
                "singular design matrix (collinear factors)",
            ));
        }
        aug.swap(col, pivot_row);

        for row in (col + 1)..K {
            let ratio = aug[row][col] / aug[col][col];
            for j in col..=K {
                aug[row][j] -= ratio * aug[col][j];
            }
        }
    }

    // Back substitution
    let mut beta = vec![0.0; K];
    for col in (0..K).rev() {
        let mut sum = aug[col][K];
        for j in (col + 1)..K {
            sum -= aug[col][j] * beta[j];
        }
        beta[col] = sum / aug[col][col];
    }
    Ok(beta)
}
