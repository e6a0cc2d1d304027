//! Portfolio optimizer — random-weight efficient-frontier search.
//!
//! Draws N non-negative weight vectors summing to 1, scores each by
//! annualized return, volatility, and Sharpe ratio, and reports the
//! max-Sharpe candidate plus the whole sampled population (the presentation
//! layer plots it as the frontier cloud).
//!
//! This is a stochastic search, kept deliberately over a closed-form
//! quadratic program for behavioral parity with the product. Trials are
//! independent and run under rayon; per-trial RNGs come from the BLAKE3
//! seed hierarchy, and Sharpe ties resolve to the lowest trial index, so a
//! fixed seed always reproduces the same optimum.

use marketlens_core::error::AnalyticsError;
use marketlens_core::rng::SeedHierarchy;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::OptimizerConfig;
use crate::stats;

/// Trading periods per year, for annualization.
const PERIODS_PER_YEAR: f64 = 252.0;

const TRIAL_SEED_LABEL: &str = "portfolio_trial";

/// One asset's aligned close-price history.
///
/// Alignment (common date index, gaps filled) is the caller's job; every
/// series handed to the optimizer must have the same length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSeries {
    pub symbol: String,
    pub closes: Vec<f64>,
}

/// One sampled allocation with its risk/return scores.
///
/// `weights` aligns with the symbol order of the [`OptimizationResult`];
/// weights are non-negative and sum to 1. `sharpe` is NaN for a
/// zero-volatility trial (undefined, never a fake 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioCandidate {
    pub weights: Vec<f64>,
    /// Annualized expected return.
    pub expected_return: f64,
    /// Annualized volatility.
    pub volatility: f64,
    pub sharpe: f64,
}

/// The max-Sharpe candidate plus the full sampled population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub symbols: Vec<String>,
    pub best: PortfolioCandidate,
    pub population: Vec<PortfolioCandidate>,
}

impl OptimizationResult {
    /// Best-candidate weights paired with their symbols.
    pub fn best_weights(&self) -> Vec<(&str, f64)> {
        self.symbols
            .iter()
            .map(|s| s.as_str())
            .zip(self.best.weights.iter().copied())
            .collect()
    }
}

/// Search random allocations over ≥2 aligned price series.
pub fn optimize(
    assets: &[AssetSeries],
    config: &OptimizerConfig,
    seed: u64,
) -> Result<OptimizationResult, AnalyticsError> {
    if assets.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            operation: "portfolio optimization",
            required: 2,
            actual: assets.len(),
        });
    }

    let rows = assets[0].closes.len();
    if assets.iter().any(|a| a.closes.len() != rows) {
        return Err(AnalyticsError::DegenerateInput(
            "price series are not aligned to a common index",
        ));
    }
    if rows < 2 {
        return Err(AnalyticsError::InsufficientData {
            operation: "portfolio optimization",
            required: 2,
            actual: rows,
        });
    }
    if assets
        .iter()
        .any(|a| a.closes[..rows - 1].iter().any(|&c| c == 0.0))
    {
        return Err(AnalyticsError::DegenerateInput(
            "zero close price makes returns undefined",
        ));
    }

    let num_assets = assets.len();
    let returns: Vec<Vec<f64>> = assets
        .iter()
        .map(|a| stats::simple_returns(&a.closes))
        .collect();
    let mean_returns: Vec<f64> = returns.iter().map(|r| stats::mean(r)).collect();

    let mut cov = vec![vec![0.0; num_assets]; num_assets];
    for i in 0..num_assets {
        for j in i..num_assets {
            let c = stats::covariance(&returns[i], &returns[j]);
            cov[i][j] = c;
            cov[j][i] = c;
        }
    }

    let seeds = SeedHierarchy::new(seed);
    let population: Vec<PortfolioCandidate> = (0..config.trials)
        .into_par_iter()
        .map(|t| {
            let mut rng = seeds.rng_for(TRIAL_SEED_LABEL, t as u64);
            let weights = random_weights(num_assets, &mut rng);
            score_candidate(weights, &mean_returns, &cov, config.risk_free_rate)
        })
        .collect();

    // Max Sharpe, ties to the lowest trial index; NaN Sharpe never wins.
    let best_index = population
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.sharpe.is_nan())
        .reduce(|best, cand| if cand.1.sharpe > best.1.sharpe { cand } else { best })
        .map(|(i, _)| i)
        .ok_or(AnalyticsError::DegenerateInput(
            "zero volatility in every sampled portfolio",
        ))?;

    Ok(OptimizationResult {
        symbols: assets.iter().map(|a| a.symbol.clone()).collect(),
        best: population[best_index].clone(),
        population,
    })
}

/// Non-negative weights summing to 1: uniform draws, normalized.
fn random_weights(num_assets: usize, rng: &mut impl Rng) -> Vec<f64> {
    let mut weights: Vec<f64> = (0..num_assets).map(|_| rng.gen::<f64>()).collect();
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 {
        // All-zero draw is vanishingly rare; fall back to equal weights.
        let equal = 1.0 / num_assets as f64;
        weights.iter_mut().for_each(|w| *w = equal);
    } else {
        weights.iter_mut().for_each(|w| *w /= sum);
    }
    weights
}

fn score_candidate(
    weights: Vec<f64>,
    mean_returns: &[f64],
    cov: &[Vec<f64>],
    risk_free_rate: f64,
) -> PortfolioCandidate {
    let expected_return = PERIODS_PER_YEAR
        * weights
            .iter()
            .zip(mean_returns)
            .map(|(w, m)| w * m)
            .sum::<f64>();

    // wᵀ·Cov·w, clamped against tiny negative values from rounding
    let mut variance = 0.0;
    for (i, wi) in weights.iter().enumerate() {
        for (j, wj) in weights.iter().enumerate() {
            variance += wi * wj * cov[i][j];
        }
    }
    let volatility = PERIODS_PER_YEAR.sqrt() * variance.max(0.0).sqrt();

    let sharpe = if volatility > 0.0 {
        (expected_return - risk_free_rate) / volatility
    } else {
        f64::NAN
    };

    PortfolioCandidate {
        weights,
        expected_return,
        volatility,
        sharpe,
    }
}
