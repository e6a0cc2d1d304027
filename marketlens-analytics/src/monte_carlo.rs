//! Monte Carlo price simulator — geometric Brownian motion.
//!
//! Drift and volatility are estimated from historical daily returns (sample
//! mean and sample standard deviation), then each path steps
//! `price · exp((μ − σ²/2) + σ·Z)` with independent standard-normal shocks.
//!
//! Paths are independent, so the loop fans out under rayon; each path's RNG
//! is derived from the master seed via the BLAKE3 hierarchy, making the
//! output identical regardless of thread scheduling.

use marketlens_core::domain::Bar;
use marketlens_core::error::AnalyticsError;
use marketlens_core::rng::SeedHierarchy;
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::stats;

/// Minimum historical rows for a usable drift/volatility estimate.
pub const MIN_ROWS: usize = 50;

const PATH_SEED_LABEL: &str = "mc_path";

/// Scalar outcome metrics across all simulated paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Mean final price across paths.
    pub expected_price: f64,
    /// 95th percentile of final prices.
    pub bull_95: f64,
    /// 5th percentile of final prices.
    pub bear_05: f64,
    /// Per-period volatility (σ) of the historical returns. Annualization is
    /// the caller's concern.
    pub volatility: f64,
}

/// Full path matrix plus outcome metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// `paths[m]` holds D+1 prices, starting at the last historical close.
    pub paths: Vec<Vec<f64>>,
    pub metrics: SimulationMetrics,
}

/// Simulate future price paths from a historical series.
///
/// Fails with `InsufficientData` below [`MIN_ROWS`] rows — the drift and
/// volatility estimates would be unreliable — and `DegenerateInput` when a
/// zero close makes percentage returns undefined.
pub fn run_simulation(
    bars: &[Bar],
    config: &SimulationConfig,
    seed: u64,
) -> Result<SimulationResult, AnalyticsError> {
    if bars.len() < MIN_ROWS {
        return Err(AnalyticsError::InsufficientData {
            operation: "monte carlo simulation",
            required: MIN_ROWS,
            actual: bars.len(),
        });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    if closes[..closes.len() - 1].iter().any(|&c| c == 0.0) {
        return Err(AnalyticsError::DegenerateInput(
            "zero close price makes returns undefined",
        ));
    }

    let returns = stats::simple_returns(&closes);
    let mu = stats::mean(&returns);
    let sigma = stats::std_dev(&returns);
    let start_price = *closes.last().unwrap();

    let seeds = SeedHierarchy::new(seed);
    let paths: Vec<Vec<f64>> = (0..config.paths)
        .into_par_iter()
        .map(|m| {
            let mut rng = seeds.rng_for(PATH_SEED_LABEL, m as u64);
            simulate_path(start_price, mu, sigma, config.days, &mut rng)
        })
        .collect();

    let final_prices: Vec<f64> = paths.iter().map(|p| *p.last().unwrap()).collect();
    let metrics = SimulationMetrics {
        expected_price: stats::mean(&final_prices),
        bull_95: stats::percentile(&final_prices, 0.95),
        bear_05: stats::percentile(&final_prices, 0.05),
        volatility: sigma,
    };

    Ok(SimulationResult { paths, metrics })
}

/// One GBM path of `days` steps, starting at `start_price`.
fn simulate_path(start_price: f64, mu: f64, sigma: f64, days: usize, rng: &mut StdRng) -> Vec<f64> {
    let drift = mu - 0.5 * sigma * sigma;
    let mut prices = Vec::with_capacity(days + 1);
    prices.push(start_price);

    let mut price = start_price;
    for _ in 0..days {
        let shock = sigma * standard_normal(rng);
        price *= (drift + shock).exp();
        prices.push(price);
    }
    prices
}

/// Box-Muller transform for a standard normal draw.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
