//! MarketLens Analytics — everything downstream of the indicator pipeline.
//!
//! This crate contains:
//! - Engine configuration (serde/TOML, content-hashed for reproducibility)
//! - Valuation model (Graham-style fair value, upside, valuation status)
//! - Backtest engine (RSI mean-reversion with one-bar signal lag)
//! - Monte Carlo price simulator (GBM, seeded, rayon-parallel)
//! - Portfolio optimizer (random-weight efficient-frontier search)
//! - Factor regression (four-factor OLS shock model)
//! - Composite rating engine (deterministic point scoring)
//!
//! All components are pure functions over in-memory inputs. Stochastic
//! components take an explicit master seed and derive per-path/per-trial
//! RNGs through `marketlens_core::rng::SeedHierarchy`, so results are
//! reproducible regardless of thread count.

pub mod backtest;
pub mod config;
pub mod factor;
pub mod monte_carlo;
pub mod portfolio;
pub mod rating;
pub mod stats;
pub mod valuation;
