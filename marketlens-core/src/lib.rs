//! MarketLens Core — domain types, indicator pipeline, technical summary.
//!
//! This crate contains the upstream half of the analytics engine:
//! - Domain types (OHLCV bars, fundamentals records)
//! - The shared error taxonomy
//! - A deterministic seed hierarchy for reproducible stochastic components
//! - The `Indicator` trait and all concrete indicators
//! - The pipeline that annotates a price series with indicator columns
//! - Technical-summary extraction (last-row snapshot + sentiment)
//!
//! Everything is a pure function over in-memory data: no I/O, no shared
//! mutable state, nothing retained across invocations. "Undefined" indicator
//! values (warmup rows before a window fills) are `f64::NAN`, never zero.
//!
//! Input contract: bars are date-ordered ascending with no duplicate dates
//! and finite numeric fields. Callers drop NaN/Inf rows before invoking the
//! engine; the engine does not sanitize.

pub mod domain;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod rng;
pub mod summary;
