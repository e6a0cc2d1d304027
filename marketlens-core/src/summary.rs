//! Technical summary — last-row snapshot of an annotated series.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::pipeline::{columns, IndicatorFrame};

/// Trend sentiment relative to the 50-day moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

/// Snapshot of the latest row of an [`IndicatorFrame`].
///
/// Missing columns fall back to display defaults (RSI 50, SMAs 0) rather
/// than failing: the summary is a dashboard header, not a trading signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub current_price: f64,
    pub rsi: f64,
    pub sma_20: f64,
    pub sma_50: f64,
    pub sma_200: f64,
    pub sentiment: Sentiment,
}

/// Extract the summary from the last row of the frame.
///
/// Sentiment is Bullish when the close sits above a defined, positive SMA-50
/// and Bearish when below it. A missing or zero SMA-50 yields Neutral — a
/// defensive default, not a trend call.
pub fn summarize(frame: &IndicatorFrame) -> Result<TechnicalSummary, AnalyticsError> {
    if frame.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            operation: "technical summary",
            required: 1,
            actual: 0,
        });
    }

    let last = frame.len() - 1;
    let current_price = frame.bars()[last].close;

    let value_or = |name: &str, default: f64| -> f64 {
        match frame.values().get(name, last) {
            Some(v) if !v.is_nan() => v,
            _ => default,
        }
    };

    let rsi = value_or(columns::RSI, 50.0);
    let sma_20 = value_or(columns::SMA_20, 0.0);
    let sma_50 = value_or(columns::SMA_50, 0.0);
    let sma_200 = value_or(columns::SMA_200, 0.0);

    let sentiment = if sma_50 > 0.0 {
        if current_price > sma_50 {
            Sentiment::Bullish
        } else if current_price < sma_50 {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    } else {
        Sentiment::Neutral
    };

    Ok(TechnicalSummary {
        current_price,
        rsi,
        sma_20,
        sma_50,
        sma_200,
        sentiment,
    })
}
