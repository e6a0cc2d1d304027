//! Volume Weighted Average Price (VWAP).
//!
//! Cumulative (typical price × volume) / cumulative volume, accumulated over
//! the whole series — not session-reset. Typical price = (high+low+close)/3.
//! Lookback: 0; NaN only while cumulative volume is still zero.

use crate::domain::Bar;
use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Vwap {
    name: String,
}

impl Vwap {
    pub fn new() -> Self {
        Self {
            name: "vwap".to_string(),
        }
    }
}

impl Default for Vwap {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        let mut cum_pv = 0.0;
        let mut cum_vol = 0.0;
        for (i, bar) in bars.iter().enumerate() {
            let typical = (bar.high + bar.low + bar.close) / 3.0;
            cum_pv += typical * bar.volume as f64;
            cum_vol += bar.volume as f64;
            if cum_vol > 0.0 {
                result[i] = cum_pv / cum_vol;
            }
        }

        result
    }
}
