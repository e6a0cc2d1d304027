//! Indicator pipeline — annotates a price series with derived columns.
//!
//! Indicators are computed once, up front, and stored by name; consumers
//! (summary, backtest, charts) query the frame instead of recomputing.
//!
//! Failure policy: an empty series comes back as an empty frame, and a
//! sub-computation with no usable output (all NaN, e.g. SMA-200 on a short
//! series) leaves its column absent. The pipeline itself never fails.

use crate::domain::Bar;
use crate::indicators::{
    Bollinger, Donchian, Ema, Indicator, IndicatorValues, ParabolicSar, Rsi, Sma, Vwap,
};

/// Column names produced by [`annotate`].
pub mod columns {
    pub const SMA_20: &str = "sma_20";
    pub const SMA_50: &str = "sma_50";
    pub const SMA_200: &str = "sma_200";
    pub const EMA_20: &str = "ema_20";
    pub const EMA_50: &str = "ema_50";
    pub const EMA_200: &str = "ema_200";
    pub const BB_UPPER: &str = "bollinger_upper_20_2";
    pub const BB_MID: &str = "bollinger_middle_20_2";
    pub const BB_LOWER: &str = "bollinger_lower_20_2";
    pub const PSAR: &str = "psar";
    pub const DC_UPPER: &str = "donchian_upper_20";
    pub const DC_LOWER: &str = "donchian_lower_20";
    pub const VWAP: &str = "vwap";
    pub const RSI: &str = "rsi_14";
}

/// A price series plus its derived indicator columns.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    bars: Vec<Bar>,
    values: IndicatorValues,
}

impl IndicatorFrame {
    /// Assemble a frame from bars and precomputed columns.
    ///
    /// Exposed so tests and collaborators can build frames with hand-crafted
    /// columns; `annotate` is the production path.
    pub fn new(bars: Vec<Bar>, values: IndicatorValues) -> Self {
        Self { bars, values }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn values(&self) -> &IndicatorValues {
        &self.values
    }

    /// Full column by name, if it was produced.
    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.values.get_series(name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Run the full indicator set over a price series.
///
/// Columns: SMA/EMA at 20/50/200, Bollinger (20, 2σ), Parabolic SAR,
/// Donchian (20), whole-series VWAP, RSI (14).
pub fn annotate(bars: Vec<Bar>) -> IndicatorFrame {
    let mut values = IndicatorValues::new();

    if bars.is_empty() {
        return IndicatorFrame { bars, values };
    }

    let indicators: Vec<Box<dyn Indicator>> = vec![
        Box::new(Sma::new(20)),
        Box::new(Sma::new(50)),
        Box::new(Sma::new(200)),
        Box::new(Ema::new(20)),
        Box::new(Ema::new(50)),
        Box::new(Ema::new(200)),
        Box::new(Bollinger::upper(20, 2.0)),
        Box::new(Bollinger::middle(20, 2.0)),
        Box::new(Bollinger::lower(20, 2.0)),
        Box::new(ParabolicSar::default_params()),
        Box::new(Donchian::upper(20)),
        Box::new(Donchian::lower(20)),
        Box::new(Vwap::new()),
        Box::new(Rsi::new(14)),
    ];

    for indicator in &indicators {
        let series = indicator.compute(&bars);
        // A column with no usable output is absent, not all-NaN.
        if series.iter().any(|v| !v.is_nan()) {
            values.insert(indicator.name(), series);
        }
    }

    IndicatorFrame { bars, values }
}
