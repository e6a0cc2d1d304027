//! Backtest engine — RSI mean-reversion over an annotated series.
//!
//! Rule: long below the oversold level, short above the overbought level,
//! flat in between. Yesterday's signal earns today's return (one-period lag,
//! no look-ahead). Rows where RSI is still warming up are flat.

use marketlens_core::error::AnalyticsError;
use marketlens_core::pipeline::{columns, IndicatorFrame};
use serde::{Deserialize, Serialize};

use crate::config::BacktestConfig;

/// Minimum rows for a meaningful strategy simulation.
pub const MIN_ROWS: usize = 50;

/// Scalar performance metrics, all in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub total_return_pct: f64,
    pub market_return_pct: f64,
    pub win_rate_pct: f64,
    pub alpha_pct: f64,
}

/// Per-row strategy columns plus the scalar metrics.
///
/// The return columns are undefined (NaN) at row 0 — there is no prior
/// close. The cumulative curves carry that NaN through at row 0 and start
/// compounding from row 1, so `cumulative_*.last()` is the growth factor of
/// the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Position per row: +1 long, -1 short, 0 flat.
    pub signal: Vec<i8>,
    pub daily_return: Vec<f64>,
    pub strategy_return: Vec<f64>,
    pub cumulative_market: Vec<f64>,
    pub cumulative_strategy: Vec<f64>,
    pub metrics: BacktestMetrics,
}

/// Simulate the RSI mean-reversion strategy over an annotated series.
///
/// Fails with `InsufficientData` below [`MIN_ROWS`] rows and `MissingField`
/// when the frame has no RSI column.
pub fn run_backtest(
    frame: &IndicatorFrame,
    config: &BacktestConfig,
) -> Result<BacktestResult, AnalyticsError> {
    let n = frame.len();
    if n < MIN_ROWS {
        return Err(AnalyticsError::InsufficientData {
            operation: "backtest",
            required: MIN_ROWS,
            actual: n,
        });
    }

    let rsi = frame
        .series(columns::RSI)
        .ok_or(AnalyticsError::MissingField(columns::RSI))?;
    let bars = frame.bars();

    // Signals from RSI thresholds; warmup (NaN) rows stay flat.
    let signal: Vec<i8> = rsi
        .iter()
        .map(|&r| {
            if r < config.oversold {
                1
            } else if r > config.overbought {
                -1
            } else {
                0
            }
        })
        .collect();

    let mut daily_return = vec![f64::NAN; n];
    let mut strategy_return = vec![f64::NAN; n];
    for i in 1..n {
        daily_return[i] = bars[i].close / bars[i - 1].close - 1.0;
        // One-period lag: yesterday's signal earns today's return.
        strategy_return[i] = signal[i - 1] as f64 * daily_return[i];
    }

    let cumulative_market = running_product(&daily_return);
    let cumulative_strategy = running_product(&strategy_return);

    let total_return_pct = (cumulative_strategy[n - 1] - 1.0) * 100.0;
    let market_return_pct = (cumulative_market[n - 1] - 1.0) * 100.0;

    // Win rate over periods with a defined, non-zero strategy return.
    let mut active = 0usize;
    let mut winners = 0usize;
    for &r in &strategy_return {
        if r.is_nan() || r == 0.0 {
            continue;
        }
        active += 1;
        if r > 0.0 {
            winners += 1;
        }
    }
    let win_rate_pct = if active > 0 {
        winners as f64 / active as f64 * 100.0
    } else {
        0.0
    };

    Ok(BacktestResult {
        signal,
        daily_return,
        strategy_return,
        cumulative_market,
        cumulative_strategy,
        metrics: BacktestMetrics {
            total_return_pct,
            market_return_pct,
            win_rate_pct,
            alpha_pct: total_return_pct - market_return_pct,
        },
    })
}

/// Running product of (1 + r), carrying NaN rows through without resetting
/// the accumulator.
fn running_product(returns: &[f64]) -> Vec<f64> {
    let mut acc = 1.0;
    returns
        .iter()
        .map(|&r| {
            if r.is_nan() {
                f64::NAN
            } else {
                acc *= 1.0 + r;
                acc
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use marketlens_core::domain::Bar;
    use marketlens_core::indicators::IndicatorValues;

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        let base_date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect()
    }

    /// Frame with a hand-crafted RSI column.
    fn frame_with_rsi(closes: &[f64], rsi: Vec<f64>) -> IndicatorFrame {
        let mut values = IndicatorValues::new();
        values.insert(columns::RSI, rsi);
        IndicatorFrame::new(make_bars(closes), values)
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        let closes = vec![100.0; 49];
        let frame = frame_with_rsi(&closes, vec![50.0; 49]);
        let err = run_backtest(&frame, &BacktestConfig::default()).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                operation: "backtest",
                required: 50,
                actual: 49,
            }
        );
    }

    #[test]
    fn missing_rsi_is_missing_field() {
        let frame = IndicatorFrame::new(make_bars(&vec![100.0; 60]), IndicatorValues::new());
        let err = run_backtest(&frame, &BacktestConfig::default()).unwrap_err();
        assert_eq!(err, AnalyticsError::MissingField("rsi_14"));
    }

    #[test]
    fn signals_follow_thresholds() {
        let n = 60;
        let closes = vec![100.0; n];
        let mut rsi = vec![50.0; n];
        rsi[10] = 25.0; // oversold → long
        rsi[20] = 75.0; // overbought → short
        rsi[0] = f64::NAN; // warmup → flat

        let frame = frame_with_rsi(&closes, rsi);
        let result = run_backtest(&frame, &BacktestConfig::default()).unwrap();

        assert_eq!(result.signal[10], 1);
        assert_eq!(result.signal[20], -1);
        assert_eq!(result.signal[0], 0);
        assert_eq!(result.signal[30], 0);
    }

    #[test]
    fn position_is_applied_with_one_bar_lag() {
        // Price jumps +10% at row 2. A long signal at row 1 captures it;
        // a long signal at row 2 (same bar) must not.
        let mut closes = vec![100.0; 60];
        for c in closes.iter_mut().skip(2) {
            *c = 110.0;
        }
        let mut rsi = vec![50.0; 60];
        rsi[1] = 25.0;

        let frame = frame_with_rsi(&closes, rsi.clone());
        let result = run_backtest(&frame, &BacktestConfig::default()).unwrap();
        assert!((result.strategy_return[2] - 0.10).abs() < 1e-12);

        // Move the signal onto the jump bar itself: the gain is missed.
        rsi[1] = 50.0;
        rsi[2] = 25.0;
        let frame = frame_with_rsi(&closes, rsi);
        let result = run_backtest(&frame, &BacktestConfig::default()).unwrap();
        assert_eq!(result.strategy_return[2], 0.0);
        assert!((result.metrics.total_return_pct - 0.0).abs() < 1e-9);
    }

    #[test]
    fn market_return_matches_buy_and_hold() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let frame = frame_with_rsi(&closes, vec![50.0; 60]);
        let result = run_backtest(&frame, &BacktestConfig::default()).unwrap();

        let expected = (closes[59] / closes[0] - 1.0) * 100.0;
        assert!((result.metrics.market_return_pct - expected).abs() < 1e-9);
        // Always-flat strategy: zero return, alpha = -market
        assert!((result.metrics.total_return_pct - 0.0).abs() < 1e-12);
        assert!((result.metrics.alpha_pct + expected).abs() < 1e-9);
        assert_eq!(result.metrics.win_rate_pct, 0.0);
    }

    #[test]
    fn short_signal_profits_from_decline() {
        let mut closes = vec![100.0; 60];
        for c in closes.iter_mut().skip(6) {
            *c = 90.0;
        }
        let mut rsi = vec![50.0; 60];
        rsi[5] = 80.0; // short before the drop

        let frame = frame_with_rsi(&closes, rsi);
        let result = run_backtest(&frame, &BacktestConfig::default()).unwrap();
        assert!((result.strategy_return[6] - 0.10).abs() < 1e-12);
        assert_eq!(result.metrics.win_rate_pct, 100.0);
    }

    #[test]
    fn first_row_returns_are_undefined() {
        let frame = frame_with_rsi(&vec![100.0; 60], vec![50.0; 60]);
        let result = run_backtest(&frame, &BacktestConfig::default()).unwrap();
        assert!(result.daily_return[0].is_nan());
        assert!(result.strategy_return[0].is_nan());
        assert!(result.cumulative_market[0].is_nan());
        assert!(!result.cumulative_market[1].is_nan());
    }

    #[test]
    fn alpha_is_total_minus_market() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 12.0)
            .collect();
        let rsi: Vec<f64> = (0..80)
            .map(|i| 50.0 + (i as f64 * 0.4).cos() * 35.0)
            .collect();
        let frame = frame_with_rsi(&closes, rsi);
        let result = run_backtest(&frame, &BacktestConfig::default()).unwrap();
        let m = &result.metrics;
        assert!((m.alpha_pct - (m.total_return_pct - m.market_return_pct)).abs() < 1e-9);
    }
}
