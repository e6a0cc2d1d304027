//! Composite rating engine — deterministic point scoring over the other
//! components' outputs.
//!
//! A hand-tuned heuristic, not a fitted model: the thresholds below are part
//! of the product's contract and are pinned by tests. The 5–15% and
//! −10–−5% upside bands score 0 on purpose.

use marketlens_core::domain::FundamentalsRecord;
use marketlens_core::summary::{Sentiment, TechnicalSummary};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::valuation::{self, ValuationStatus};

/// Final investment rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
}

impl Rating {
    /// Map a composite score to a rating.
    pub fn from_score(score: i32) -> Self {
        if score >= 4 {
            Self::StrongBuy
        } else if score >= 1 {
            Self::Buy
        } else if score >= -1 {
            Self::Hold
        } else {
            Self::Sell
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
        };
        f.write_str(label)
    }
}

/// Net insider transaction activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsiderActivity {
    NetBuying,
    Neutral,
    NetSelling,
}

impl InsiderActivity {
    /// Classify from buy/sell transaction counts.
    pub fn from_counts(buys: usize, sells: usize) -> Self {
        if buys > sells {
            Self::NetBuying
        } else if sells > buys {
            Self::NetSelling
        } else {
            Self::Neutral
        }
    }

    /// Score contribution: +1 / 0 / -1.
    pub fn score(self) -> i32 {
        match self {
            Self::NetBuying => 1,
            Self::Neutral => 0,
            Self::NetSelling => -1,
        }
    }
}

/// Inputs to the composite score.
#[derive(Debug, Clone, Copy)]
pub struct RatingInputs {
    pub sentiment: Sentiment,
    /// Valuation upside in percent (0 when undefined).
    pub upside_pct: f64,
    /// Macro sentiment scalar, roughly -1..+1; negative reads dovish.
    pub macro_sentiment: f64,
    pub insider: InsiderActivity,
}

/// Composite point score.
///
/// Sentiment: Bullish +2, Bearish -2. Upside: >15% +3, >5% +1, <-10% -2,
/// else 0. Dovish macro (< 0) +1. Insider activity ±1.
pub fn score(inputs: &RatingInputs) -> i32 {
    let mut score = match inputs.sentiment {
        Sentiment::Bullish => 2,
        Sentiment::Bearish => -2,
        Sentiment::Neutral => 0,
    };

    if inputs.upside_pct > 15.0 {
        score += 3;
    } else if inputs.upside_pct > 5.0 {
        score += 1;
    } else if inputs.upside_pct < -10.0 {
        score -= 2;
    }

    if inputs.macro_sentiment < 0.0 {
        score += 1;
    }

    score + inputs.insider.score()
}

/// Structured research output for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchVerdict {
    pub rating: Rating,
    pub score: i32,
    /// Intrinsic value per share (the "target price").
    pub fair_value: f64,
    /// Upside to fair value in percent; `None` when the current price is
    /// unusable (scored as 0).
    pub upside_pct: Option<f64>,
    pub valuation_status: Option<ValuationStatus>,
}

/// Aggregate technicals, valuation, macro and insider signals into a rating.
pub fn run_research(
    summary: &TechnicalSummary,
    fundamentals: &FundamentalsRecord,
    macro_sentiment: f64,
    insider: InsiderActivity,
) -> ResearchVerdict {
    let fair_value = valuation::fair_value(fundamentals);
    let upside_pct = valuation::upside_percent(fair_value, fundamentals.current_price);

    let total = score(&RatingInputs {
        sentiment: summary.sentiment,
        upside_pct: upside_pct.unwrap_or(0.0),
        macro_sentiment,
        insider,
    });

    ResearchVerdict {
        rating: Rating::from_score(total),
        score: total,
        fair_value,
        upside_pct,
        valuation_status: upside_pct.map(ValuationStatus::from_upside),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(
        sentiment: Sentiment,
        upside_pct: f64,
        macro_sentiment: f64,
        insider: InsiderActivity,
    ) -> RatingInputs {
        RatingInputs {
            sentiment,
            upside_pct,
            macro_sentiment,
            insider,
        }
    }

    #[test]
    fn bullish_undervalued_dovish_accumulating_is_strong_buy() {
        // 2 + 3 + 1 + 1 = 7
        let i = inputs(Sentiment::Bullish, 20.0, -0.1, InsiderActivity::NetBuying);
        assert_eq!(score(&i), 7);
        assert_eq!(Rating::from_score(7), Rating::StrongBuy);
    }

    #[test]
    fn all_neutral_is_hold() {
        let i = inputs(Sentiment::Neutral, 0.0, 0.0, InsiderActivity::Neutral);
        assert_eq!(score(&i), 0);
        assert_eq!(Rating::from_score(0), Rating::Hold);
    }

    #[test]
    fn rating_thresholds_are_exact() {
        assert_eq!(Rating::from_score(4), Rating::StrongBuy);
        assert_eq!(Rating::from_score(3), Rating::Buy);
        assert_eq!(Rating::from_score(1), Rating::Buy);
        assert_eq!(Rating::from_score(0), Rating::Hold);
        assert_eq!(Rating::from_score(-1), Rating::Hold);
        assert_eq!(Rating::from_score(-2), Rating::Sell);
    }

    #[test]
    fn upside_bands_have_documented_dead_zones() {
        // 5-15% and -10--5% both contribute 0
        let base = |upside| score(&inputs(Sentiment::Neutral, upside, 0.0, InsiderActivity::Neutral));
        assert_eq!(base(10.0), 0);
        assert_eq!(base(-7.0), 0);
        assert_eq!(base(16.0), 3);
        assert_eq!(base(6.0), 1);
        assert_eq!(base(-11.0), -2);
        // Boundaries are exclusive
        assert_eq!(base(15.0), 0);
        assert_eq!(base(5.0), 0);
        assert_eq!(base(-10.0), 0);
    }

    #[test]
    fn dovish_macro_adds_one() {
        let dovish = inputs(Sentiment::Neutral, 0.0, -0.5, InsiderActivity::Neutral);
        let hawkish = inputs(Sentiment::Neutral, 0.0, 0.5, InsiderActivity::Neutral);
        assert_eq!(score(&dovish), 1);
        assert_eq!(score(&hawkish), 0);
    }

    #[test]
    fn bearish_overvalued_selling_is_sell() {
        // -2 - 2 - 1 = -5
        let i = inputs(Sentiment::Bearish, -15.0, 0.2, InsiderActivity::NetSelling);
        assert_eq!(score(&i), -5);
        assert_eq!(Rating::from_score(-5), Rating::Sell);
    }

    #[test]
    fn insider_activity_from_counts() {
        assert_eq!(
            InsiderActivity::from_counts(5, 2),
            InsiderActivity::NetBuying
        );
        assert_eq!(
            InsiderActivity::from_counts(2, 5),
            InsiderActivity::NetSelling
        );
        assert_eq!(InsiderActivity::from_counts(3, 3), InsiderActivity::Neutral);
        assert_eq!(InsiderActivity::from_counts(0, 0), InsiderActivity::Neutral);
    }

    #[test]
    fn rating_serializes_to_product_labels() {
        assert_eq!(
            serde_json::to_string(&Rating::StrongBuy).unwrap(),
            "\"STRONG BUY\""
        );
        assert_eq!(serde_json::to_string(&Rating::Hold).unwrap(), "\"HOLD\"");
        assert_eq!(Rating::StrongBuy.to_string(), "STRONG BUY");
    }

    #[test]
    fn research_verdict_composes_the_components() {
        let summary = TechnicalSummary {
            current_price: 100.0,
            rsi: 55.0,
            sma_20: 98.0,
            sma_50: 95.0,
            sma_200: 90.0,
            sentiment: Sentiment::Bullish,
        };
        // EPS 10, growth 25% (capped 20) → fair value 485, upside 385%
        let fundamentals = FundamentalsRecord {
            eps: 10.0,
            revenue_growth: 0.25,
            current_price: 100.0,
            ..Default::default()
        };
        let verdict = run_research(&summary, &fundamentals, -0.1, InsiderActivity::NetBuying);

        assert_eq!(verdict.score, 7);
        assert_eq!(verdict.rating, Rating::StrongBuy);
        assert!((verdict.fair_value - 485.0).abs() < 1e-10);
        assert!((verdict.upside_pct.unwrap() - 385.0).abs() < 1e-9);
        assert_eq!(verdict.valuation_status, Some(ValuationStatus::Undervalued));
    }

    #[test]
    fn research_verdict_with_zero_price_flags_na() {
        let summary = TechnicalSummary {
            current_price: 0.0,
            rsi: 50.0,
            sma_20: 0.0,
            sma_50: 0.0,
            sma_200: 0.0,
            sentiment: Sentiment::Neutral,
        };
        let fundamentals = FundamentalsRecord::default();
        let verdict = run_research(&summary, &fundamentals, 0.0, InsiderActivity::Neutral);

        assert_eq!(verdict.upside_pct, None);
        assert_eq!(verdict.valuation_status, None);
        // Undefined upside scores 0: neutral everything → HOLD
        assert_eq!(verdict.rating, Rating::Hold);
    }
}
