//! Typed indicator specifications.
//!
//! `IndicatorSpec` names every indicator in the library together with its
//! parameters. Strategies resolve their specs once at construction, so the
//! hot path never parses strings: `key` produces the provider cache key and
//! `build` constructs a fresh boxed indicator.

use serde::{Deserialize, Serialize};

use super::error::IndicatorError;
use super::indicator::DynIndicator;
use crate::domain::Timeframe;
use crate::indicators::{
    Adx, Atr, Bollinger, ChoppinessIndex, Dema, Donchian, Ema, Ichimoku, Keltner, LinRegChannel,
    Macd, Momentum, ParabolicSar, Rma, Roc, Rsi, Sma, StdDev, Stochastic, SuperTrend, Tema, Trix,
    Vwma, WilliamsR, Wma, ZigZag,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorSpec {
    Sma { period: usize },
    Ema { period: usize },
    Rma { period: usize },
    Wma { period: usize },
    Vwma { period: usize },
    StdDev { period: usize },
    Roc { period: usize },
    Momentum { period: usize },
    Rsi { period: usize },
    Atr { period: usize },
    Adx { period: usize },
    Dema { period: usize },
    Tema { period: usize },
    Trix { period: usize },
    Donchian { period: usize },
    WilliamsR { period: usize },
    Choppiness { period: usize },
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger { period: usize, k: f64 },
    Keltner {
        ema_period: usize,
        atr_period: usize,
        multiplier: f64,
    },
    LinRegChannel { period: usize, k: f64 },
    Stochastic { k_period: usize, d_period: usize },
    SuperTrend { period: usize, multiplier: f64 },
    ParabolicSar { step: f64, max: f64 },
    ZigZag { threshold_pct: f64 },
    Ichimoku {
        tenkan: usize,
        kijun: usize,
        senkou_b: usize,
        displacement: usize,
    },
}

impl IndicatorSpec {
    /// Canonical name, identical to the built indicator's `name()`.
    pub fn label(&self) -> String {
        use IndicatorSpec as S;
        match self {
            S::Sma { period } => format!("SMA({period})"),
            S::Ema { period } => format!("EMA({period})"),
            S::Rma { period } => format!("RMA({period})"),
            S::Wma { period } => format!("WMA({period})"),
            S::Vwma { period } => format!("VWMA({period})"),
            S::StdDev { period } => format!("STDDEV({period})"),
            S::Roc { period } => format!("ROC({period})"),
            S::Momentum { period } => format!("MOM({period})"),
            S::Rsi { period } => format!("RSI({period})"),
            S::Atr { period } => format!("ATR({period})"),
            S::Adx { period } => format!("ADX({period})"),
            S::Dema { period } => format!("DEMA({period})"),
            S::Tema { period } => format!("TEMA({period})"),
            S::Trix { period } => format!("TRIX({period})"),
            S::Donchian { period } => format!("DONCHIAN({period})"),
            S::WilliamsR { period } => format!("WILLR({period})"),
            S::Choppiness { period } => format!("CHOP({period})"),
            S::Macd { fast, slow, signal } => format!("MACD({fast},{slow},{signal})"),
            S::Bollinger { period, k } => format!("BB({period},{k})"),
            S::Keltner {
                ema_period,
                atr_period,
                multiplier,
            } => format!("KC({ema_period},{atr_period},{multiplier})"),
            S::LinRegChannel { period, k } => format!("LINREG({period},{k})"),
            S::Stochastic { k_period, d_period } => format!("STOCH({k_period},{d_period})"),
            S::SuperTrend { period, multiplier } => format!("SUPERTREND({period},{multiplier})"),
            S::ParabolicSar { step, max } => format!("PSAR({step},{max})"),
            S::ZigZag { threshold_pct } => format!("ZIGZAG({threshold_pct})"),
            S::Ichimoku {
                tenkan,
                kijun,
                senkou_b,
                displacement,
            } => format!("ICHIMOKU({tenkan},{kijun},{senkou_b},{displacement})"),
        }
    }

    /// Provider cache key, e.g. `"RSI(14)|1d"`.
    pub fn key(&self, timeframe: Timeframe) -> String {
        format!("{}|{}", self.label(), timeframe)
    }

    /// Construct a fresh indicator. Parameter validation happens here.
    pub fn build(&self) -> Result<Box<dyn DynIndicator>, IndicatorError> {
        use IndicatorSpec as S;
        let indicator: Box<dyn DynIndicator> = match *self {
            S::Sma { period } => Box::new(Sma::new(period)?),
            S::Ema { period } => Box::new(Ema::new(period)?),
            S::Rma { period } => Box::new(Rma::new(period)?),
            S::Wma { period } => Box::new(Wma::new(period)?),
            S::Vwma { period } => Box::new(Vwma::new(period)?),
            S::StdDev { period } => Box::new(StdDev::new(period)?),
            S::Roc { period } => Box::new(Roc::new(period)?),
            S::Momentum { period } => Box::new(Momentum::new(period)?),
            S::Rsi { period } => Box::new(Rsi::new(period)?),
            S::Atr { period } => Box::new(Atr::new(period)?),
            S::Adx { period } => Box::new(Adx::new(period)?),
            S::Dema { period } => Box::new(Dema::new(period)?),
            S::Tema { period } => Box::new(Tema::new(period)?),
            S::Trix { period } => Box::new(Trix::new(period)?),
            S::Donchian { period } => Box::new(Donchian::new(period)?),
            S::WilliamsR { period } => Box::new(WilliamsR::new(period)?),
            S::Choppiness { period } => Box::new(ChoppinessIndex::new(period)?),
            S::Macd { fast, slow, signal } => Box::new(Macd::new(fast, slow, signal)?),
            S::Bollinger { period, k } => Box::new(Bollinger::new(period, k)?),
            S::Keltner {
                ema_period,
                atr_period,
                multiplier,
            } => Box::new(Keltner::new(ema_period, atr_period, multiplier)?),
            S::LinRegChannel { period, k } => Box::new(LinRegChannel::new(period, k)?),
            S::Stochastic { k_period, d_period } => Box::new(Stochastic::new(k_period, d_period)?),
            S::SuperTrend { period, multiplier } => Box::new(SuperTrend::new(period, multiplier)?),
            S::ParabolicSar { step, max } => Box::new(ParabolicSar::new(step, max)?),
            S::ZigZag { threshold_pct } => Box::new(ZigZag::new(threshold_pct)?),
            S::Ichimoku {
                tenkan,
                kijun,
                senkou_b,
                displacement,
            } => Box::new(Ichimoku::new(tenkan, kijun, senkou_b, displacement)?),
        };
        Ok(indicator)
    }

    /// Bars needed before the indicator produces a valid result.
    pub fn warmup_period(&self) -> Result<usize, IndicatorError> {
        Ok(self.build()?.warmup())
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        self.build().map(|_| ())
    }

    /// One spec per indicator with conventional parameters.
    pub fn catalog() -> Vec<IndicatorSpec> {
        use IndicatorSpec as S;
        vec![
            S::Sma { period: 20 },
            S::Ema { period: 20 },
            S::Rma { period: 14 },
            S::Wma { period: 20 },
            S::Vwma { period: 20 },
            S::StdDev { period: 20 },
            S::Roc { period: 12 },
            S::Momentum { period: 10 },
            S::Rsi { period: 14 },
            S::Atr { period: 14 },
            S::Adx { period: 14 },
            S::Dema { period: 20 },
            S::Tema { period: 20 },
            S::Trix { period: 15 },
            S::Donchian { period: 20 },
            S::WilliamsR { period: 14 },
            S::Choppiness { period: 14 },
            S::Macd {
                fast: 12,
                slow: 26,
                signal: 9,
            },
            S::Bollinger { period: 20, k: 2.0 },
            S::Keltner {
                ema_period: 20,
                atr_period: 10,
                multiplier: 1.5,
            },
            S::LinRegChannel { period: 20, k: 2.0 },
            S::Stochastic {
                k_period: 14,
                d_period: 3,
            },
            S::SuperTrend {
                period: 10,
                multiplier: 3.0,
            },
            S::ParabolicSar {
                step: 0.02,
                max: 0.2,
            },
            S::ZigZag { threshold_pct: 5.0 },
            S::Ichimoku {
                tenkan: 9,
                kijun: 26,
                senkou_b: 52,
                displacement: 26,
            },
        ]
    }
}
