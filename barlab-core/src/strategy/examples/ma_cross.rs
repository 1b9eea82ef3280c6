//! Moving Average Crossover strategy
//!
//! Classic trend-following:
//! - Long when the fast MA crosses above the slow MA (golden cross)
//! - Short (or flat, when shorting is disabled) when it crosses below
//!
//! Both averages come from the indicator provider: `current` and `previous`
//! read the same memoized series, so the four values cost two computations.

use crate::components::{IndicatorError, IndicatorSpec};
use crate::strategy::{SignalIntent, Strategy, StrategyContext, StrategyOutput};

/// Moving average type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaType {
    Sma,
    Ema,
}

impl MaType {
    fn spec(&self, period: usize) -> IndicatorSpec {
        match self {
            MaType::Sma => IndicatorSpec::Sma { period },
            MaType::Ema => IndicatorSpec::Ema { period },
        }
    }
}

/// # Parameters
/// - `fast_period`: Short MA period (e.g., 20)
/// - `slow_period`: Long MA period (e.g., 50)
/// - `allow_short`: take the short side on a death cross instead of going flat
#[derive(Debug, Clone)]
pub struct MaCrossover {
    name: String,
    fast: IndicatorSpec,
    slow: IndicatorSpec,
    warmup: usize,
    allow_short: bool,
}

impl MaCrossover {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        ma_type: MaType,
    ) -> Result<Self, IndicatorError> {
        if fast_period == 0 || slow_period <= fast_period {
            return Err(IndicatorError::invalid(
                "slow_period",
                format!("need 0 < fast ({fast_period}) < slow ({slow_period})"),
            ));
        }
        let fast = ma_type.spec(fast_period);
        let slow = ma_type.spec(slow_period);
        // One extra bar so the previous values are valid too
        let warmup = fast.warmup_period()?.max(slow.warmup_period()?) + 1;
        Ok(Self {
            name: format!("ma_cross({},{})", fast.label(), slow.label()),
            fast,
            slow,
            warmup,
            allow_short: false,
        })
    }

    pub fn default_params() -> Result<Self, IndicatorError> {
        Self::new(10, 50, MaType::Sma)
    }

    pub fn with_shorts(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }

    /// `Some(true)` on a golden cross, `Some(false)` on a death cross.
    fn detect_cross(&self, ctx: &StrategyContext<'_>) -> Result<Option<bool>, IndicatorError> {
        let provider = ctx.provider;
        let value = |spec: &IndicatorSpec, previous: bool| -> Result<Option<f64>, IndicatorError> {
            let v = if previous {
                provider.previous(spec, ctx.timeframe, ctx.bars)?
            } else {
                provider.current(spec, ctx.timeframe, ctx.bars)?
            };
            Ok(v.and_then(|v| v.valid_at(0)))
        };
        let (Some(fast_now), Some(slow_now), Some(fast_prev), Some(slow_prev)) = (
            value(&self.fast, false)?,
            value(&self.slow, false)?,
            value(&self.fast, true)?,
            value(&self.slow, true)?,
        ) else {
            return Ok(None);
        };

        Ok(if fast_prev <= slow_prev && fast_now > slow_now {
            Some(true)
        } else if fast_prev >= slow_prev && fast_now < slow_now {
            Some(false)
        } else {
            None
        })
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.warmup
    }

    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> Result<StrategyOutput, IndicatorError> {
        let intent = match self.detect_cross(ctx)? {
            Some(true) => SignalIntent::Long,
            Some(false) if self.allow_short => SignalIntent::Short,
            Some(false) => SignalIntent::Flat,
            None => return Ok(StrategyOutput::empty()),
        };
        let reason = match intent {
            SignalIntent::Long => "golden cross",
            _ => "death cross",
        };
        Ok(StrategyOutput::empty()
            .with_signal(ctx.signal(&self.name, intent, 1.0, reason))
            .with_orders(ctx.orders_toward(intent, &self.name)))
    }

    fn reset(&mut self) {}
}
