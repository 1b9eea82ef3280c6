//! RSI mean-reversion strategy (long only).
//!
//! - Long when RSI drops below `oversold` while flat
//! - Flat when RSI rises above `overbought` while long
//!
//! Holds one streaming `Rsi` per `(symbol, timeframe)` pair instead of going
//! through the provider. The runner only calls `on_bar` after warmup, so each
//! call first catches the pair's RSI up on any bars it has not seen yet.

use std::collections::BTreeMap;

use crate::components::error::require_period;
use crate::components::{Indicator, IndicatorError};
use crate::domain::Timeframe;
use crate::indicators::Rsi;
use crate::strategy::{SignalIntent, Strategy, StrategyContext, StrategyOutput};

#[derive(Debug, Clone)]
struct PairState {
    rsi: Rsi,
    /// Number of bars of the pair already fed to `rsi`.
    fed: usize,
    last: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RsiReversion {
    name: String,
    period: usize,
    oversold: f64,
    overbought: f64,
    pairs: BTreeMap<(String, Timeframe), PairState>,
}

impl RsiReversion {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        if !(0.0..=100.0).contains(&oversold)
            || !(0.0..=100.0).contains(&overbought)
            || oversold >= overbought
        {
            return Err(IndicatorError::invalid(
                "oversold",
                format!("need 0 <= oversold ({oversold}) < overbought ({overbought}) <= 100"),
            ));
        }
        Ok(Self {
            name: format!("rsi_reversion({period},{oversold},{overbought})"),
            period,
            oversold,
            overbought,
            pairs: BTreeMap::new(),
        })
    }

    pub fn default_params() -> Result<Self, IndicatorError> {
        Self::new(14, 30.0, 70.0)
    }

    /// Feed unseen bars and return the latest valid RSI.
    fn advance(&mut self, ctx: &StrategyContext<'_>) -> Result<Option<f64>, IndicatorError> {
        let key = (ctx.symbol.to_string(), ctx.timeframe);
        let pair = match self.pairs.entry(key) {
            std::collections::btree_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::btree_map::Entry::Vacant(e) => e.insert(PairState {
                rsi: Rsi::new(self.period)?,
                fed: 0,
                last: None,
            }),
        };
        for bar in ctx.bars.iter().skip(pair.fed) {
            pair.last = pair.rsi.update(bar).value();
        }
        pair.fed = pair.fed.max(ctx.bars.len());
        Ok(pair.last)
    }
}

impl Strategy for RsiReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period + 1
    }

    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> Result<StrategyOutput, IndicatorError> {
        let Some(rsi) = self.advance(ctx)? else {
            return Ok(StrategyOutput::empty());
        };
        let position = ctx.signed_position();
        let intent = if rsi < self.oversold && position == 0.0 {
            SignalIntent::Long
        } else if rsi > self.overbought && position > 0.0 {
            SignalIntent::Flat
        } else {
            return Ok(StrategyOutput::empty());
        };
        let strength = match intent {
            SignalIntent::Long => (self.oversold - rsi) / self.oversold.max(f64::EPSILON),
            _ => (rsi - self.overbought) / (100.0 - self.overbought).max(f64::EPSILON),
        };
        Ok(StrategyOutput::empty()
            .with_signal(ctx.signal(&self.name, intent, strength, format!("RSI {rsi:.2}")))
            .with_orders(ctx.orders_toward(intent, &self.name)))
    }

    fn reset(&mut self) {
        self.pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderSide;
    use crate::strategy::test_support::Fixture;

    #[test]
    fn test_enters_long_when_oversold() {
        // Steady decline drives RSI(3) to 0
        let fx = Fixture::new(&[110.0, 108.0, 106.0, 104.0, 102.0]);
        let mut strategy = RsiReversion::new(3, 30.0, 70.0).unwrap();
        let outputs = fx.replay(&mut strategy);
        let first = &outputs[0];
        assert_eq!(first.signals[0].intent, SignalIntent::Long);
        assert_eq!(first.signals[0].strength, 1.0);
        assert_eq!(first.orders[0].side, OrderSide::Buy);
        assert_eq!(first.orders[0].quantity, None);
    }

    #[test]
    fn test_catches_up_on_skipped_bars() {
        // Called only at the final prefix; RSI must still see every bar
        let fx = Fixture::new(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let mut a = RsiReversion::new(3, 30.0, 70.0).unwrap();
        let mut b = a.clone();
        fx.replay(&mut a);
        let state = fx.portfolio.state();
        let ctx = StrategyContext {
            symbol: "SPY",
            timeframe: Timeframe::D1,
            bars: &fx.bars,
            state: &state,
            position: None,
            provider: &fx.provider,
        };
        assert_eq!(a.advance(&ctx).unwrap(), b.advance(&ctx).unwrap());
        assert_eq!(b.advance(&ctx).unwrap(), Some(100.0));
    }

    #[test]
    fn test_reset_forgets_pairs() {
        let fx = Fixture::new(&[110.0, 108.0, 106.0, 104.0]);
        let mut strategy = RsiReversion::new(3, 30.0, 70.0).unwrap();
        let first = fx.replay(&mut strategy);
        strategy.reset();
        assert_eq!(fx.replay(&mut strategy), first);
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        assert!(RsiReversion::new(14, 70.0, 30.0).is_err());
    }
}
