//! Strategies: turn bars and indicator values into signals and orders.
//!
//! The runner calls `on_bar` once per `(pair, bar)` event after the
//! strategy's warmup. A strategy may read the ledger snapshot and its
//! position through the context, but it never mutates the ledger: it only
//! returns order intents, which then go through sizing and risk checks.
//!
//! # Invariants
//! - `on_bar` MUST be deterministic for the same bar sequence and state
//! - `reset` MUST return the strategy to its freshly constructed state

pub mod examples;
pub mod signal;

pub use signal::{Signal, SignalIntent};

use crate::components::{IndicatorError, IndicatorProvider};
use crate::domain::{Bar, OrderIntent, OrderSide, PortfolioState, Position, Timeframe};

/// What a strategy sees on one event.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub symbol: &'a str,
    pub timeframe: Timeframe,
    /// Every bar of this pair so far, newest last.
    pub bars: &'a [Bar],
    /// Ledger snapshot taken at the start of this event, before its bar
    /// touches the ledger.
    pub state: &'a PortfolioState,
    /// Open position in `symbol`, if any.
    pub position: Option<&'a Position>,
    pub provider: &'a IndicatorProvider,
}

impl<'a> StrategyContext<'a> {
    pub fn current_bar(&self) -> Option<&'a Bar> {
        self.bars.last()
    }

    pub fn signed_position(&self) -> f64 {
        self.position.map_or(0.0, Position::signed_quantity)
    }

    /// A signal stamped with this event's pair and time.
    pub fn signal(
        &self,
        strategy: &str,
        intent: SignalIntent,
        strength: f64,
        reason: impl Into<String>,
    ) -> Option<Signal> {
        let bar = self.current_bar()?;
        Some(Signal {
            strategy: strategy.to_string(),
            symbol: self.symbol.to_string(),
            timeframe: self.timeframe,
            time: bar.time,
            intent,
            strength: strength.clamp(0.0, 1.0),
            reason: reason.into(),
        })
    }

    /// Market orders that move the current position toward `intent`.
    ///
    /// Closing legs carry the exact position quantity; new entries are left
    /// unsized for the position sizer. Returns nothing when the position
    /// already matches.
    pub fn orders_toward(&self, intent: SignalIntent, tag: &str) -> Vec<OrderIntent> {
        let current = self.signed_position();
        if !intent.requires_change(current) {
            return Vec::new();
        }
        let mut orders = Vec::with_capacity(2);
        if current != 0.0 {
            let side = if current > 0.0 {
                OrderSide::Sell
            } else {
                OrderSide::Buy
            };
            orders.push(
                OrderIntent::market(self.symbol, side)
                    .with_quantity(current.abs())
                    .with_tag(format!("{tag}:exit")),
            );
        }
        let entry = match intent {
            SignalIntent::Long => Some(OrderSide::Buy),
            SignalIntent::Short => Some(OrderSide::Sell),
            SignalIntent::Flat => None,
        };
        if let Some(side) = entry {
            orders.push(OrderIntent::market(self.symbol, side).with_tag(format!("{tag}:entry")));
        }
        orders
    }
}

/// What a strategy returns from one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyOutput {
    pub signals: Vec<Signal>,
    pub orders: Vec<OrderIntent>,
}

impl StrategyOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, signal: Option<Signal>) -> Self {
        self.signals.extend(signal);
        self
    }

    pub fn with_orders(mut self, orders: impl IntoIterator<Item = OrderIntent>) -> Self {
        self.orders.extend(orders);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty() && self.orders.is_empty()
    }
}

/// A trading strategy driven bar by bar.
pub trait Strategy: Send + Sync {
    /// Strategy name for logging and signals
    fn name(&self) -> &str;

    /// Bars of a pair that must have been seen before `on_bar` is called
    /// for it.
    fn warmup_period(&self) -> usize;

    /// React to the newest bar in `ctx.bars`.
    fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> Result<StrategyOutput, IndicatorError>;

    /// Forget all per-run state.
    fn reset(&mut self);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::Portfolio;
    use crate::indicators::make_bars;

    pub struct Fixture {
        pub portfolio: Portfolio,
        pub bars: Vec<Bar>,
        pub provider: IndicatorProvider,
    }

    impl Fixture {
        pub fn new(closes: &[f64]) -> Self {
            Self {
                portfolio: Portfolio::new(100_000.0),
                bars: make_bars(closes)
                    .into_iter()
                    .map(|b| b.with_symbol("SPY"))
                    .collect(),
                provider: IndicatorProvider::new(),
            }
        }

        /// Run `strategy` over every prefix of the bars, collecting outputs.
        pub fn replay(&self, strategy: &mut dyn Strategy) -> Vec<StrategyOutput> {
            let state = self.portfolio.state();
            let warmup = strategy.warmup_period();
            (1..=self.bars.len())
                .filter(|&n| n >= warmup)
                .map(|n| {
                    self.provider.clear();
                    let ctx = StrategyContext {
                        symbol: "SPY",
                        timeframe: Timeframe::D1,
                        bars: &self.bars[..n],
                        state: &state,
                        position: state.position("SPY"),
                        provider: &self.provider,
                    };
                    strategy.on_bar(&ctx).unwrap()
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::test_support::portfolio_with;

    fn ctx_with<'a>(
        state: &'a PortfolioState,
        bars: &'a [Bar],
        provider: &'a IndicatorProvider,
    ) -> StrategyContext<'a> {
        StrategyContext {
            symbol: "SPY",
            timeframe: Timeframe::D1,
            bars,
            state,
            position: state.position("SPY"),
            provider,
        }
    }

    #[test]
    fn orders_toward_flips_short_to_long() {
        let state = portfolio_with(10_000.0, "SPY", -30.0, 100.0).state();
        let provider = IndicatorProvider::new();
        let ctx = ctx_with(&state, &[], &provider);
        let orders = ctx.orders_toward(SignalIntent::Long, "t");
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].side, OrderSide::Buy);
        assert_eq!(orders[0].quantity, Some(30.0));
        assert_eq!(orders[1].side, OrderSide::Buy);
        assert_eq!(orders[1].quantity, None);
    }

    #[test]
    fn orders_toward_flat_closes_only() {
        let state = portfolio_with(10_000.0, "SPY", 12.0, 100.0).state();
        let provider = IndicatorProvider::new();
        let ctx = ctx_with(&state, &[], &provider);
        let orders = ctx.orders_toward(SignalIntent::Flat, "t");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side, OrderSide::Sell);
        assert_eq!(orders[0].quantity, Some(12.0));
        assert!(ctx.orders_toward(SignalIntent::Long, "t").is_empty());
    }

    #[test]
    fn signal_needs_a_bar() {
        let state = portfolio_with(10_000.0, "SPY", 0.0, 0.0).state();
        let provider = IndicatorProvider::new();
        let ctx = ctx_with(&state, &[], &provider);
        assert!(ctx.signal("s", SignalIntent::Long, 1.0, "x").is_none());
    }

    /// Counts calls and the history length it was given.
    struct CountBars {
        warmup: usize,
        seen: Vec<usize>,
    }

    impl Strategy for CountBars {
        fn name(&self) -> &str {
            "count_bars"
        }

        fn warmup_period(&self) -> usize {
            self.warmup
        }

        fn on_bar(&mut self, ctx: &StrategyContext<'_>) -> Result<StrategyOutput, IndicatorError> {
            self.seen.push(ctx.bars.len());
            Ok(StrategyOutput::empty())
        }

        fn reset(&mut self) {
            self.seen.clear();
        }
    }

    #[test]
    fn fixture_replay_starts_at_warmup() {
        let fx = test_support::Fixture::new(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut strategy = CountBars {
            warmup: 3,
            seen: Vec::new(),
        };
        let outputs = fx.replay(&mut strategy);
        assert_eq!(outputs.len(), 3);
        assert_eq!(strategy.seen, vec![3, 4, 5]);
    }
}
