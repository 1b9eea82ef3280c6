//! Backtest runner: the deterministic per-bar control loop.
//!
//! One run:
//! 1. Load every `(symbol, timeframe)` pair from the `BarSource` and merge
//!    them into one timeline ordered by `(time, symbol, timeframe)`.
//! 2. Per event, snapshot the ledger before anything else happens on that
//!    bar. A strategy sees every fill from bars earlier in the timeline,
//!    including earlier bars of the same timestamp, and nothing newer.
//! 3. Per event: re-check resting orders, clear the indicator provider,
//!    call the strategies, then size, risk-check and submit their orders.
//!    Fills go straight into the ledger through the fill receiver.
//! 4. After the group: mark every symbol at its latest close and append an
//!    equity point.
//!
//! The loop is single-threaded. Strategies, the execution adapter and the
//! provider are reset at the start of every run, so running twice over the
//! same source yields identical results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use barlab_core::components::{IndicatorError, IndicatorProvider, PolicyConfigError};
use barlab_core::domain::{Bar, EquityPoint, Fill, OrderIntent, Portfolio, Timeframe};
use barlab_core::events::{BacktestEvent, EventSink, NullSink};
use barlab_core::execution::{ExecutionAdapter, FillReceiver, SimulatedExecution};
use barlab_core::risk::{RiskChain, RiskContext, RiskDecision};
use barlab_core::sizers::{PositionSizer, SizingContext};
use barlab_core::strategy::{Signal, Strategy, StrategyContext};

use crate::config::{BacktestConfig, ConfigError};
use crate::metrics::PerformanceMetrics;
use crate::result::{BacktestResult, Rejection};
use crate::source::BarSource;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("indicator error: {0}")]
    Indicator(#[from] IndicatorError),
    #[error("sizer or risk policy error: {0}")]
    Policy(#[from] PolicyConfigError),
    #[error("bars for {symbol} {timeframe} are not strictly increasing in time at index {index}")]
    UnorderedBars {
        symbol: String,
        timeframe: Timeframe,
        index: usize,
    },
}

/// One loaded `(symbol, timeframe)` series.
#[derive(Debug)]
struct Series {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

/// Position of one bar in the merged timeline.
#[derive(Debug, Clone, Copy)]
struct Event {
    series: usize,
    index: usize,
}

/// Routes fills into the ledger, the trade list and the event sink.
struct Ledger<'a> {
    portfolio: Portfolio,
    fills: Vec<Fill>,
    sink: &'a dyn EventSink,
}

impl FillReceiver for Ledger<'_> {
    fn on_fill(&mut self, fill: Fill) {
        let realized = self.portfolio.apply(&fill);
        debug!(
            fill_id = %fill.id,
            symbol = %fill.symbol,
            side = %fill.side,
            quantity = fill.quantity,
            price = fill.price,
            realized,
            "fill applied"
        );
        self.sink.publish(&BacktestEvent::Fill(fill.clone()));
        self.fills.push(fill);
    }
}

pub struct BacktestRunner {
    source: Arc<dyn BarSource>,
    strategies: Vec<Box<dyn Strategy>>,
    sizer: Box<dyn PositionSizer>,
    risk: RiskChain,
    /// Overrides the `SimulatedExecution` built from the config.
    execution: Option<Box<dyn ExecutionAdapter>>,
    sink: Arc<dyn EventSink>,
    provider: IndicatorProvider,
}

impl BacktestRunner {
    pub fn new(source: Arc<dyn BarSource>, sizer: Box<dyn PositionSizer>) -> Self {
        Self {
            source,
            strategies: Vec::new(),
            sizer,
            risk: RiskChain::default(),
            execution: None,
            sink: Arc::new(NullSink),
            provider: IndicatorProvider::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn with_boxed_strategy(mut self, strategy: Box<dyn Strategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn with_risk(mut self, risk: RiskChain) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_execution(mut self, execution: impl ExecutionAdapter + 'static) -> Self {
        self.execution = Some(Box::new(execution));
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn provider(&self) -> &IndicatorProvider {
        &self.provider
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run one backtest over `config`.
    pub fn run(&mut self, config: &BacktestConfig) -> Result<BacktestResult, RunError> {
        config.validate()?;
        let run_id = config.run_id()?;
        info!(
            %run_id,
            symbols = ?config.symbols,
            timeframes = ?config.timeframes,
            strategies = ?self.strategy_names(),
            "backtest started"
        );

        let series = self.load_series(config)?;
        let timeline = merge_timeline(&series);
        if timeline.is_empty() {
            warn!(%run_id, "no bars in range; nothing to simulate");
            return Ok(BacktestResult::empty(run_id, config.initial_cash));
        }

        let mut simulated;
        let execution: &mut dyn ExecutionAdapter = match self.execution.as_mut() {
            Some(custom) => custom.as_mut(),
            None => {
                simulated = SimulatedExecution::new(config.execution);
                &mut simulated
            }
        };
        execution.reset();
        for strategy in &mut self.strategies {
            strategy.reset();
        }
        self.provider.clear();

        let sink = self.sink.as_ref();
        let mut ledger = Ledger {
            portfolio: Portfolio::new(config.initial_cash),
            fills: Vec::new(),
            sink,
        };
        let mut equity_curve = Vec::new();
        let mut signals: Vec<Signal> = Vec::new();
        let mut rejections = Vec::new();
        let mut bars_processed = 0;

        let mut start = 0;
        while start < timeline.len() {
            let time = bar_of(&series, timeline[start]).time;
            let end = start
                + timeline[start..]
                    .iter()
                    .take_while(|e| bar_of(&series, **e).time == time)
                    .count();
            let group = &timeline[start..end];
            start = end;

            let mut simulated_bar = false;

            for &event in group {
                let pair = &series[event.series];
                let history = &pair.bars[..=event.index];
                let bar = &pair.bars[event.index];
                bars_processed += 1;

                let snapshot =
                    (event.index >= config.warmup_bars).then(|| ledger.portfolio.state());
                execution.on_bar(&pair.symbol, bar, &mut ledger);

                let Some(snapshot) = snapshot else {
                    continue;
                };
                simulated_bar = true;
                self.provider.clear();

                let mut orders: Vec<OrderIntent> = Vec::new();
                for strategy in &mut self.strategies {
                    if strategy.warmup_period() > history.len() {
                        continue;
                    }
                    let ctx = StrategyContext {
                        symbol: &pair.symbol,
                        timeframe: pair.timeframe,
                        bars: history,
                        state: &snapshot,
                        position: snapshot.position(&pair.symbol),
                        provider: &self.provider,
                    };
                    let output = strategy.on_bar(&ctx)?;
                    for signal in output.signals {
                        sink.publish(&BacktestEvent::Signal(signal.clone()));
                        signals.push(signal);
                    }
                    orders.extend(output.orders);
                }

                for intent in orders {
                    if intent.symbol != pair.symbol {
                        warn!(
                            order_symbol = %intent.symbol,
                            bar_symbol = %pair.symbol,
                            "order for a symbol other than the current bar dropped"
                        );
                        continue;
                    }
                    let state = ledger.portfolio.state();
                    let sizing = SizingContext {
                        state: &state,
                        bars: history,
                        timeframe: pair.timeframe,
                        provider: &self.provider,
                    };
                    let sized = self.sizer.size(&intent, &sizing);
                    let price = sizing.entry_price(&sized).unwrap_or(bar.close);
                    let decision = self.risk.evaluate(
                        &sized,
                        &RiskContext {
                            state: &state,
                            price,
                        },
                    );

                    match decision {
                        RiskDecision::Rejected { policy, reason } => {
                            debug!(
                                symbol = %sized.symbol,
                                side = %sized.side,
                                quantity = sized.sized_quantity(),
                                %policy,
                                %reason,
                                "order rejected"
                            );
                            sink.publish(&BacktestEvent::OrderRejected {
                                time: bar.time,
                                intent: sized.clone(),
                                policy: policy.clone(),
                                reason: reason.clone(),
                            });
                            rejections.push(Rejection {
                                time: bar.time,
                                intent: sized,
                                policy,
                                reason,
                            });
                        }
                        RiskDecision::Approved if sized.sized_quantity() <= 0.0 => {
                            debug!(symbol = %sized.symbol, tag = %sized.tag, "zero quantity; not submitted");
                        }
                        RiskDecision::Approved => {
                            let ack = execution.submit(&sized, bar, &mut ledger);
                            sink.publish(&BacktestEvent::OrderApproved {
                                time: bar.time,
                                order_id: ack.order_id,
                                intent: sized,
                                status: ack.status,
                            });
                        }
                    }
                }
            }

            for &event in group {
                let pair = &series[event.series];
                ledger
                    .portfolio
                    .mark(&pair.symbol, pair.bars[event.index].close);
            }
            if simulated_bar {
                equity_curve.push(EquityPoint {
                    time,
                    equity: ledger.portfolio.equity(),
                });
            }
        }

        let final_equity = ledger.portfolio.equity();
        let metrics = PerformanceMetrics::compute(config.initial_cash, &equity_curve, &ledger.fills);
        info!(
            %run_id,
            bars_processed,
            fills = ledger.fills.len(),
            rejections = rejections.len(),
            final_equity,
            total_return = metrics.total_return,
            "backtest finished"
        );

        Ok(BacktestResult {
            run_id,
            initial_cash: config.initial_cash,
            final_equity,
            equity_curve,
            trades: ledger.fills,
            rejections,
            signals,
            bars_processed,
            metrics,
        })
    }

    /// Non-empty, time-ordered series for every configured pair.
    fn load_series(&self, config: &BacktestConfig) -> Result<Vec<Series>, RunError> {
        let mut series = Vec::new();
        for symbol in &config.symbols {
            for &timeframe in &config.timeframes {
                let bars: Vec<Bar> = self
                    .source
                    .bars(symbol, timeframe, config.start, config.end)
                    .into_iter()
                    .filter(|bar| in_window(bar.time, config))
                    .collect();
                if bars.is_empty() {
                    warn!(%symbol, %timeframe, "no bars for pair; skipped");
                    continue;
                }
                if let Some(index) = bars.windows(2).position(|w| w[1].time <= w[0].time) {
                    return Err(RunError::UnorderedBars {
                        symbol: symbol.clone(),
                        timeframe,
                        index: index + 1,
                    });
                }
                debug!(%symbol, %timeframe, bars = bars.len(), "series loaded");
                series.push(Series {
                    symbol: symbol.clone(),
                    timeframe,
                    bars,
                });
            }
        }
        Ok(series)
    }
}

impl std::fmt::Debug for BacktestRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BacktestRunner")
            .field("strategies", &self.strategy_names())
            .field("sizer", &self.sizer.name())
            .field("risk", &self.risk)
            .field("execution", &self.execution.as_ref().map(|e| e.name()))
            .finish()
    }
}

fn in_window(time: DateTime<Utc>, config: &BacktestConfig) -> bool {
    time >= config.start && time <= config.end
}

fn bar_of(series: &[Series], event: Event) -> &Bar {
    &series[event.series].bars[event.index]
}

/// Every bar of every series, ordered by `(time, symbol, timeframe)`.
fn merge_timeline(series: &[Series]) -> Vec<Event> {
    let mut timeline: Vec<Event> = series
        .iter()
        .enumerate()
        .flat_map(|(s, pair)| (0..pair.bars.len()).map(move |index| Event { series: s, index }))
        .collect();
    timeline.sort_by(|a, b| {
        let (pa, pb) = (&series[a.series], &series[b.series]);
        bar_of(series, *a)
            .time
            .cmp(&bar_of(series, *b).time)
            .then_with(|| pa.symbol.cmp(&pb.symbol))
            .then_with(|| pa.timeframe.cmp(&pb.timeframe))
    });
    timeline
}
