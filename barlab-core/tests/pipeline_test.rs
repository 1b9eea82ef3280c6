//! Order pipeline integration: sizer → risk chain → execution → ledger.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use barlab_core::components::{IndicatorProvider, IndicatorSpec};
use barlab_core::domain::{
    Bar, Fill, FillId, OrderId, OrderIntent, OrderSide, Portfolio, PositionSide, Timeframe,
};
use barlab_core::execution::{ExecutionAdapter, ExecutionSettings, SimulatedExecution};
use barlab_core::indicators::RingBuffer;
use barlab_core::risk::{
    BuyingPower, MaxOrderQuantity, RiskChain, RiskContext, RiskDecision, RiskPolicy,
};
use barlab_core::sizers::{PercentOfEquity, PositionSizer, SizingContext};

fn t(i: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(i)
}

fn fill(n: u64, side: OrderSide, quantity: f64, price: f64) -> Fill {
    Fill {
        id: FillId(n),
        order_id: OrderId(n),
        symbol: "SPY".into(),
        time: t(n as i64),
        side,
        quantity,
        price,
        fees: 0.0,
    }
}

fn bar(i: i64, close: f64) -> Bar {
    Bar::new(t(i), close, close + 1.0, close - 1.0, close, 10_000.0).with_symbol("SPY")
}

#[test]
fn netting_long_partial_close_then_flip_short() {
    let mut portfolio = Portfolio::new(10_000.0);

    portfolio.apply(&fill(1, OrderSide::Buy, 100.0, 10.0));
    let pos = portfolio.position("SPY").unwrap().clone();
    assert_eq!(pos.side, PositionSide::Long);
    assert_eq!(pos.quantity, 100.0);
    assert_eq!(pos.avg_price, 10.0);
    assert_eq!(portfolio.cash(), 9_000.0);

    let realized = portfolio.apply(&fill(2, OrderSide::Sell, 40.0, 12.0));
    assert_eq!(realized, 80.0);
    let pos = portfolio.position("SPY").unwrap().clone();
    assert_eq!(pos.quantity, 60.0);
    assert_eq!(pos.avg_price, 10.0);
    assert_eq!(portfolio.cash(), 9_480.0);

    let realized = portfolio.apply(&fill(3, OrderSide::Sell, 100.0, 9.0));
    assert_eq!(realized, -60.0);
    let pos = portfolio.position("SPY").unwrap().clone();
    assert_eq!(pos.side, PositionSide::Short);
    assert_eq!(pos.quantity, 40.0);
    assert_eq!(pos.avg_price, 9.0);
    assert_eq!(portfolio.realized_pnl(), 20.0);
    assert_eq!(portfolio.state().signed_quantity("SPY"), -40.0);
}

struct Spy {
    name: &'static str,
    decision: RiskDecision,
    calls: Arc<AtomicUsize>,
}

impl RiskPolicy for Spy {
    fn name(&self) -> &str {
        self.name
    }

    fn check(&self, _intent: &OrderIntent, _ctx: &RiskContext<'_>) -> RiskDecision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.decision.clone()
    }
}

#[test]
fn chain_short_circuits_on_first_rejection() {
    let a_calls = Arc::new(AtomicUsize::new(0));
    let b_calls = Arc::new(AtomicUsize::new(0));
    let chain = RiskChain::new(vec![
        Box::new(Spy {
            name: "A",
            decision: RiskDecision::reject("A", "always"),
            calls: Arc::clone(&a_calls),
        }),
        Box::new(Spy {
            name: "B",
            decision: RiskDecision::Approved,
            calls: Arc::clone(&b_calls),
        }),
    ]);
    let state = Portfolio::new(1_000.0).state();
    let ctx = RiskContext {
        state: &state,
        price: 10.0,
    };
    let decision = chain.evaluate(&OrderIntent::market("SPY", OrderSide::Buy), &ctx);

    assert_eq!(decision, RiskDecision::reject("A", "always"));
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn sized_order_flows_through_chain_into_ledger() {
    let bars = vec![bar(0, 50.0), bar(1, 52.0)];
    let provider = IndicatorProvider::new();
    let mut portfolio = Portfolio::new(10_000.0);
    let chain = RiskChain::default()
        .with(MaxOrderQuantity::new(1_000.0).unwrap())
        .with(BuyingPower);
    let sizer = PercentOfEquity::new(0.5).unwrap();
    let mut execution = SimulatedExecution::new(ExecutionSettings::frictionless());

    let state = portfolio.state();
    let ctx = SizingContext {
        state: &state,
        bars: &bars,
        timeframe: Timeframe::D1,
        provider: &provider,
    };
    let intent = sizer.size(&OrderIntent::market("SPY", OrderSide::Buy), &ctx);
    // floor(5000 / 52)
    assert_eq!(intent.sized_quantity(), 96.0);

    let price = ctx.entry_price(&intent).unwrap();
    let decision = chain.evaluate(
        &intent,
        &RiskContext {
            state: &state,
            price,
        },
    );
    assert!(decision.is_approved());

    let mut fills = Vec::new();
    execution.submit(&intent, &bars[1], &mut fills);
    for f in &fills {
        portfolio.apply(f);
    }
    portfolio.mark("SPY", 52.0);
    assert_eq!(portfolio.cash(), 10_000.0 - 96.0 * 52.0);
    assert_eq!(portfolio.equity(), 10_000.0);
}

#[test]
fn buying_power_blocks_oversized_buy() {
    let state = Portfolio::new(1_000.0).state();
    let chain = RiskChain::default().with(BuyingPower);
    let intent = OrderIntent::market("SPY", OrderSide::Buy).with_quantity(30.0);
    let decision = chain.evaluate(
        &intent,
        &RiskContext {
            state: &state,
            price: 50.0,
        },
    );
    assert!(!decision.is_approved());
}

#[test]
fn ring_buffer_wraparound() {
    let mut buffer = RingBuffer::new(4).unwrap();
    for v in 1..=7 {
        buffer.add(v as f64);
    }
    assert!(buffer.is_full());
    assert_eq!(buffer.len(), 4);
    // 7 inserted into capacity 4: the 4th inserted value is the oldest survivor.
    assert_eq!(buffer.get(0).unwrap(), 4.0);
    assert_eq!(buffer.get(3).unwrap(), 7.0);
    assert!(buffer.get(4).is_err());
}

#[test]
fn provider_computes_once_per_key_per_bar() {
    let bars: Vec<Bar> = (0..30).map(|i| bar(i, 100.0 + i as f64)).collect();
    let provider = IndicatorProvider::new();
    let sma = IndicatorSpec::Sma { period: 5 };

    for _ in 0..4 {
        provider.current(&sma, Timeframe::D1, &bars).unwrap();
        provider.previous(&sma, Timeframe::D1, &bars).unwrap();
    }
    assert_eq!(provider.computations(), 1);

    // A different timeframe is a different key.
    provider.current(&sma, Timeframe::H1, &bars).unwrap();
    assert_eq!(provider.computations(), 2);

    // Next bar: cache cleared, one more replay.
    provider.clear();
    provider.current(&sma, Timeframe::D1, &bars).unwrap();
    assert_eq!(provider.computations(), 3);
}

#[test]
fn provider_tolerates_concurrent_readers() {
    let bars: Vec<Bar> = (0..60).map(|i| bar(i, 100.0 + (i as f64).sin())).collect();
    let provider = IndicatorProvider::new();
    let spec = IndicatorSpec::Rsi { period: 14 };

    let values: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| provider.current(&spec, Timeframe::D1, &bars).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(values.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(provider.len(), 1);
}
