//! CSV artifacts for a finished run.
//!
//! - equity curve: `time,equity`
//! - trade tape: one row per fill

use std::path::Path;

use anyhow::{Context, Result};

use barlab_core::domain::{EquityPoint, Fill};

/// Render an equity curve as CSV.
pub fn equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["time", "equity"])?;
    for point in equity_curve {
        wtr.write_record([point.time.to_rfc3339(), format!("{:.2}", point.equity)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Render fills as CSV.
///
/// Columns: fill_id, order_id, time, symbol, side, quantity, price, fees, notional
pub fn trades_csv(trades: &[Fill]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "fill_id", "order_id", "time", "symbol", "side", "quantity", "price", "fees", "notional",
    ])?;
    for f in trades {
        wtr.write_record([
            f.id.to_string(),
            f.order_id.to_string(),
            f.time.to_rfc3339(),
            f.symbol.clone(),
            f.side.to_string(),
            format!("{:.6}", f.quantity),
            format!("{:.6}", f.price),
            format!("{:.2}", f.fees),
            format!("{:.2}", f.notional()),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn write_equity_csv(path: &Path, equity_curve: &[EquityPoint]) -> Result<()> {
    let csv = equity_csv(equity_curve)?;
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write equity curve to {}", path.display()))
}

pub fn write_trades_csv(path: &Path, trades: &[Fill]) -> Result<()> {
    let csv = trades_csv(trades)?;
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write trades to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use barlab_core::domain::{FillId, OrderId, OrderSide};
    use chrono::{TimeZone, Utc};

    #[test]
    fn equity_csv_has_header_and_rows() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let csv = equity_csv(&[EquityPoint {
            time: t,
            equity: 1234.5,
        }])
        .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "time,equity");
        assert_eq!(lines[1], "2024-01-02T00:00:00+00:00,1234.50");
    }

    #[test]
    fn trades_csv_row() {
        let fill = Fill {
            id: FillId(3),
            order_id: OrderId(2),
            symbol: "SPY".into(),
            time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            side: OrderSide::Sell,
            quantity: 10.0,
            price: 5.0,
            fees: 1.0,
        };
        let csv = trades_csv(&[fill]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("F3,O2,2024-01-02T00:00:00+00:00,SPY,"));
        assert!(row.ends_with(",10.000000,5.000000,1.00,50.00"));
    }

    #[test]
    fn write_to_missing_directory_reports_path() {
        let err = write_equity_csv(Path::new("/nonexistent-dir/equity.csv"), &[]).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent-dir/equity.csv"));
    }
}
