//! 백테스트 결과 내보내기.
//!
//! 체결 기록과 자산 곡선을 CSV/JSON 파일로 기록합니다. 전체 내용을
//! 메모리에서 먼저 만든 뒤 한 번에 쓰므로 실패 시 부분 파일이 남지
//! 않습니다.

use std::path::Path;

use grid_core::{EquityPoint, Side, TradeRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::traits::ExchangeResult;
use crate::ExchangeError;

/// 내보내기 호출의 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// 파일이 기록되었습니다.
    Written { rows: usize },
    /// 기록할 데이터가 없어 파일을 만들지 않았습니다.
    NothingToExport,
}

const TRADES_CSV_HEADER: &str = "timestamp,side,price,amount,cost,fee,order_id,profit";
const EQUITY_CSV_HEADER: &str = "timestamp,equity";

/// 체결 기록을 CSV 파일로 내보냅니다.
pub fn export_trades_csv(
    trades: &[TradeRecord],
    path: impl AsRef<Path>,
) -> ExchangeResult<ExportOutcome> {
    if trades.is_empty() {
        warn!("No trades to export");
        return Ok(ExportOutcome::NothingToExport);
    }

    let mut out = String::from(TRADES_CSV_HEADER);
    out.push('\n');
    for trade in trades {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            trade.timestamp.timestamp_millis(),
            trade.side,
            trade.price,
            trade.amount,
            trade.cost,
            trade.fee,
            trade.order_id,
            trade.profit,
        ));
    }

    write_all(path.as_ref(), &out)?;
    info!(path = %path.as_ref().display(), rows = trades.len(), "Exported trades CSV");
    Ok(ExportOutcome::Written { rows: trades.len() })
}

#[derive(Serialize)]
struct TradeRow<'a> {
    timestamp: i64,
    side: Side,
    price: Decimal,
    amount: Decimal,
    cost: Decimal,
    fee: Decimal,
    order_id: &'a str,
    profit: Decimal,
}

/// 체결 기록을 JSON 배열 파일로 내보냅니다.
pub fn export_trades_json(
    trades: &[TradeRecord],
    path: impl AsRef<Path>,
) -> ExchangeResult<ExportOutcome> {
    if trades.is_empty() {
        warn!("No trades to export");
        return Ok(ExportOutcome::NothingToExport);
    }

    let rows: Vec<TradeRow> = trades
        .iter()
        .map(|t| TradeRow {
            timestamp: t.timestamp.timestamp_millis(),
            side: t.side,
            price: t.price,
            amount: t.amount,
            cost: t.cost,
            fee: t.fee,
            order_id: &t.order_id,
            profit: t.profit,
        })
        .collect();
    let body = serde_json::to_string_pretty(&rows)
        .map_err(|e| ExchangeError::Parse(format!("Failed to serialize trades: {}", e)))?;

    write_all(path.as_ref(), &body)?;
    info!(path = %path.as_ref().display(), rows = trades.len(), "Exported trades JSON");
    Ok(ExportOutcome::Written { rows: trades.len() })
}

/// 자산 곡선을 CSV 파일로 내보냅니다.
pub fn export_equity_csv(
    curve: &[EquityPoint],
    path: impl AsRef<Path>,
) -> ExchangeResult<ExportOutcome> {
    if curve.is_empty() {
        warn!("Equity curve is empty, nothing to export");
        return Ok(ExportOutcome::NothingToExport);
    }

    let mut out = String::from(EQUITY_CSV_HEADER);
    out.push('\n');
    for point in curve {
        out.push_str(&format!(
            "{},{}\n",
            point.timestamp.timestamp_millis(),
            point.equity
        ));
    }

    write_all(path.as_ref(), &out)?;
    info!(path = %path.as_ref().display(), rows = curve.len(), "Exported equity CSV");
    Ok(ExportOutcome::Written { rows: curve.len() })
}

fn write_all(path: &Path, body: &str) -> ExchangeResult<()> {
    std::fs::write(path, body).map_err(ExchangeError::Export)
}
