//! 백테스트 전체 흐름 통합 테스트.
//!
//! 캔들 파일 로드부터 주문 체결, 데이터 소진, 자산 곡선 계산, 결과
//! 내보내기까지 리플레이 백엔드의 수명 주기 전체를 검증합니다.

use std::collections::HashMap;
use std::sync::Arc;

use grid_core::{Candle, OrderRequest, Side, Symbol, Timeframe};
use grid_exchange::{
    CandleStore, Exchange, ExchangeError, ExportOutcome, ReplayExchange, ReplayStep, SimConfig,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn symbol() -> Symbol {
    Symbol::new("BNB", "USDT")
}

fn rising_store(count: i64) -> Arc<CandleStore> {
    let base = 1_700_000_000_000i64;
    let hour = 3_600_000i64;
    let candles = (0..count)
        .filter_map(|i| {
            let p = Decimal::from(100 + i);
            Candle::from_row(&(base + i * hour, p, p + dec!(1), p - dec!(1), p))
        })
        .collect();
    Arc::new(CandleStore::new(candles, Timeframe::H1))
}

fn backtest_config(usdt: Decimal) -> SimConfig {
    let mut initial_balances = HashMap::new();
    initial_balances.insert("USDT".to_string(), usdt);
    SimConfig {
        symbol: symbol(),
        initial_balances,
        fee_rate: dec!(0.001),
        slippage_rate: Decimal::ZERO,
    }
}

#[tokio::test]
async fn test_full_backtest_lifecycle() {
    let exchange = ReplayExchange::new(backtest_config(dec!(1000)), rising_store(10));

    // 첫 캔들(종가 100)에서 매수
    let buy = exchange
        .place_order(&OrderRequest::market(symbol(), Side::Buy, dec!(1)))
        .await
        .unwrap();
    assert_eq!(buy.fill_price, dec!(100));
    assert_eq!(buy.order_id, "1");

    // 5캔들 전진 후(종가 105) 매도
    for _ in 0..5 {
        assert!(exchange.advance().await.is_advanced());
    }
    let sell = exchange
        .place_order(&OrderRequest::market(symbol(), Side::Sell, dec!(1)))
        .await
        .unwrap();
    assert_eq!(sell.fill_price, dec!(105));
    assert_eq!(sell.order_id, "2");

    // 잔고: 1000 - 100 - 0.1 + 105 - 0.105 = 1004.795
    let balance = exchange.fetch_balance().await.unwrap();
    assert_eq!(balance.quote_free(), dec!(1004.795));
    assert_eq!(balance.base_free(), dec!(0));
    assert_eq!(balance.quote_total(), balance.quote_free());

    // 체결 저널: 매도 기록에 실현 손익 반영 (105-100)×1 - 0.105
    let trades = exchange.fetch_trades(&symbol(), 10).await.unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].profit, dec!(0));
    assert_eq!(trades[1].profit, dec!(4.895));

    // 데이터 소진까지 전진
    let mut exhausted = false;
    for _ in 0..10 {
        if exchange.advance().await == ReplayStep::Exhausted {
            exhausted = true;
            break;
        }
    }
    assert!(exhausted);

    // 소진 후에도 조회는 마지막 캔들 기준으로 동작
    let ticker = exchange.fetch_ticker(&symbol()).await.unwrap();
    assert_eq!(ticker.last, dec!(109));

    // 자산 곡선: 마지막 포인트는 최종 호가 잔고와 일치 (포지션 없음)
    let curve = exchange.equity_curve().await;
    assert_eq!(curve.len(), 2);
    assert_eq!(curve.last().unwrap().equity, dec!(1004.795));

    exchange.close().await.unwrap();
}

#[tokio::test]
async fn test_rejected_order_leaves_ledger_intact() {
    let exchange = ReplayExchange::new(backtest_config(dec!(50)), rising_store(3));

    let err = exchange
        .place_order(&OrderRequest::market(symbol(), Side::Buy, dec!(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientBalance { .. }));

    let balance = exchange.fetch_balance().await.unwrap();
    assert_eq!(balance.quote_free(), dec!(50));
    assert!(exchange.fetch_trades(&symbol(), 10).await.unwrap().is_empty());

    // 거부된 주문은 주문 ID를 소비하지 않음
    exchange
        .place_order(&OrderRequest::market(symbol(), Side::Buy, dec!(0.1)))
        .await
        .map(|result| assert_eq!(result.order_id, "1"))
        .unwrap();
}

#[tokio::test]
async fn test_export_round_trip() {
    let exchange = ReplayExchange::new(backtest_config(dec!(1000)), rising_store(5));

    exchange
        .place_order(&OrderRequest::market(symbol(), Side::Buy, dec!(2)))
        .await
        .unwrap();
    exchange.advance().await;
    exchange
        .place_order(&OrderRequest::market(symbol(), Side::Sell, dec!(2)))
        .await
        .unwrap();

    let dir = std::env::temp_dir();
    let trades_csv = dir.join("gridbot_flow_trades.csv");
    let trades_json = dir.join("gridbot_flow_trades.json");
    let equity_csv = dir.join("gridbot_flow_equity.csv");

    assert_eq!(
        exchange.export_trades_csv(&trades_csv).await.unwrap(),
        ExportOutcome::Written { rows: 2 }
    );
    assert_eq!(
        exchange.export_trades_json(&trades_json).await.unwrap(),
        ExportOutcome::Written { rows: 2 }
    );
    assert_eq!(
        exchange.export_equity_csv(&equity_csv).await.unwrap(),
        ExportOutcome::Written { rows: 2 }
    );

    let csv_body = std::fs::read_to_string(&trades_csv).unwrap();
    let mut lines = csv_body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "timestamp,side,price,amount,cost,fee,order_id,profit"
    );
    assert_eq!(csv_body.lines().count(), 3);

    let json_body = std::fs::read_to_string(&trades_json).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&json_body).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);

    let equity_body = std::fs::read_to_string(&equity_csv).unwrap();
    assert!(equity_body.starts_with("timestamp,equity\n"));

    std::fs::remove_file(&trades_csv).ok();
    std::fs::remove_file(&trades_json).ok();
    std::fs::remove_file(&equity_csv).ok();
}

#[tokio::test]
async fn test_backtest_without_trades() {
    let exchange = ReplayExchange::new(backtest_config(dec!(1000)), rising_store(3));

    while exchange.advance().await.is_advanced() {}

    assert!(exchange.equity_curve().await.is_empty());
    assert_eq!(
        exchange
            .export_trades_csv(std::env::temp_dir().join("gridbot_flow_none.csv"))
            .await
            .unwrap(),
        ExportOutcome::NothingToExport
    );
}
