//! 리플레이(백테스트) 거래소 백엔드.
//!
//! 과거 캔들 데이터를 한 캔들씩 재생하면서 가상 원장에 대해 주문을
//! 체결합니다. 시간은 드라이버가 [`ReplayExchange::advance`]를 호출할
//! 때만 흐릅니다.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use grid_core::{
    Candle, EquityPoint, OrderBook, OrderBookLevel, OrderRequest, OrderResult, Symbol, Ticker,
    Timeframe, TradeRecord,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::RwLock;
use tracing::info;

use crate::replay::candle_store::CandleStore;
use crate::replay::cursor::{ReplayCursor, ReplayStep};
use crate::replay::curve::build_equity_curve;
use crate::replay::export::{self, ExportOutcome};
use crate::sim::{Ledger, MatchingEngine, SimConfig};
use crate::traits::{BalanceSnapshot, Exchange, ExchangeResult};
use crate::ExchangeError;

/// 조회 시 기본 캔들 개수.
const DEFAULT_CANDLE_LIMIT: usize = 100;
/// 합성 호가창의 기본 호가 단계 수.
const DEFAULT_BOOK_DEPTH: u32 = 5;
/// 합성 스프레드 (종가 기준 ±0.01%).
const SYNTHETIC_BID_FACTOR: Decimal = dec!(0.9999);
const SYNTHETIC_ASK_FACTOR: Decimal = dec!(1.0001);

/// 과거 데이터 재생 거래소.
pub struct ReplayExchange {
    config: SimConfig,
    store: Arc<CandleStore>,
    cursor: RwLock<ReplayCursor>,
    ledger: RwLock<Ledger>,
    matching: MatchingEngine,
}

impl ReplayExchange {
    /// 캔들 저장소와 설정으로 리플레이 거래소를 생성합니다.
    pub fn new(config: SimConfig, store: Arc<CandleStore>) -> Self {
        let cursor = ReplayCursor::new(Arc::clone(&store));
        let ledger = Ledger::new(config.symbol.clone(), &config.initial_balances);
        let matching = MatchingEngine::new(config.fee_rate, config.slippage_rate);

        info!(
            symbol = %config.symbol,
            candles = store.len(),
            fee_rate = %config.fee_rate,
            "Replay exchange initialized"
        );

        Self {
            config,
            store,
            cursor: RwLock::new(cursor),
            ledger: RwLock::new(ledger),
            matching,
        }
    }

    /// JSON 캔들 파일에서 리플레이 거래소를 생성합니다.
    pub fn from_file(
        config: SimConfig,
        path: impl AsRef<Path>,
        timeframe: Timeframe,
    ) -> ExchangeResult<Self> {
        let store = Arc::new(CandleStore::load_json(path, timeframe)?);
        Ok(Self::new(config, store))
    }

    fn check_symbol(&self, symbol: &Symbol) -> ExchangeResult<()> {
        if symbol != &self.config.symbol {
            return Err(ExchangeError::SymbolNotFound(symbol.to_string()));
        }
        Ok(())
    }

    /// 시뮬레이션 시계를 다음 캔들로 전진시킵니다.
    ///
    /// 드라이버 전용 메서드로, [`Exchange`] 파사드에는 포함되지 않습니다.
    pub async fn advance(&self) -> ReplayStep {
        self.cursor.write().await.advance()
    }

    /// 현재 커서 위치의 캔들을 반환합니다.
    pub async fn current_candle(&self) -> ExchangeResult<Candle> {
        self.cursor.read().await.current().cloned()
    }

    /// 지금까지의 체결 기록으로 자산 곡선을 계산합니다.
    pub async fn equity_curve(&self) -> Vec<EquityPoint> {
        let ledger = self.ledger.read().await;
        build_equity_curve(
            ledger.trades(),
            &self.config.initial_balances,
            &self.config.symbol,
        )
    }

    /// 체결 기록을 CSV 파일로 내보냅니다.
    pub async fn export_trades_csv(
        &self,
        path: impl AsRef<Path>,
    ) -> ExchangeResult<ExportOutcome> {
        let ledger = self.ledger.read().await;
        export::export_trades_csv(ledger.trades(), path)
    }

    /// 체결 기록을 JSON 파일로 내보냅니다.
    pub async fn export_trades_json(
        &self,
        path: impl AsRef<Path>,
    ) -> ExchangeResult<ExportOutcome> {
        let ledger = self.ledger.read().await;
        export::export_trades_json(ledger.trades(), path)
    }

    /// 자산 곡선을 CSV 파일로 내보냅니다.
    pub async fn export_equity_csv(
        &self,
        path: impl AsRef<Path>,
    ) -> ExchangeResult<ExportOutcome> {
        let curve = self.equity_curve().await;
        export::export_equity_csv(&curve, path)
    }
}

#[async_trait]
impl Exchange for ReplayExchange {
    fn name(&self) -> &str {
        "replay"
    }

    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Candle>> {
        self.check_symbol(symbol)?;
        let limit = limit.map(|l| l as usize).unwrap_or(DEFAULT_CANDLE_LIMIT);

        // 일봉 요청 시 전체 저장소를 일 단위로 집계한 뒤 꼬리를 자름
        if timeframe == Timeframe::D1 && self.store.timeframe() != Timeframe::D1 {
            let daily = self.store.aggregate_daily();
            let start = daily.len().saturating_sub(limit);
            return Ok(daily[start..].to_vec());
        }

        let cursor = self.cursor.read().await;
        Ok(cursor.lookback(limit).to_vec())
    }

    async fn fetch_ticker(&self, symbol: &Symbol) -> ExchangeResult<Ticker> {
        self.check_symbol(symbol)?;
        let cursor = self.cursor.read().await;
        let candle = cursor.current()?;

        Ok(Ticker {
            symbol: symbol.clone(),
            last: candle.close,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            bid: candle.close * SYNTHETIC_BID_FACTOR,
            ask: candle.close * SYNTHETIC_ASK_FACTOR,
            timestamp: candle.timestamp,
        })
    }

    async fn place_order(&self, request: &OrderRequest) -> ExchangeResult<OrderResult> {
        self.check_symbol(&request.symbol)?;

        let (tick_price, timestamp) = {
            let cursor = self.cursor.read().await;
            let candle = cursor.current()?;
            (candle.close, candle.timestamp)
        };

        let mut ledger = self.ledger.write().await;
        self.matching
            .execute(&mut ledger, request, tick_price, timestamp)
    }

    async fn fetch_balance(&self) -> ExchangeResult<BalanceSnapshot> {
        Ok(self.ledger.read().await.snapshot())
    }

    async fn fetch_trades(
        &self,
        symbol: &Symbol,
        limit: usize,
    ) -> ExchangeResult<Vec<TradeRecord>> {
        self.check_symbol(symbol)?;
        Ok(self.ledger.read().await.recent_trades(limit))
    }

    async fn fetch_order_book(
        &self,
        symbol: &Symbol,
        limit: Option<u32>,
    ) -> ExchangeResult<OrderBook> {
        self.check_symbol(symbol)?;
        let cursor = self.cursor.read().await;
        let candle = cursor.current()?;

        // 종가 주변 0.1% 간격의 합성 호가 사다리
        let depth = limit.unwrap_or(DEFAULT_BOOK_DEPTH);
        let step = dec!(0.001);
        let quantity = dec!(100);
        let mut bids = Vec::with_capacity(depth as usize);
        let mut asks = Vec::with_capacity(depth as usize);
        for i in 1..=depth {
            let offset = step * Decimal::from(i);
            bids.push(OrderBookLevel {
                price: candle.close * (Decimal::ONE - offset),
                quantity,
            });
            asks.push(OrderBookLevel {
                price: candle.close * (Decimal::ONE + offset),
                quantity,
            });
        }

        Ok(OrderBook {
            symbol: symbol.clone(),
            bids,
            asks,
            timestamp: candle.timestamp,
        })
    }

    async fn close(&self) -> ExchangeResult<()> {
        info!(name = self.name(), "Exchange closed");
        Ok(())
    }
}
