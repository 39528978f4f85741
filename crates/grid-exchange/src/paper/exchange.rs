//! 모의투자(페이퍼 트레이딩) 거래소 백엔드.
//!
//! 시장 데이터는 내부 거래소에서 그대로 가져오고, 주문은 실제 제출
//! 없이 내부 거래소의 현재 시세로 가상 원장에 체결합니다.

use std::sync::Arc;

use async_trait::async_trait;
use grid_core::{
    Candle, OrderBook, OrderRequest, OrderResult, Symbol, Ticker, Timeframe, TradeRecord,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::sim::{Ledger, MatchingEngine, SimConfig};
use crate::traits::{BalanceSnapshot, Exchange, ExchangeResult};
use crate::ExchangeError;

/// 실시간 시세 위에서 동작하는 가상 계정 거래소.
pub struct PaperExchange {
    inner: Arc<dyn Exchange>,
    config: SimConfig,
    ledger: RwLock<Ledger>,
    matching: MatchingEngine,
}

impl PaperExchange {
    /// 시장 데이터 소스가 될 내부 거래소를 감싸 모의투자 거래소를
    /// 생성합니다.
    pub fn new(inner: Arc<dyn Exchange>, config: SimConfig) -> Self {
        let ledger = Ledger::new(config.symbol.clone(), &config.initial_balances);
        let matching = MatchingEngine::new(config.fee_rate, config.slippage_rate);

        info!(
            symbol = %config.symbol,
            data_source = inner.name(),
            "Paper exchange initialized"
        );

        Self {
            inner,
            config,
            ledger: RwLock::new(ledger),
            matching,
        }
    }

    fn check_symbol(&self, symbol: &Symbol) -> ExchangeResult<()> {
        if symbol != &self.config.symbol {
            return Err(ExchangeError::SymbolNotFound(symbol.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Exchange for PaperExchange {
    fn name(&self) -> &str {
        "paper"
    }

    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Candle>> {
        self.inner.fetch_candles(symbol, timeframe, limit).await
    }

    async fn fetch_ticker(&self, symbol: &Symbol) -> ExchangeResult<Ticker> {
        self.inner.fetch_ticker(symbol).await
    }

    async fn place_order(&self, request: &OrderRequest) -> ExchangeResult<OrderResult> {
        self.check_symbol(&request.symbol)?;

        // 내부 거래소의 현재 시세와 시각으로 가상 체결
        let ticker = self.inner.fetch_ticker(&request.symbol).await?;
        let mut ledger = self.ledger.write().await;
        self.matching
            .execute(&mut ledger, request, ticker.last, ticker.timestamp)
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
        self.inner.fetch_order_book(symbol, limit).await
    }

    async fn close(&self) -> ExchangeResult<()> {
        self.inner.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{CandleStore, ReplayExchange};
    use grid_core::Side;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn paper_over_replay() -> PaperExchange {
        let base = 1_700_000_000_000i64;
        let hour = 3_600_000i64;
        let candles = (0..10)
            .filter_map(|i| {
                let p = Decimal::from(100 + i);
                Candle::from_row(&(base + i * hour, p, p + dec!(1), p - dec!(1), p))
            })
            .collect();
        let store = Arc::new(CandleStore::new(candles, Timeframe::H1));

        let mut config = SimConfig::default();
        config.initial_balances.insert("USDT".to_string(), dec!(1000));
        let inner = Arc::new(ReplayExchange::new(config.clone(), store));

        PaperExchange::new(inner, config)
    }

    fn symbol() -> Symbol {
        Symbol::new("BNB", "USDT")
    }

    #[tokio::test]
    async fn test_market_data_is_delegated() {
        let paper = paper_over_replay();
        let ticker = paper.fetch_ticker(&symbol()).await.unwrap();
        assert_eq!(ticker.last, dec!(100));

        let candles = paper
            .fetch_candles(&symbol(), Timeframe::H1, Some(5))
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
    }

    #[tokio::test]
    async fn test_orders_fill_against_virtual_ledger() {
        let paper = paper_over_replay();

        let result = paper
            .place_order(&OrderRequest::market(symbol(), Side::Buy, dec!(2)))
            .await
            .unwrap();
        assert_eq!(result.fill_price, dec!(100));

        let balance = paper.fetch_balance().await.unwrap();
        assert_eq!(balance.base_free(), dec!(2));
        assert_eq!(balance.quote_free(), dec!(1000) - dec!(200) - dec!(0.2));

        let trades = paper.fetch_trades(&symbol(), 10).await.unwrap();
        assert_eq!(trades.len(), 1);
    }

    #[tokio::test]
    async fn test_paper_ledger_is_independent() {
        // 내부 거래소 원장은 모의투자 체결의 영향을 받지 않음
        let paper = paper_over_replay();
        paper
            .place_order(&OrderRequest::market(symbol(), Side::Buy, dec!(1)))
            .await
            .unwrap();

        let inner_trades = paper.inner.fetch_trades(&symbol(), 10).await.unwrap();
        assert!(inner_trades.is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_balance_rejected() {
        let paper = paper_over_replay();

        let err = paper
            .place_order(&OrderRequest::market(symbol(), Side::Buy, dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientBalance { .. }));
    }
}
