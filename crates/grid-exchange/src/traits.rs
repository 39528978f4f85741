//! 거래소 trait 정의.
//!
//! 전략 드라이버가 소비하는 통합 파사드입니다. 실거래소, 모의투자,
//! 리플레이 백엔드가 모두 동일한 작업 집합을 구현하며, 백엔드는 생성
//! 시점에 선택됩니다.

use async_trait::async_trait;
use grid_core::{Candle, OrderBook, OrderRequest, OrderResult, Symbol, Ticker, Timeframe,
    TradeRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 계정 잔고 스냅샷.
///
/// `free`/`used`/`total`은 자산 심볼을 키로 하는 맵입니다. 대기 주문이
/// 없으므로 `used`는 항상 0이며 `total == free`입니다. 기준/호가
/// 자산 별칭은 저장된 복사본이 아니라 정식 맵에서 계산되는 뷰입니다.
#[derive(Debug, Clone)]
pub struct BalanceSnapshot {
    /// 설정된 거래 페어
    pub symbol: Symbol,
    /// 사용 가능한 잔고
    pub free: HashMap<String, Decimal>,
    /// 주문에 묶인 잔고 (항상 0)
    pub used: HashMap<String, Decimal>,
    /// 총 잔고
    pub total: HashMap<String, Decimal>,
}

impl BalanceSnapshot {
    /// 자산의 사용 가능한 잔고를 반환합니다.
    pub fn free_of(&self, asset: &str) -> Decimal {
        self.free.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// 자산의 총 잔고를 반환합니다.
    pub fn total_of(&self, asset: &str) -> Decimal {
        self.total.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// 기준 자산의 사용 가능한 잔고 (계산된 뷰).
    pub fn base_free(&self) -> Decimal {
        self.free_of(&self.symbol.base)
    }

    /// 호가 자산의 사용 가능한 잔고 (계산된 뷰).
    pub fn quote_free(&self) -> Decimal {
        self.free_of(&self.symbol.quote)
    }

    /// 기준 자산의 총 잔고 (계산된 뷰).
    pub fn base_total(&self) -> Decimal {
        self.total_of(&self.symbol.base)
    }

    /// 호가 자산의 총 잔고 (계산된 뷰).
    pub fn quote_total(&self) -> Decimal {
        self.total_of(&self.symbol.quote)
    }
}

/// 통합 거래소 인터페이스를 위한 Exchange trait.
///
/// 모든 작업은 잠재적 중단 지점으로 모델링됩니다. 리플레이 백엔드는
/// 내부적으로 블로킹 작업을 수행하지 않지만, 네트워크 I/O를 수행하는
/// 백엔드와 계약을 통일하기 위해 async입니다. 호출 규약상 동시에
/// 하나의 주문만 진행 중일 수 있습니다.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// 백엔드 이름 반환.
    fn name(&self) -> &str;

    /// 과거 캔들스틱 조회.
    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Candle>>;

    /// 심볼의 현재 시세 조회.
    async fn fetch_ticker(&self, symbol: &Symbol) -> ExchangeResult<Ticker>;

    /// 주문 제출. 전량 즉시 체결되거나 거부됩니다.
    async fn place_order(&self, request: &OrderRequest) -> ExchangeResult<OrderResult>;

    /// 계정 잔고 조회.
    async fn fetch_balance(&self) -> ExchangeResult<BalanceSnapshot>;

    /// 최근 체결 기록 조회 (시간 순서, 최대 `limit`개).
    async fn fetch_trades(&self, symbol: &Symbol, limit: usize)
        -> ExchangeResult<Vec<TradeRecord>>;

    /// 심볼의 호가창 조회.
    async fn fetch_order_book(
        &self,
        symbol: &Symbol,
        limit: Option<u32>,
    ) -> ExchangeResult<OrderBook>;

    /// 연결 종료 및 리소스 해제.
    async fn close(&self) -> ExchangeResult<()>;
}
