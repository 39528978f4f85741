//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `Candle` - OHLC 캔들스틱 데이터
//! - `CandleRow` - 과거 데이터 파일의 5-튜플 레코드 형식
//! - `Ticker` - 시세 데이터
//! - `OrderBook` - 호가창 데이터

use crate::types::{Price, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 과거 캔들 파일의 레코드 형식: `[timestamp_ms, open, high, low, close]`.
pub type CandleRow = (i64, Decimal, Decimal, Decimal, Decimal);

/// OHLC 캔들스틱 데이터.
///
/// 로드된 후에는 불변이며 타임스탬프 오름차순으로 정렬되어 있다고 가정합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간 (UTC)
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// 5-튜플 레코드에서 캔들을 생성합니다.
    ///
    /// 타임스탬프가 유효한 밀리초 범위를 벗어나면 `None`을 반환합니다.
    pub fn from_row(row: &CandleRow) -> Option<Self> {
        let timestamp = DateTime::from_timestamp_millis(row.0)?;
        Some(Self {
            timestamp,
            open: row.1,
            high: row.2,
            low: row.3,
            close: row.4,
        })
    }

    /// 5-튜플 레코드 형식으로 변환합니다.
    pub fn to_row(&self) -> CandleRow {
        (
            self.timestamp.timestamp_millis(),
            self.open,
            self.high,
            self.low,
            self.close,
        )
    }

    /// 밀리초 타임스탬프를 반환합니다.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// 시세 데이터.
///
/// 리플레이 백엔드에서는 현재 캔들에서 합성되며, bid/ask는 종가
/// 주변의 모의 호가입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticker {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 최근 체결가
    pub last: Price,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 최우선 매수 호가
    pub bid: Price,
    /// 최우선 매도 호가
    pub ask: Price,
    /// 타임스탬프
    pub timestamp: DateTime<Utc>,
}

impl Ticker {
    /// 매수/매도 스프레드를 반환합니다.
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }

    /// 중간 가격을 반환합니다.
    pub fn mid_price(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::from(2)
    }
}

/// 호가창 가격 레벨.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// 가격
    pub price: Price,
    /// 수량
    pub quantity: Decimal,
}

/// 호가창 데이터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 매수 호가 - 가격 내림차순 정렬
    pub bids: Vec<OrderBookLevel>,
    /// 매도 호가 - 가격 오름차순 정렬
    pub asks: Vec<OrderBookLevel>,
    /// 타임스탬프
    pub timestamp: DateTime<Utc>,
}

impl OrderBook {
    /// 최우선 매수 호가를 반환합니다.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    /// 최우선 매도 호가를 반환합니다.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|l| l.price)
    }
}
