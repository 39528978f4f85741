//! 주문 타입 정의.
//!
//! 이 모듈은 주문 관련 타입을 정의합니다:
//! - `Side` - 주문 방향 (매수/매도)
//! - `OrderType` - 주문 유형 (시장가, 지정가)
//! - `OrderRequest` - 주문 요청
//! - `OrderResult` - 체결 결과
//!
//! 이 엔진의 모든 주문은 즉시 전량 체결되거나 즉시 거부됩니다.
//! 대기 주문이나 부분 체결은 존재하지 않습니다.

use crate::types::{Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl Side {
    /// 반대 방향을 반환합니다.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(format!("Invalid side: {}", other)),
        }
    }
}

/// 주문 유형.
///
/// 시장가 주문은 가격을 생략한 지정가 주문과 동일하게 처리됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// 시장가 주문 - 현재 틱 가격으로 체결
    Market,
    /// 지정가 주문 - 지정 가격으로 체결
    Limit,
}

/// 주문 요청.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 주문 방향
    pub side: Side,
    /// 주문 유형
    pub order_type: OrderType,
    /// 주문 수량 (기준 자산 단위)
    pub amount: Quantity,
    /// 지정가 (시장가 주문은 None)
    pub price: Option<Price>,
}

impl OrderRequest {
    /// 지정가 주문 요청을 생성합니다.
    pub fn limit(symbol: Symbol, side: Side, amount: Quantity, price: Price) -> Self {
        Self {
            symbol,
            side,
            order_type: OrderType::Limit,
            amount,
            price: Some(price),
        }
    }

    /// 시장가 주문 요청을 생성합니다.
    pub fn market(symbol: Symbol, side: Side, amount: Quantity) -> Self {
        Self {
            symbol,
            side,
            order_type: OrderType::Market,
            amount,
            price: None,
        }
    }
}

/// 주문 상태.
///
/// 대기 주문이 없으므로 체결 완료 상태만 존재합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderResultStatus {
    /// 전량 체결됨
    Closed,
}

/// 체결 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    /// 주문 ID
    pub order_id: String,
    /// 주문 상태 (항상 Closed)
    pub status: OrderResultStatus,
    /// 체결 가격
    pub fill_price: Price,
    /// 체결 수량
    pub filled_amount: Quantity,
    /// 주문 방향
    pub side: Side,
}
