//! 거래 저널 및 자산 곡선 타입.
//!
//! 이 모듈은 거래 기록 관련 타입을 정의합니다:
//! - `TradeRecord` - 개별 체결 기록 (추가 전용 저널 항목)
//! - `EquityPoint` - 자산 곡선의 한 점

use crate::domain::Side;
use crate::types::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 체결된 주문을 나타내는 거래 기록.
///
/// 저널은 추가 전용입니다: 한 번 생성된 기록은 변경되지 않으며,
/// 저널 순서 = 체결 순서 = 리플레이 순서입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// 체결 시점의 틱 타임스탬프
    pub timestamp: DateTime<Utc>,
    /// 거래 방향
    pub side: Side,
    /// 체결 가격
    pub price: Price,
    /// 체결 수량 (기준 자산 단위)
    pub amount: Quantity,
    /// 거래 대금 (수량 × 가격, 수수료 제외)
    pub cost: Decimal,
    /// 수수료 (호가 자산 단위)
    pub fee: Decimal,
    /// 주문 ID (단조 증가 카운터의 문자열 형식)
    pub order_id: String,
    /// 실현 손익 (매도 시 평균 매입가 기준, 매수는 0)
    pub profit: Decimal,
}

impl TradeRecord {
    /// 거래의 명목 가치를 반환합니다.
    pub fn notional_value(&self) -> Decimal {
        self.price * self.amount
    }
}

/// 자산 곡선의 한 점.
///
/// 기본 상태로 저장되지 않고 거래 저널에서 항상 재계산되는 파생
/// 데이터입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 거래 타임스탬프
    pub timestamp: DateTime<Utc>,
    /// 총 자산 (호가 자산 + 기준 자산 × 체결 가격)
    pub equity: Decimal,
}
