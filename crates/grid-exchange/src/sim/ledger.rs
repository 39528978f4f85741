//! 가상 원장.
//!
//! 자산별 잔고와 추가 전용 거래 저널을 단독으로 소유합니다. 잔고 변동과
//! 저널 추가는 하나의 호출 안에서 함께 커밋됩니다 - 부분 적용은
//! 관찰할 수 없습니다.

use chrono::{DateTime, Utc};
use grid_core::{Price, Quantity, Side, Symbol, TradeRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

use crate::traits::BalanceSnapshot;

/// 원장에 적용할 체결 내역.
///
/// 매칭 엔진이 자금 검증을 마친 뒤 생성합니다.
#[derive(Debug, Clone)]
pub struct Fill {
    /// 체결 시점의 틱 타임스탬프
    pub timestamp: DateTime<Utc>,
    /// 거래 방향
    pub side: Side,
    /// 체결 가격 (슬리피지 반영)
    pub price: Price,
    /// 체결 수량
    pub amount: Quantity,
    /// 수수료 (호가 자산 단위)
    pub fee: Decimal,
    /// 주문 ID
    pub order_id: String,
}

/// 잔고와 거래 저널의 단일 소유자.
#[derive(Debug)]
pub struct Ledger {
    /// 거래 페어 - 기준/호가 별칭은 이 심볼로 계산됩니다
    symbol: Symbol,
    /// 자산별 잔고 (정식 상태)
    balances: HashMap<String, Decimal>,
    /// 추가 전용 거래 저널
    trades: Vec<TradeRecord>,
    /// 주문 ID 카운터
    next_order_id: u64,
    /// 평균 매입가 계산용 보유 수량
    position_amount: Decimal,
    /// 평균 매입가 계산용 누적 매입 대금
    position_cost: Decimal,
}

impl Ledger {
    /// 초기 잔고로 원장을 생성합니다.
    pub fn new(symbol: Symbol, initial_balances: &HashMap<String, Decimal>) -> Self {
        Self {
            symbol,
            balances: initial_balances.clone(),
            trades: Vec::new(),
            next_order_id: 1,
            position_amount: Decimal::ZERO,
            position_cost: Decimal::ZERO,
        }
    }

    /// 설정된 거래 페어를 반환합니다.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// 자산의 현재 잔고를 반환합니다. 알 수 없는 자산은 0입니다.
    pub fn balance(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// 다음 주문 ID를 발급합니다. 단조 증가 카운터의 문자열 형식입니다.
    pub fn next_order_id(&mut self) -> String {
        let id = self.next_order_id;
        self.next_order_id += 1;
        id.to_string()
    }

    /// 체결을 원장에 적용합니다.
    ///
    /// 잔고 변동과 저널 추가가 한 번의 호출로 함께 커밋됩니다. 호출자
    /// (매칭 엔진)가 자금 충분성을 먼저 검증해야 합니다.
    pub fn apply_fill(&mut self, fill: Fill) -> &TradeRecord {
        let cost = fill.amount * fill.price;

        let profit = match fill.side {
            Side::Buy => {
                *self
                    .balances
                    .entry(self.symbol.quote.clone())
                    .or_insert(Decimal::ZERO) -= cost + fill.fee;
                *self
                    .balances
                    .entry(self.symbol.base.clone())
                    .or_insert(Decimal::ZERO) += fill.amount;

                self.position_amount += fill.amount;
                self.position_cost += cost;
                Decimal::ZERO
            }
            Side::Sell => {
                *self
                    .balances
                    .entry(self.symbol.base.clone())
                    .or_insert(Decimal::ZERO) -= fill.amount;
                *self
                    .balances
                    .entry(self.symbol.quote.clone())
                    .or_insert(Decimal::ZERO) += cost - fill.fee;

                // 평균 매입가 기준 실현 손익. 기록된 매수 없이 매도하면
                // 진입가를 체결가로 간주하여 수수료만 손실로 잡습니다.
                let avg_entry = if self.position_amount > Decimal::ZERO {
                    self.position_cost / self.position_amount
                } else {
                    fill.price
                };
                let closed = fill.amount.min(self.position_amount);
                self.position_amount -= closed;
                self.position_cost -= avg_entry * closed;

                (fill.price - avg_entry) * fill.amount - fill.fee
            }
        };

        let record = TradeRecord {
            timestamp: fill.timestamp,
            side: fill.side,
            price: fill.price,
            amount: fill.amount,
            cost,
            fee: fill.fee,
            order_id: fill.order_id,
            profit,
        };

        debug!(
            side = %record.side,
            price = %record.price,
            amount = %record.amount,
            fee = %record.fee,
            order_id = %record.order_id,
            "Trade applied to ledger"
        );

        self.trades.push(record);
        self.trades.last().expect("journal is non-empty after push")
    }

    /// 잔고 스냅샷을 반환합니다.
    ///
    /// 대기 주문이 없으므로 `used`는 전부 0이고 `total == free`입니다.
    pub fn snapshot(&self) -> BalanceSnapshot {
        let used = self
            .balances
            .keys()
            .map(|asset| (asset.clone(), Decimal::ZERO))
            .collect();

        BalanceSnapshot {
            symbol: self.symbol.clone(),
            free: self.balances.clone(),
            used,
            total: self.balances.clone(),
        }
    }

    /// 전체 거래 저널을 반환합니다.
    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    /// 최근 `limit`개의 거래를 시간 순서로 반환합니다.
    pub fn recent_trades(&self, limit: usize) -> Vec<TradeRecord> {
        let start = self.trades.len().saturating_sub(limit);
        self.trades[start..].to_vec()
    }
}
