//! 주문 매칭 엔진.
//!
//! 모든 주문은 현재 틱에 대해 즉시 전량 체결되거나 즉시 거부됩니다.
//! 대기 주문, 부분 체결, 호가창 깊이는 모델링하지 않습니다.

use chrono::{DateTime, Utc};
use grid_core::{OrderRequest, OrderResult, OrderResultStatus, Price, Side};
use rust_decimal::Decimal;
use tracing::debug;

use crate::sim::ledger::{Fill, Ledger};
use crate::traits::ExchangeResult;
use crate::ExchangeError;

/// 수수료와 슬리피지 모델이 적용된 즉시 체결 매칭 엔진.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    /// 수수료율 (예: 0.1%의 경우 0.001)
    fee_rate: Decimal,
    /// 슬리피지율 (0이면 비활성화)
    slippage_rate: Decimal,
}

impl MatchingEngine {
    /// 새로운 매칭 엔진을 생성합니다.
    pub fn new(fee_rate: Decimal, slippage_rate: Decimal) -> Self {
        Self {
            fee_rate,
            slippage_rate,
        }
    }

    /// 체결 가격을 계산합니다.
    ///
    /// 지정가가 있으면 지정가, 없으면 틱 가격을 사용하고, 슬리피지율이
    /// 설정되어 있으면 항상 트레이더에게 불리한 방향으로 조정합니다.
    fn exec_price(&self, request: &OrderRequest, tick_price: Price) -> Price {
        let mut price = request.price.unwrap_or(tick_price);
        if self.slippage_rate > Decimal::ZERO {
            price *= match request.side {
                Side::Buy => Decimal::ONE + self.slippage_rate,
                Side::Sell => Decimal::ONE - self.slippage_rate,
            };
        }
        price
    }

    /// 주문을 실행하고 원장에 체결을 적용합니다.
    ///
    /// 자금이 부족하면 `InsufficientBalance`로 거부하며, 거부된 주문은
    /// 원장을 변경하지 않습니다.
    pub fn execute(
        &self,
        ledger: &mut Ledger,
        request: &OrderRequest,
        tick_price: Price,
        timestamp: DateTime<Utc>,
    ) -> ExchangeResult<OrderResult> {
        if request.amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidQuantity(format!(
                "Order amount must be positive, got {}",
                request.amount
            )));
        }

        let exec_price = self.exec_price(request, tick_price);
        let fee = request.amount * exec_price * self.fee_rate;
        let symbol = ledger.symbol().clone();

        // 자금 검증 - 엄격한 미만 비교, 거부 시 원장은 그대로
        match request.side {
            Side::Buy => {
                let required = request.amount * exec_price + fee;
                let available = ledger.balance(&symbol.quote);
                if available < required {
                    return Err(ExchangeError::InsufficientBalance {
                        asset: symbol.quote,
                        required,
                        available,
                    });
                }
            }
            Side::Sell => {
                let available = ledger.balance(&symbol.base);
                if available < request.amount {
                    return Err(ExchangeError::InsufficientBalance {
                        asset: symbol.base,
                        required: request.amount,
                        available,
                    });
                }
            }
        }

        let order_id = ledger.next_order_id();
        ledger.apply_fill(Fill {
            timestamp,
            side: request.side,
            price: exec_price,
            amount: request.amount,
            fee,
            order_id: order_id.clone(),
        });

        debug!(
            order_id = %order_id,
            side = %request.side,
            exec_price = %exec_price,
            amount = %request.amount,
            "Order filled"
        );

        Ok(OrderResult {
            order_id,
            status: OrderResultStatus::Closed,
            fill_price: exec_price,
            filled_amount: request.amount,
            side: request.side,
        })
    }
}
