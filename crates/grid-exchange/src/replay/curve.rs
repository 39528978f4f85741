//! 자산 곡선 빌더.
//!
//! 체결 기록을 시작 잔고부터 순서대로 재생하여 각 체결 직후의 총 평가
//! 자산(호가 잔고 + 기초 자산 × 해당 체결 가격)을 계산합니다.

use std::collections::HashMap;

use grid_core::{EquityPoint, Side, Symbol, TradeRecord};
use rust_decimal::Decimal;

/// 체결 기록에서 자산 곡선을 계산합니다.
///
/// 체결이 없으면 빈 곡선을 반환합니다. 각 포인트의 평가 가격은 해당
/// 체결의 체결 가격이며, 별도의 시가 평가는 수행하지 않습니다.
pub fn build_equity_curve(
    trades: &[TradeRecord],
    initial_balances: &HashMap<String, Decimal>,
    symbol: &Symbol,
) -> Vec<EquityPoint> {
    let mut quote = initial_balances
        .get(&symbol.quote)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let mut base = initial_balances
        .get(&symbol.base)
        .copied()
        .unwrap_or(Decimal::ZERO);

    let mut curve = Vec::with_capacity(trades.len());
    for trade in trades {
        match trade.side {
            Side::Buy => {
                quote -= trade.cost + trade.fee;
                base += trade.amount;
            }
            Side::Sell => {
                base -= trade.amount;
                quote += trade.cost - trade.fee;
            }
        }
        curve.push(EquityPoint {
            timestamp: trade.timestamp,
            equity: quote + base * trade.price,
        });
    }
    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    fn ts(offset_hours: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000 + offset_hours * 3_600_000).unwrap()
    }

    fn trade(
        offset_hours: i64,
        side: Side,
        price: Decimal,
        amount: Decimal,
        fee: Decimal,
    ) -> TradeRecord {
        TradeRecord {
            timestamp: ts(offset_hours),
            side,
            price,
            amount,
            cost: price * amount,
            fee,
            order_id: "1".to_string(),
            profit: Decimal::ZERO,
        }
    }

    fn usdt(amount: Decimal) -> HashMap<String, Decimal> {
        let mut balances = HashMap::new();
        balances.insert("USDT".to_string(), amount);
        balances
    }

    #[test]
    fn test_empty_trades_empty_curve() {
        let curve = build_equity_curve(&[], &usdt(dec!(1000)), &Symbol::new("BNB", "USDT"));
        assert!(curve.is_empty());
    }

    #[test]
    fn test_zero_fee_equity_is_flat() {
        // 수수료가 없으면 체결 가격으로 평가한 자산은 변하지 않음
        let trades = vec![
            trade(0, Side::Buy, dec!(100), dec!(2), Decimal::ZERO),
            trade(1, Side::Sell, dec!(100), dec!(2), Decimal::ZERO),
        ];
        let curve = build_equity_curve(&trades, &usdt(dec!(1000)), &Symbol::new("BNB", "USDT"));

        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].equity, dec!(1000));
        assert_eq!(curve[1].equity, dec!(1000));
    }

    #[test]
    fn test_fees_drag_equity_down() {
        let trades = vec![
            trade(0, Side::Buy, dec!(100), dec!(1), dec!(0.1)),
            trade(1, Side::Sell, dec!(100), dec!(1), dec!(0.1)),
        ];
        let curve = build_equity_curve(&trades, &usdt(dec!(1000)), &Symbol::new("BNB", "USDT"));

        assert_eq!(curve[0].equity, dec!(999.9));
        assert_eq!(curve[1].equity, dec!(999.8));
    }

    #[test]
    fn test_price_move_marks_position() {
        // 100에 1개 매수 후 110에 매도: 곡선은 매도 시점에 이익을 반영
        let trades = vec![
            trade(0, Side::Buy, dec!(100), dec!(1), Decimal::ZERO),
            trade(1, Side::Sell, dec!(110), dec!(1), Decimal::ZERO),
        ];
        let curve = build_equity_curve(&trades, &usdt(dec!(1000)), &Symbol::new("BNB", "USDT"));

        assert_eq!(curve[0].equity, dec!(1000));
        assert_eq!(curve[1].equity, dec!(1010));
    }

    #[test]
    fn test_initial_base_balance_counted() {
        let mut balances = usdt(dec!(500));
        balances.insert("BNB".to_string(), dec!(2));
        let trades = vec![trade(0, Side::Sell, dec!(100), dec!(1), Decimal::ZERO)];

        let curve = build_equity_curve(&trades, &balances, &Symbol::new("BNB", "USDT"));
        // 500 + 100(매도 대금) + 1 BNB × 100 = 700
        assert_eq!(curve[0].equity, dec!(700));
    }
}
