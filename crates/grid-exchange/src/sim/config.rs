//! 시뮬레이션 설정.

use grid_core::{SimulationConfig, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ExchangeError;

/// 가상 계정 및 체결 모델 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 자산별 초기 잔고
    pub initial_balances: HashMap<String, Decimal>,
    /// 거래 수수료율 (예: 0.1%의 경우 0.001)
    pub fee_rate: Decimal,
    /// 슬리피지율 (0이면 비활성화)
    pub slippage_rate: Decimal,
}

impl Default for SimConfig {
    fn default() -> Self {
        let mut initial_balances = HashMap::new();
        initial_balances.insert("USDT".to_string(), dec!(10000));

        Self {
            symbol: Symbol::new("BNB", "USDT"),
            initial_balances,
            fee_rate: dec!(0.001), // 0.1%
            slippage_rate: Decimal::ZERO,
        }
    }
}

impl SimConfig {
    /// 거래 심볼을 설정합니다.
    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = symbol;
        self
    }

    /// 자산의 초기 잔고를 추가합니다.
    pub fn with_initial_balance(mut self, asset: &str, amount: Decimal) -> Self {
        self.initial_balances.insert(asset.to_string(), amount);
        self
    }

    /// 수수료율을 설정합니다.
    pub fn with_fee_rate(mut self, rate: Decimal) -> Self {
        self.fee_rate = rate;
        self
    }

    /// 슬리피지율을 설정합니다.
    pub fn with_slippage_rate(mut self, rate: Decimal) -> Self {
        self.slippage_rate = rate;
        self
    }
}

impl TryFrom<&SimulationConfig> for SimConfig {
    type Error = ExchangeError;

    fn try_from(config: &SimulationConfig) -> Result<Self, Self::Error> {
        let symbol = Symbol::parse(&config.symbol)
            .ok_or_else(|| ExchangeError::Parse(format!("Invalid symbol: {}", config.symbol)))?;

        Ok(Self {
            symbol,
            initial_balances: config.initial_balances.clone(),
            fee_rate: config.fee_rate,
            slippage_rate: config.slippage_rate,
        })
    }
}
