//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! TOML 파일에서 로드하며 `GRIDBOT__` 접두사 환경 변수로 오버라이드할 수
//! 있습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 시뮬레이션 설정
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 시뮬레이션 설정.
///
/// 리플레이 백엔드와 모의투자 백엔드가 공유하는 가상 계정 및 체결 모델
/// 파라미터입니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// 거래 심볼 (예: "BNB/USDT")
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// 거래 수수료율 (예: 0.1%의 경우 0.001)
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
    /// 슬리피지율 (0이면 비활성화)
    #[serde(default)]
    pub slippage_rate: Decimal,
    /// 자산별 초기 잔고
    #[serde(default = "default_initial_balances")]
    pub initial_balances: HashMap<String, Decimal>,
    /// 과거 캔들 데이터 파일 경로 (리플레이 백엔드용)
    #[serde(default = "default_candle_file")]
    pub candle_file: String,
}

fn default_symbol() -> String {
    "BNB/USDT".to_string()
}

fn default_fee_rate() -> Decimal {
    dec!(0.001)
}

fn default_initial_balances() -> HashMap<String, Decimal> {
    let mut balances = HashMap::new();
    balances.insert("USDT".to_string(), dec!(10000));
    balances
}

fn default_candle_file() -> String {
    "data/kline_1h.json".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            fee_rate: default_fee_rate(),
            slippage_rate: Decimal::ZERO,
            initial_balances: default_initial_balances(),
            candle_file: default_candle_file(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("GRIDBOT")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
