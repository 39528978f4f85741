//! 거래소 에러 타입.
//!
//! 리플레이 소진은 에러가 아니라 정상적인 종료 신호이므로 여기에
//! 변형이 없습니다. [`crate::replay::ReplayStep`]을 참고하세요.

use rust_decimal::Decimal;
use thiserror::Error;

/// 거래소 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 과거 캔들 데이터 소스를 찾을 수 없음 (로드 시점, 치명적)
    #[error("Candle data not found: {0}")]
    DataNotFound(String),

    /// 파싱/역직렬화 에러 (로드 시점, 치명적)
    #[error("Parse error: {0}")]
    Parse(String),

    /// 잔고 부족 - 단일 주문에 대한 거부이며 원장은 변경되지 않음
    #[error("Insufficient {asset} balance: need {required}, have {available}")]
    InsufficientBalance {
        /// 부족한 자산
        asset: String,
        /// 필요 금액
        required: Decimal,
        /// 보유 금액
        available: Decimal,
    },

    /// 유효하지 않은 수량
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// 데이터가 로드되기 전의 커서 접근
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// 심볼을 찾을 수 없음
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// 내보내기 I/O 실패
    #[error("Export failed: {0}")]
    Export(#[source] std::io::Error),

    /// 지원되지 않는 작업
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl ExchangeError {
    /// 로드 시점의 치명적 에러인지 확인합니다. 재시도나 복구가 없습니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExchangeError::DataNotFound(_) | ExchangeError::Parse(_))
    }

    /// 단일 주문에 대한 비즈니스 규칙 거부인지 확인합니다.
    /// 드라이버는 수량을 줄이거나 해당 스텝을 건너뛸 수 있습니다.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ExchangeError::InsufficientBalance { .. } | ExchangeError::InvalidQuantity(_)
        )
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Parse(err.to_string())
    }
}
