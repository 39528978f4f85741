//! 거래소 추상화 크레이트.
//!
//! 통합 [`Exchange`] 파사드와 그 시뮬레이션 백엔드들을 제공합니다:
//!
//! - [`ReplayExchange`] - 과거 캔들 데이터 재생 (백테스트)
//! - [`PaperExchange`] - 실시간 시세 기반 모의투자
//!
//! 두 백엔드 모두 수수료/슬리피지 모델이 적용된 가상 원장([`sim`])을
//! 공유합니다.

pub mod error;
pub mod paper;
pub mod replay;
pub mod sim;
pub mod traits;

pub use error::ExchangeError;
pub use paper::PaperExchange;
pub use replay::{
    generate_sample_candles, CandleStore, ExportOutcome, ReplayCursor, ReplayExchange, ReplayStep,
};
pub use sim::{Fill, Ledger, MatchingEngine, SimConfig};
pub use traits::{BalanceSnapshot, Exchange, ExchangeResult};
