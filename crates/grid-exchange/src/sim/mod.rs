//! 가상 계정 및 주문 체결 시뮬레이션.
//!
//! 리플레이 백엔드와 모의투자 백엔드가 공유하는 기계 장치입니다:
//! - [`SimConfig`] - 가상 계정 및 체결 모델 설정
//! - [`Ledger`] - 자산별 잔고와 추가 전용 거래 저널
//! - [`MatchingEngine`] - 수수료/슬리피지 모델이 적용된 즉시 체결

pub mod config;
pub mod ledger;
pub mod matching;

pub use config::SimConfig;
pub use ledger::{Fill, Ledger};
pub use matching::MatchingEngine;
