//! # Grid Core
//!
//! 그리드 트레이딩 봇의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 캔들/시세/호가창 시장 데이터 구조체
//! - 주문 요청 및 체결 결과 타입
//! - 거래 저널 및 자산 곡선 타입
//! - 심볼 및 타임프레임 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use logging::*;
pub use types::*;
