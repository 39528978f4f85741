//! 도메인 모델 정의.

pub mod market_data;
pub mod order;
pub mod trade;

pub use market_data::*;
pub use order::*;
pub use trade::*;
