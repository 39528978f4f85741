//! 기본 타입 정의.

pub mod decimal;
pub mod symbol;
pub mod timeframe;

pub use decimal::*;
pub use symbol::*;
pub use timeframe::*;
