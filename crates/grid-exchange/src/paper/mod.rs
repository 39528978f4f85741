//! 모의투자 백엔드.

pub mod exchange;

pub use exchange::PaperExchange;
