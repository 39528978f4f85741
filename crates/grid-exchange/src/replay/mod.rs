//! 과거 데이터 재생 백엔드.
//!
//! 캔들 저장소, 재생 커서, 자산 곡선, 결과 내보내기와 이를 묶는
//! [`ReplayExchange`]로 구성됩니다.

pub mod candle_store;
pub mod cursor;
pub mod curve;
pub mod exchange;
pub mod export;

pub use candle_store::{generate_sample_candles, CandleStore};
pub use cursor::{ReplayCursor, ReplayStep};
pub use curve::build_equity_curve;
pub use exchange::ReplayExchange;
pub use export::{export_equity_csv, export_trades_csv, export_trades_json, ExportOutcome};
