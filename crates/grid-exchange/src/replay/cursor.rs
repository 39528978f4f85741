//! 재생 커서.
//!
//! 캔들 저장소 위를 한 칸씩 전진하는 시뮬레이션 시계입니다. 현재 인덱스의
//! 캔들이 "지금"이며, 소진은 오류가 아닌 [`ReplayStep::Exhausted`]로
//! 표현됩니다.

use std::sync::Arc;

use grid_core::Candle;

use crate::replay::candle_store::CandleStore;
use crate::traits::ExchangeResult;
use crate::ExchangeError;

/// 커서 전진 한 스텝의 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    /// 다음 캔들로 전진했습니다.
    Advanced(Candle),
    /// 데이터가 소진되었습니다. 커서는 마지막 캔들에 머무릅니다.
    Exhausted,
}

impl ReplayStep {
    /// 전진 여부를 반환합니다.
    pub fn is_advanced(&self) -> bool {
        matches!(self, ReplayStep::Advanced(_))
    }
}

/// 캔들 저장소 위의 전진 전용 커서.
#[derive(Debug, Clone)]
pub struct ReplayCursor {
    store: Arc<CandleStore>,
    index: usize,
}

impl ReplayCursor {
    /// 저장소의 첫 캔들을 가리키는 커서를 생성합니다.
    pub fn new(store: Arc<CandleStore>) -> Self {
        Self { store, index: 0 }
    }

    /// 현재 인덱스를 반환합니다.
    pub fn index(&self) -> usize {
        self.index
    }

    /// 현재 캔들을 반환합니다. 저장소가 비어 있으면 `OutOfRange` 오류입니다.
    pub fn current(&self) -> ExchangeResult<&Candle> {
        self.store.get(self.index).ok_or_else(|| {
            ExchangeError::OutOfRange(format!(
                "No candle at index {} (store has {})",
                self.index,
                self.store.len()
            ))
        })
    }

    /// 커서를 한 캔들 전진시킵니다.
    ///
    /// 마지막 캔들에서 호출하면 인덱스를 바꾸지 않고 `Exhausted`를
    /// 반환하며, 이후 재호출해도 동일합니다.
    pub fn advance(&mut self) -> ReplayStep {
        if self.index + 1 >= self.store.len() {
            return ReplayStep::Exhausted;
        }
        self.index += 1;
        // current()는 index < len일 때 항상 성공
        match self.store.get(self.index) {
            Some(candle) => ReplayStep::Advanced(candle.clone()),
            None => ReplayStep::Exhausted,
        }
    }

    /// 현재 시점에서 끝나는 최대 `limit`개의 과거 캔들을 반환합니다.
    pub fn lookback(&self, limit: usize) -> &[Candle] {
        self.store.window(self.index, limit)
    }
}
