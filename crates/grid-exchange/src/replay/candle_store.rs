//! 백테스트용 캔들 저장소.
//!
//! JSON 파일에서 OHLCV 캔들을 로드하여 타임스탬프 오름차순으로 보관하고,
//! 재생 커서에 윈도우 조회를 제공합니다.

use std::path::Path;

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use grid_core::{Candle, CandleRow, Timeframe};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::info;

use crate::traits::ExchangeResult;
use crate::ExchangeError;

/// 불변 캔들 시계열 저장소.
///
/// 로드 이후에는 변경되지 않으므로 `Arc`로 감싸 커서와 거래소 간에
/// 자유롭게 공유할 수 있습니다.
#[derive(Debug, Clone)]
pub struct CandleStore {
    candles: Vec<Candle>,
    timeframe: Timeframe,
}

impl CandleStore {
    /// 캔들 벡터로 저장소를 생성합니다. 타임스탬프 오름차순으로 정렬됩니다.
    pub fn new(mut candles: Vec<Candle>, timeframe: Timeframe) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        Self { candles, timeframe }
    }

    /// JSON 파일에서 캔들을 로드합니다.
    ///
    /// 파일 형식은 `[[timestamp_ms, open, high, low, close], ...]` 입니다.
    /// 파일이 없으면 `DataNotFound`, 형식이 잘못되면 `Parse` 오류를 반환합니다.
    pub fn load_json(path: impl AsRef<Path>, timeframe: Timeframe) -> ExchangeResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExchangeError::DataNotFound(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let rows: Vec<CandleRow> = serde_json::from_str(&raw)?;
        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            let candle = Candle::from_row(row).ok_or_else(|| {
                ExchangeError::Parse(format!("Invalid candle timestamp: {}", row.0))
            })?;
            candles.push(candle);
        }

        info!(
            path = %path.display(),
            count = candles.len(),
            timeframe = %timeframe,
            "Loaded candle data"
        );

        Ok(Self::new(candles, timeframe))
    }

    /// 저장소의 네이티브 타임프레임을 반환합니다.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// 캔들 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 저장소가 비어 있는지 여부를 반환합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 인덱스 위치의 캔들을 반환합니다.
    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// 전체 캔들 슬라이스를 반환합니다.
    pub fn all(&self) -> &[Candle] {
        &self.candles
    }

    /// `end_index`(포함)에서 끝나는 최대 `limit`개의 캔들 윈도우를 반환합니다.
    ///
    /// 과거 데이터가 `limit`보다 적으면 시작 부분을 잘라내며, `end_index`가
    /// 범위를 벗어나면 마지막 캔들로 클리핑합니다.
    pub fn window(&self, end_index: usize, limit: usize) -> &[Candle] {
        if self.candles.is_empty() || limit == 0 {
            return &[];
        }
        let end = end_index.min(self.candles.len() - 1);
        let start = (end + 1).saturating_sub(limit);
        &self.candles[start..=end]
    }

    /// 전체 저장소를 UTC 일 단위로 집계합니다.
    ///
    /// 각 날짜의 open은 첫 캔들의 시가, close는 마지막 캔들의 종가,
    /// high/low는 해당 일의 극값입니다. 결과 타임스탬프는 자정 UTC입니다.
    pub fn aggregate_daily(&self) -> Vec<Candle> {
        let mut days: BTreeMap<NaiveDate, Candle> = BTreeMap::new();
        for candle in &self.candles {
            let date = candle.timestamp.date_naive();
            days.entry(date)
                .and_modify(|day| {
                    day.high = day.high.max(candle.high);
                    day.low = day.low.min(candle.low);
                    day.close = candle.close;
                })
                .or_insert_with(|| Candle {
                    timestamp: Utc
                        .with_ymd_and_hms(date.year(), date.month(), date.day(), 0, 0, 0)
                        .unwrap(),
                    open: candle.open,
                    high: candle.high,
                    low: candle.low,
                    close: candle.close,
                });
        }
        days.into_values().collect()
    }
}

/// 테스트와 데모용 랜덤 워크 샘플 캔들을 생성합니다.
pub fn generate_sample_candles(
    count: usize,
    start_price: Decimal,
    start_timestamp_ms: i64,
    timeframe: Timeframe,
) -> Vec<Candle> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let mut candles = Vec::with_capacity(count);
    let mut price = start_price;
    let step_ms = timeframe.as_secs() as i64 * 1000;

    for i in 0..count {
        // ±1% 범위의 랜덤 워크
        let drift: f64 = rng.gen_range(-0.01..0.01);
        let open = price;
        let close = open * (Decimal::ONE + Decimal::try_from(drift).unwrap_or_default());
        let high = open.max(close) * Decimal::try_from(1.002).unwrap_or(Decimal::ONE);
        let low = open.min(close) * Decimal::try_from(0.998).unwrap_or(Decimal::ONE);

        let timestamp_ms = start_timestamp_ms + (i as i64) * step_ms;
        if let Some(candle) = Candle::from_row(&(timestamp_ms, open, high, low, close)) {
            candles.push(candle);
        }
        price = close;
    }

    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candle(ts_ms: i64, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Candle {
        Candle::from_row(&(ts_ms, open, high, low, close)).unwrap()
    }

    fn hourly_store() -> CandleStore {
        let hour = 3_600_000i64;
        let base = 1_700_000_000_000i64;
        let candles = (0..10)
            .map(|i| {
                let p = Decimal::from(100 + i);
                candle(base + i * hour, p, p + dec!(1), p - dec!(1), p)
            })
            .collect();
        CandleStore::new(candles, Timeframe::H1)
    }

    #[test]
    fn test_window_clips_at_start() {
        let store = hourly_store();
        let window = store.window(2, 100);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].close, dec!(100));
        assert_eq!(window[2].close, dec!(102));
    }

    #[test]
    fn test_window_clips_end_index() {
        let store = hourly_store();
        let window = store.window(999, 2);
        assert_eq!(window.len(), 2);
        assert_eq!(window[1].close, dec!(109));
    }

    #[test]
    fn test_window_empty_store() {
        let store = CandleStore::new(vec![], Timeframe::H1);
        assert!(store.window(0, 10).is_empty());
    }

    #[test]
    fn test_candles_sorted_on_construction() {
        let hour = 3_600_000i64;
        let base = 1_700_000_000_000i64;
        let candles = vec![
            candle(base + hour, dec!(101), dec!(102), dec!(100), dec!(101)),
            candle(base, dec!(100), dec!(101), dec!(99), dec!(100)),
        ];
        let store = CandleStore::new(candles, Timeframe::H1);
        assert_eq!(store.get(0).unwrap().close, dec!(100));
        assert_eq!(store.get(1).unwrap().close, dec!(101));
    }

    #[test]
    fn test_aggregate_daily() {
        // 2023-11-15 00:00 UTC 근처 자정 정렬된 타임스탬프 사용
        let day_start = Utc
            .with_ymd_and_hms(2023, 11, 15, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        let hour = 3_600_000i64;
        let candles = vec![
            candle(day_start, dec!(100), dec!(105), dec!(95), dec!(100)),
            candle(day_start + hour, dec!(100), dec!(110), dec!(99), dec!(108)),
        ];
        let store = CandleStore::new(candles, Timeframe::H1);

        let daily = store.aggregate_daily();
        assert_eq!(daily.len(), 1);
        let day = &daily[0];
        assert_eq!(day.open, dec!(100));
        assert_eq!(day.high, dec!(110));
        assert_eq!(day.low, dec!(95));
        assert_eq!(day.close, dec!(108));
        assert_eq!(day.timestamp_millis(), day_start);
    }

    #[test]
    fn test_aggregate_daily_spans_days() {
        let day1 = Utc
            .with_ymd_and_hms(2023, 11, 15, 23, 0, 0)
            .unwrap()
            .timestamp_millis();
        let day2 = Utc
            .with_ymd_and_hms(2023, 11, 16, 0, 0, 0)
            .unwrap()
            .timestamp_millis();
        let candles = vec![
            candle(day1, dec!(100), dec!(101), dec!(99), dec!(100)),
            candle(day2, dec!(100), dec!(103), dec!(98), dec!(102)),
        ];
        let store = CandleStore::new(candles, Timeframe::H1);

        let daily = store.aggregate_daily();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].close, dec!(100));
        assert_eq!(daily[1].close, dec!(102));
    }

    #[test]
    fn test_load_json_missing_file() {
        let err = CandleStore::load_json("/nonexistent/kline.json", Timeframe::H1).unwrap_err();
        assert!(matches!(err, ExchangeError::DataNotFound(_)));
    }

    #[test]
    fn test_load_json_round_trip() {
        let dir = std::env::temp_dir();
        let path = dir.join("gridbot_test_kline_load.json");
        std::fs::write(
            &path,
            r#"[[1700000000000, 100.5, 101.0, 99.5, 100.8], [1700003600000, "100.8", "102.0", "100.0", "101.5"]]"#,
        )
        .unwrap();

        let store = CandleStore::load_json(&path, Timeframe::H1).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().close, dec!(100.8));
        assert_eq!(store.get(1).unwrap().high, dec!(102.0));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_json_malformed() {
        let dir = std::env::temp_dir();
        let path = dir.join("gridbot_test_kline_bad.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        let err = CandleStore::load_json(&path, Timeframe::H1).unwrap_err();
        assert!(matches!(err, ExchangeError::Parse(_)));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_generate_sample_candles() {
        let candles =
            generate_sample_candles(24, dec!(100), 1_700_000_000_000, Timeframe::H1);
        assert_eq!(candles.len(), 24);
        for pair in candles.windows(2) {
            assert_eq!(
                pair[1].timestamp_millis() - pair[0].timestamp_millis(),
                3_600_000
            );
            assert!(pair[0].low <= pair[0].high);
        }
    }
}
