use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// OHLC record for one sampling period. Forex vendors often omit volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<f64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;
        if let Some(volume) = volume {
            validate_non_negative("volume", volume)?;
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Whether open and close sit inside `low..=high`.
    ///
    /// Vendor forex rows do not always satisfy this; such bars are still kept.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.high
            && (self.low..=self.high).contains(&self.open)
            && (self.low..=self.high).contains(&self.close)
    }
}

/// Timestamp-ordered OHLC series returned by every provider adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    /// Vendor ticker the data was requested for, e.g. `EURUSD=X`.
    pub ticker: String,
    pub bars: Vec<Bar>,
}

impl HistoricalSeries {
    /// Builds a series, sorting bars by timestamp.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.ts);
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    /// Series meaning "no data".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|bar| bar.close)
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(input: &str) -> UtcDateTime {
        UtcDateTime::parse(input).expect("timestamp")
    }

    #[test]
    fn keeps_close_above_high_but_flags_it() {
        let bar = Bar::new(ts("2024-01-01T00:00:00Z"), 1.10, 1.12, 1.09, 1.125, None)
            .expect("out-of-range close is kept");
        assert!(!bar.is_consistent());
    }

    #[test]
    fn keeps_inverted_range_but_flags_it() {
        let bar = Bar::new(ts("2024-01-01T00:00:00Z"), 1.10, 1.09, 1.12, 1.10, None)
            .expect("inverted range is kept");
        assert!(!bar.is_consistent());
    }

    #[test]
    fn rejects_negative_and_non_finite_prices() {
        let err = Bar::new(ts("2024-01-01T00:00:00Z"), -1.0, 1.1, 1.0, 1.05, None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { field: "open" }));

        let err = Bar::new(ts("2024-01-01T00:00:00Z"), 1.0, f64::NAN, 1.0, 1.05, None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "high" }));
    }

    #[test]
    fn well_formed_bar_is_consistent() {
        let bar = Bar::new(ts("2024-01-01T00:00:00Z"), 1.0, 1.1, 0.9, 1.05, Some(10.0))
            .expect("bar");
        assert!(bar.is_consistent());
    }

    #[test]
    fn series_is_sorted_by_timestamp() {
        let later = Bar::new(ts("2024-01-02T00:00:00Z"), 1.1, 1.2, 1.0, 1.15, None).expect("bar");
        let earlier = Bar::new(ts("2024-01-01T00:00:00Z"), 1.0, 1.1, 0.9, 1.05, None).expect("bar");

        let series = HistoricalSeries::new("EURUSD=X", vec![later, earlier]);
        assert_eq!(series.len(), 2);
        assert!(series.bars[0].ts < series.bars[1].ts);
        assert_eq!(series.closes().collect::<Vec<_>>(), vec![1.05, 1.15]);
    }
}
