mod alphavantage;
mod polygon;
mod yahoo;

pub use alphavantage::AlphaVantageAdapter;
pub use polygon::PolygonAdapter;
pub use yahoo::YahooAdapter;

use tracing::warn;

use crate::{Bar, ForexSource, UtcDateTime};

/// Builds a bar from one vendor row.
///
/// Rows with negative or non-finite values cannot be represented and are
/// skipped with a warning. Rows whose open/close fall outside the high/low
/// range are kept as sent.
pub(crate) fn vendor_bar(
    source: ForexSource,
    ts: UtcDateTime,
    ohlc: [f64; 4],
    volume: Option<f64>,
) -> Option<Bar> {
    let [open, high, low, close] = ohlc;
    match Bar::new(ts, open, high, low, close, volume) {
        Ok(bar) => {
            if !bar.is_consistent() {
                warn!(
                    source = %source,
                    ts = %ts,
                    open, high, low, close,
                    "vendor bar outside its high/low range"
                );
            }
            Some(bar)
        }
        Err(error) => {
            warn!(source = %source, ts = %ts, %error, "skipping unusable vendor bar");
            None
        }
    }
}
