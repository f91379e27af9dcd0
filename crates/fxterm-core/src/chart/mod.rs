//! Candle chart rendering for loaded forex series.
//!
//! [`display_candle`] decides what to draw and hands the drawing to a
//! [`PlotBackend`]. [`ChartDocumentBackend`] is the bundled backend; it records
//! the chart as JSON.

mod backend;
mod config;
mod document;
mod theme;

use thiserror::Error;
use tracing::{debug, warn};

pub use backend::{AxisHandle, ChartTitle, Figure, LegendEntry, PlotBackend};
pub use config::{
    CandleChartConfig, FigureSettings, ScalePadding, WidthConfig, WARN_TOO_MUCH_DATA,
};
pub use document::{
    simple_moving_average, CandleRecord, ChartDocument, ChartDocumentBackend, FigureRecord,
    MovingAverage,
};
pub use theme::ChartTheme;

use crate::HistoricalSeries;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("figure {id} does not exist")]
    UnknownFigure { id: usize },

    #[error("axis {index} of figure {figure} does not exist")]
    UnknownAxis { figure: usize, index: usize },

    #[error("failed to write chart output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize chart: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Show a candle plot for forex data.
///
/// Without external axes (`None` or an empty slice) the backend creates a
/// figure, which gets the `FROM/TO` title when both codes are non-empty, a
/// legend when moving averages are requested, and is then shown. With exactly
/// one external axis the chart is drawn onto it and nothing else happens. Any
/// other axis count draws nothing and returns `Ok(())`.
pub fn display_candle<B: PlotBackend + ?Sized>(
    backend: &mut B,
    series: &HistoricalSeries,
    to_symbol: &str,
    from_symbol: &str,
    ma: Option<&[u32]>,
    external_axes: Option<&[AxisHandle]>,
    theme: &ChartTheme,
) -> Result<(), ChartError> {
    let config = CandleChartConfig::from_theme(theme, ma);
    debug!(
        ticker = %series.ticker,
        bars = series.len(),
        windows = ?config.mav,
        "rendering candle chart"
    );

    match external_axes.unwrap_or_default() {
        [] => {
            let config = config.with_figure(FigureSettings::from_theme(theme));
            let figure = backend.plot_figure(series, &config)?;

            if !from_symbol.is_empty() && !to_symbol.is_empty() {
                backend.set_title(&figure, ChartTitle::pair(from_symbol, to_symbol))?;
            }

            let windows = config.moving_averages();
            if let (false, Some(&axis)) = (windows.is_empty(), figure.axes.first()) {
                let entries = windows
                    .iter()
                    .enumerate()
                    .map(|(i, &window)| LegendEntry::moving_average(window, theme.color(i)))
                    .collect();
                backend.set_legend(axis, entries)?;
            }

            backend.visualize_output(&figure, false)
        }
        [axis] => backend.plot_on_axis(*axis, series, &config),
        axes => {
            warn!(
                expected = 1,
                received = axes.len(),
                "expected list of one axis item, nothing was drawn"
            );
            Ok(())
        }
    }
}
