use std::io::Write;

use serde::Serialize;
use tracing::{debug, warn};

use super::backend::{AxisHandle, ChartTitle, Figure, LegendEntry, PlotBackend};
use super::config::CandleChartConfig;
use super::ChartError;
use crate::{HistoricalSeries, UtcDateTime};

/// Serializable record of everything drawn through a [`ChartDocumentBackend`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDocument {
    pub figures: Vec<FigureRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureRecord {
    pub id: usize,
    /// Set when the chart was drawn on a caller-owned axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_axis: Option<AxisHandle>,
    pub ticker: String,
    pub config: CandleChartConfig,
    pub candles: Vec<CandleRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub moving_averages: Vec<MovingAverage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<ChartTitle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub legend: Vec<LegendEntry>,
    pub tight_layout: bool,
    pub shown: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleRecord {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverage {
    pub window: u32,
    /// One slot per candle; `None` until the window is filled.
    pub values: Vec<Option<f64>>,
}

/// Backend that records charts as JSON instead of drawing pixels.
///
/// Each shown figure is written to the sink as one JSON line, so a sink that
/// sees several figures holds JSON Lines. [`ChartDocumentBackend::document`]
/// keeps every figure recorded so far.
pub struct ChartDocumentBackend<W> {
    sink: W,
    document: ChartDocument,
}

impl<W: Write> ChartDocumentBackend<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            document: ChartDocument::default(),
        }
    }

    pub fn document(&self) -> &ChartDocument {
        &self.document
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn record(
        &mut self,
        external_axis: Option<AxisHandle>,
        series: &HistoricalSeries,
        config: &CandleChartConfig,
    ) -> usize {
        if series.len() > config.warn_too_much_data {
            warn!(
                bars = series.len(),
                threshold = config.warn_too_much_data,
                "chart has too much data and may render slowly"
            );
        }

        let closes: Vec<f64> = series.closes().collect();
        let moving_averages = config
            .moving_averages()
            .iter()
            .map(|&window| MovingAverage {
                window,
                values: simple_moving_average(&closes, window as usize),
            })
            .collect();

        let id = self.document.figures.len();
        self.document.figures.push(FigureRecord {
            id,
            external_axis,
            ticker: series.ticker.clone(),
            config: config.clone(),
            candles: series
                .bars
                .iter()
                .map(|bar| CandleRecord {
                    ts: bar.ts,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                })
                .collect(),
            moving_averages,
            title: None,
            legend: Vec::new(),
            tight_layout: false,
            shown: false,
        });
        id
    }

    fn figure_mut(&mut self, id: usize) -> Result<&mut FigureRecord, ChartError> {
        self.document
            .figures
            .get_mut(id)
            .filter(|record| record.external_axis.is_none())
            .ok_or(ChartError::UnknownFigure { id })
    }
}

impl<W: Write> PlotBackend for ChartDocumentBackend<W> {
    fn plot_figure(
        &mut self,
        series: &HistoricalSeries,
        config: &CandleChartConfig,
    ) -> Result<Figure, ChartError> {
        let id = self.record(None, series, config);
        debug!(figure = id, bars = series.len(), "recorded candle figure");
        Ok(Figure {
            id,
            axes: vec![AxisHandle::new(id, 0)],
        })
    }

    fn plot_on_axis(
        &mut self,
        axis: AxisHandle,
        series: &HistoricalSeries,
        config: &CandleChartConfig,
    ) -> Result<(), ChartError> {
        let id = self.record(Some(axis), series, config);
        debug!(figure = id, ?axis, "recorded candle chart on external axis");
        Ok(())
    }

    fn set_title(&mut self, figure: &Figure, title: ChartTitle) -> Result<(), ChartError> {
        self.figure_mut(figure.id)?.title = Some(title);
        Ok(())
    }

    fn set_legend(&mut self, axis: AxisHandle, entries: Vec<LegendEntry>) -> Result<(), ChartError> {
        let record = self
            .figure_mut(axis.figure)
            .map_err(|_| ChartError::UnknownAxis {
                figure: axis.figure,
                index: axis.index,
            })?;
        if axis.index != 0 {
            return Err(ChartError::UnknownAxis {
                figure: axis.figure,
                index: axis.index,
            });
        }
        record.legend = entries;
        Ok(())
    }

    fn visualize_output(
        &mut self,
        figure: &Figure,
        force_tight_layout: bool,
    ) -> Result<(), ChartError> {
        let record = self.figure_mut(figure.id)?;
        record.tight_layout = force_tight_layout;
        record.shown = true;

        let line = serde_json::to_vec(&*record)?;
        self.sink.write_all(&line)?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        Ok(())
    }
}

/// Trailing simple moving average. A zero window yields no values.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        out.push((i + 1 >= window).then(|| sum / window as f64));
    }
    out
}
