use serde::{Deserialize, Serialize};

use super::config::CandleChartConfig;
use super::ChartError;
use crate::HistoricalSeries;

/// Drawing surface inside a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisHandle {
    pub figure: usize,
    pub index: usize,
}

impl AxisHandle {
    pub const fn new(figure: usize, index: usize) -> Self {
        Self { figure, index }
    }
}

/// A figure created by the backend, with its axes in layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    pub id: usize,
    pub axes: Vec<AxisHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTitle {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub horizontal_alignment: String,
}

impl ChartTitle {
    /// Pair title placed in the top-left corner.
    pub fn pair(from_symbol: &str, to_symbol: &str) -> Self {
        Self {
            text: format!("{from_symbol}/{to_symbol}"),
            x: 0.055,
            y: 0.965,
            horizontal_alignment: String::from("left"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub line_style: String,
}

impl LegendEntry {
    pub fn moving_average(window: u32, color: impl Into<String>) -> Self {
        Self {
            label: format!("MA {window}"),
            color: color.into(),
            line_style: String::from("-"),
        }
    }
}

/// Rendering target for candle charts.
pub trait PlotBackend {
    /// Draws the series on a new figure and returns it.
    fn plot_figure(
        &mut self,
        series: &HistoricalSeries,
        config: &CandleChartConfig,
    ) -> Result<Figure, ChartError>;

    /// Draws the series on an axis owned by the caller.
    fn plot_on_axis(
        &mut self,
        axis: AxisHandle,
        series: &HistoricalSeries,
        config: &CandleChartConfig,
    ) -> Result<(), ChartError>;

    fn set_title(&mut self, figure: &Figure, title: ChartTitle) -> Result<(), ChartError>;

    fn set_legend(&mut self, axis: AxisHandle, entries: Vec<LegendEntry>) -> Result<(), ChartError>;

    /// Final display step for figures the backend created.
    fn visualize_output(
        &mut self,
        figure: &Figure,
        force_tight_layout: bool,
    ) -> Result<(), ChartError>;
}
