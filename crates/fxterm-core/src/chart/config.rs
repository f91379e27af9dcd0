use serde::{Deserialize, Serialize};

use super::theme::ChartTheme;

/// Bar count above which backends warn about slow rendering.
pub const WARN_TOO_MUCH_DATA: usize = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalePadding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for ScalePadding {
    fn default() -> Self {
        Self {
            left: 0.3,
            right: 1.0,
            top: 0.8,
            bottom: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthConfig {
    pub candle_linewidth: f64,
    pub candle_width: f64,
    pub volume_linewidth: f64,
    pub volume_width: f64,
}

impl Default for WidthConfig {
    fn default() -> Self {
        Self {
            candle_linewidth: 0.6,
            candle_width: 0.8,
            volume_linewidth: 0.8,
            volume_width: 0.8,
        }
    }
}

/// Size settings for a chart that owns its own figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSettings {
    pub ratio: (u32, u32),
    pub scale: f64,
    /// Width and height in inches.
    pub size: (f64, f64),
}

impl FigureSettings {
    pub fn from_theme(theme: &ChartTheme) -> Self {
        Self {
            ratio: (10, 7),
            scale: 1.10,
            size: theme.plot_autoscale(),
        }
    }
}

/// Everything a backend needs to draw one candle chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleChartConfig {
    pub chart_type: String,
    pub style: String,
    pub volume: bool,
    pub xrotation: String,
    pub scale_padding: ScalePadding,
    pub width_config: WidthConfig,
    pub warn_too_much_data: usize,
    /// Moving-average windows; `None` when no overlay was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mav: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figure: Option<FigureSettings>,
}

impl CandleChartConfig {
    /// An empty window list counts as no moving averages.
    pub fn from_theme(theme: &ChartTheme, ma: Option<&[u32]>) -> Self {
        Self {
            chart_type: String::from("candle"),
            style: theme.mpf_style.clone(),
            volume: false,
            xrotation: theme.xticks_rotation.clone(),
            scale_padding: ScalePadding::default(),
            width_config: WidthConfig::default(),
            warn_too_much_data: WARN_TOO_MUCH_DATA,
            mav: ma.filter(|windows| !windows.is_empty()).map(<[u32]>::to_vec),
            figure: None,
        }
    }

    pub fn with_figure(mut self, figure: FigureSettings) -> Self {
        self.figure = Some(figure);
        self
    }

    pub fn moving_averages(&self) -> &[u32] {
        self.mav.as_deref().unwrap_or_default()
    }
}
