use serde::{Deserialize, Serialize};

const DEFAULT_COLORS: [&str; 6] = [
    "#fdc708", "#d81aea", "#00e6c3", "#9467bd", "#e250c3", "#d1fa3d",
];

/// Look and size of rendered charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    /// Named candle style understood by the plotting backend.
    pub mpf_style: String,
    pub xticks_rotation: String,
    /// Color cycle used for overlays such as moving averages.
    pub colors: Vec<String>,
    pub plot_width_px: u32,
    pub plot_height_px: u32,
    pub plot_dpi: u32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            mpf_style: String::from("fxterm-dark"),
            xticks_rotation: String::from("horizontal"),
            colors: DEFAULT_COLORS.iter().map(|c| String::from(*c)).collect(),
            plot_width_px: 1000,
            plot_height_px: 700,
            plot_dpi: 100,
        }
    }
}

impl ChartTheme {
    /// Figure size in inches derived from the pixel size and DPI.
    pub fn plot_autoscale(&self) -> (f64, f64) {
        let dpi = f64::from(self.plot_dpi.max(1));
        (
            f64::from(self.plot_width_px) / dpi,
            f64::from(self.plot_height_px) / dpi,
        )
    }

    /// Color at `index`, cycling through the palette.
    pub fn color(&self, index: usize) -> &str {
        if self.colors.is_empty() {
            return DEFAULT_COLORS[index % DEFAULT_COLORS.len()];
        }
        &self.colors[index % self.colors.len()]
    }
}
