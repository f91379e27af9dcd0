use fxterm_core::{Bar, ForexLoader, ForexSource, FxtermConfig, Resolution};
use serde::Serialize;

use crate::cli::LoadArgs;
use crate::error::CliError;

use super::{load_pair, CommandResult};

#[derive(Debug, Serialize)]
struct LoadResponseData {
    pair: String,
    from_symbol: String,
    to_symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<ForexSource>,
    interval: String,
    resolution: Resolution,
    ticker: String,
    bars: Vec<Bar>,
}

pub async fn run(
    args: &LoadArgs,
    loader: &ForexLoader,
    config: &FxtermConfig,
) -> Result<CommandResult, CliError> {
    let load = load_pair(args, loader, config).await?;

    let mut data = LoadResponseData {
        pair: load.pair.to_string(),
        from_symbol: load.pair.from_symbol.clone(),
        to_symbol: load.pair.to_symbol.clone(),
        source: load.requested_source(),
        interval: load.request.interval.clone(),
        resolution: load.request.resolution,
        ticker: String::new(),
        bars: Vec::new(),
    };

    match &load.result {
        Ok(outcome) => {
            data.ticker = outcome.series.ticker.clone();
            data.bars = outcome.series.bars.clone();
            Ok(
                CommandResult::ok(serde_json::to_value(data)?, outcome.source.into_iter().collect())
                    .with_warnings(outcome.warnings.clone())
                    .with_latency(load.latency_ms),
            )
        }
        Err(error) => {
            let envelope_error = load.source_error(error)?;
            Ok(
                CommandResult::ok(serde_json::to_value(data)?, load.requested_source().into_iter().collect())
                    .with_errors(vec![envelope_error])
                    .with_latency(load.latency_ms),
            )
        }
    }
}
