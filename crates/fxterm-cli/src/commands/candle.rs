use std::fs;

use fxterm_core::{display_candle, ChartDocumentBackend, ChartTheme, ForexLoader, FxtermConfig};
use serde_json::json;
use tracing::debug;

use crate::cli::CandleArgs;
use crate::error::CliError;

use super::{load_pair, CommandResult};

pub async fn run(
    args: &CandleArgs,
    loader: &ForexLoader,
    config: &FxtermConfig,
) -> Result<CommandResult, CliError> {
    let load = load_pair(&args.load, loader, config).await?;
    let pair = load.pair.to_string();

    let outcome = match &load.result {
        Ok(outcome) => outcome,
        Err(error) => {
            let envelope_error = load.source_error(error)?;
            return Ok(CommandResult::ok(
                json!({ "pair": pair, "bars": 0 }),
                load.requested_source().into_iter().collect(),
            )
            .with_errors(vec![envelope_error])
            .with_latency(load.latency_ms));
        }
    };

    let source_chain = outcome.source.into_iter().collect();
    if outcome.series.is_empty() {
        return Ok(CommandResult::ok(json!({ "pair": pair, "bars": 0 }), source_chain)
            .with_warnings(outcome.warnings.clone())
            .with_warning(format!("No historical data loaded for {pair}"))
            .with_latency(load.latency_ms));
    }

    let ma = (!args.ma.is_empty()).then_some(args.ma.as_slice());
    let mut backend = ChartDocumentBackend::new(Vec::new());
    display_candle(
        &mut backend,
        &outcome.series,
        &load.pair.to_symbol,
        &load.pair.from_symbol,
        ma,
        None,
        &ChartTheme::default(),
    )?;

    let data = match &args.output {
        Some(path) => {
            fs::write(path, backend.into_inner())?;
            debug!(path = %path.display(), "wrote chart document");
            json!({
                "pair": pair,
                "bars": outcome.series.len(),
                "output": path.display().to_string(),
            })
        }
        None => json!({
            "pair": pair,
            "bars": outcome.series.len(),
            "chart": serde_json::to_value(backend.document())?,
        }),
    };

    Ok(CommandResult::ok(data, source_chain)
        .with_warnings(outcome.warnings.clone())
        .with_latency(load.latency_ms))
}
