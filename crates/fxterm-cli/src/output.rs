use fxterm_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => print!("{}", render_table(envelope)?),
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<String, CliError> {
    let mut out = String::new();
    out.push_str(&format!("request_id  : {}\n", envelope.meta.request_id));
    out.push_str(&format!("schema      : {}\n", envelope.meta.schema_version));
    out.push_str(&format!("generated_at: {}\n", envelope.meta.generated_at));
    if !envelope.meta.source_chain.is_empty() {
        let sources = envelope
            .meta
            .source_chain
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!("sources     : {sources}\n"));
    }
    out.push_str(&format!("latency_ms  : {}\n", envelope.meta.latency_ms));

    if !envelope.meta.warnings.is_empty() {
        out.push_str("warnings:\n");
        for warning in &envelope.meta.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out.push_str("data:\n");
    for line in serde_json::to_string_pretty(&envelope.data)?.lines() {
        out.push_str(&format!("  {line}\n"));
    }

    if !envelope.errors.is_empty() {
        out.push_str("errors:\n");
        for error in &envelope.errors {
            out.push_str(&format!("  - {}: {}\n", error.code, error.message));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxterm_core::{EnvelopeError, EnvelopeMeta, ForexSource};
    use serde_json::json;

    #[test]
    fn table_lists_warnings_and_errors() {
        let mut meta =
            EnvelopeMeta::new("request-12345", vec![ForexSource::YahooFinance], 5).expect("meta");
        meta.push_warning("Source Oanda not supported");
        let mut envelope = Envelope::success(meta, json!({"bars": []}));
        envelope
            .push_error(EnvelopeError::new("source.unavailable", "timed out").expect("error"))
            .expect("push");

        let table = render_table(&envelope).expect("render");
        assert!(table.contains("sources     : YahooFinance"));
        assert!(table.contains("  - Source Oanda not supported"));
        assert!(table.contains("  - source.unavailable: timed out"));
    }
}
