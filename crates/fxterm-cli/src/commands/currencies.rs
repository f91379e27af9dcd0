use fxterm_core::{FxtermConfig, SymbolReferenceStore};
use serde_json::json;

use crate::error::CliError;

use super::CommandResult;

pub fn run(config: &FxtermConfig) -> Result<CommandResult, CliError> {
    let store = SymbolReferenceStore::global_for(config)?;
    let currencies: Vec<&str> = store.currencies().collect();

    Ok(CommandResult::ok(
        json!({
            "count": currencies.len(),
            "currencies": currencies,
        }),
        Vec::new(),
    ))
}
