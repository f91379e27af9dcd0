use fxterm_core::{FxtermConfig, SymbolReferenceStore};
use serde_json::json;

use crate::cli::CheckArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &CheckArgs, config: &FxtermConfig) -> Result<CommandResult, CliError> {
    let store = SymbolReferenceStore::global_for(config)?;
    let code = store.validate(args.code.trim())?;

    Ok(CommandResult::ok(
        json!({ "code": code, "supported": true }),
        Vec::new(),
    ))
}
