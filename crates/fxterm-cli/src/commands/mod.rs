mod candle;
mod check;
mod currencies;
mod load;

use std::str::FromStr;
use std::time::Instant;

use fxterm_core::{
    CoreError, CurrencyPair, Envelope, EnvelopeError, ForexLoadRequest, ForexLoader, ForexSource,
    FxtermConfig, LoadOutcome, SourceError, SymbolReferenceStore,
};
use serde_json::Value;

use crate::cli::{Cli, Command, LoadArgs};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<ForexSource>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ForexSource>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = FxtermConfig::from_env();

    let command_result = match &cli.command {
        Command::Load(args) => {
            let loader = ForexLoader::builder().with_config(config.clone()).build();
            load::run(args, &loader, &config).await?
        }
        Command::Candle(args) => {
            let loader = ForexLoader::builder().with_config(config.clone()).build();
            candle::run(args, &loader, &config).await?
        }
        Command::Currencies => currencies::run(&config)?,
        Command::Check(args) => check::run(args, &config)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
        source_chain,
    } = command_result;

    let mut metadata = Metadata::new(source_chain, latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let mut envelope = Envelope::success(metadata.into_envelope_meta()?, data);
    for error in errors {
        envelope.push_error(error)?;
    }
    Ok(envelope)
}

/// A pair load that reached the dispatcher.
///
/// Provider failures are kept so commands can report them in the envelope
/// instead of aborting.
pub struct PairLoad {
    pub pair: CurrencyPair,
    pub request: ForexLoadRequest,
    pub result: Result<LoadOutcome, SourceError>,
    pub latency_ms: u64,
}

impl PairLoad {
    /// Source named on the command line, if it is a known one.
    pub fn requested_source(&self) -> Option<ForexSource> {
        ForexSource::from_str(&self.request.source).ok()
    }

    pub fn source_error(&self, error: &SourceError) -> Result<EnvelopeError, CliError> {
        let envelope_error = EnvelopeError::new(error.code(), error.message())?;
        Ok(match self.requested_source() {
            Some(source) => envelope_error.with_source(source),
            None => envelope_error,
        })
    }
}

pub async fn load_pair(
    args: &LoadArgs,
    loader: &ForexLoader,
    config: &FxtermConfig,
) -> Result<PairLoad, CliError> {
    let pair = CurrencyPair::parse(&args.pair)?;
    if matches!(ForexSource::from_str(&args.source), Ok(ForexSource::YahooFinance)) {
        check_reference_codes(&pair, SymbolReferenceStore::global_for(config)?)?;
    }

    let mut request = ForexLoadRequest::new(&pair.to_symbol, &pair.from_symbol)
        .with_source(args.source.trim())
        .with_interval(args.interval.trim())
        .with_resolution(args.resolution)
        .with_verbose(!args.quiet);
    if let Some(start) = args.start {
        request = request.with_start_date(start);
    }

    let started = Instant::now();
    let result = match loader.load(&request).await {
        Ok(outcome) => Ok(outcome),
        Err(CoreError::Source(error)) => Err(error),
        Err(other) => return Err(other.into()),
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(PairLoad {
        pair,
        request,
        result,
        latency_ms,
    })
}

/// Both legs of a Yahoo Finance pair must be listed currencies.
fn check_reference_codes(
    pair: &CurrencyPair,
    store: &SymbolReferenceStore,
) -> Result<(), CliError> {
    store.validate(&pair.from_symbol)?;
    store.validate(&pair.to_symbol)?;
    Ok(())
}
