//! CLI entrypoint for llm-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use relay_application::{
    CompositeExperimentLogger, ExperimentLogger, ExperimentParams, FixtureSource,
    RunExperimentSuiteUseCase,
};
use relay_domain::util::now_millis;
use relay_domain::{FullExperimentResult, parse_test_case};
use relay_infrastructure::{
    ConfigLoader, DeepSeekGateway, DirectoryFixtureSource, FileConfig, JsonResultWriter,
    JsonlExperimentLogger,
};
use relay_presentation::{
    AppState, Cli, Command, ConsoleExperimentLogger, ConsoleFormatter, RunArgs, router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let command = cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    let _log_guard = init_tracing(
        log_level(cli.verbose, &command),
        config.logging.directory.as_deref(),
    );

    info!("Starting llm-relay");

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("Config: {}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    match command {
        Command::Serve { host, port } => serve(&config, host, port).await,
        Command::Experiment { run } => experiment(&config, &run, false).await,
        Command::Overflow { run } => experiment(&config, &run, true).await,
        Command::Inspect { fixture, fixtures } => inspect(&config, &fixture, fixtures),
    }
}

/// Filter level for the `-v` count. Experiment commands start at `info`,
/// where their progress is reported.
fn log_level(verbose: u8, command: &Command) -> &'static str {
    let base = match command {
        Command::Experiment { .. } | Command::Overflow { .. } => 1,
        Command::Serve { .. } | Command::Inspect { .. } => 0,
    };
    match verbose.saturating_add(base) {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Console logging at `level` (overridable by `RUST_LOG`), plus a daily
/// rolling file when `logging.directory` is set.
fn init_tracing(level: &str, directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "llm-relay.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}

/// Build the upstream gateway, reading the API key from the environment.
fn gateway(config: &FileConfig) -> Result<Arc<DeepSeekGateway>> {
    let key_env = &config.upstream.api_key_env;
    let api_key = std::env::var(key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| anyhow!("{} environment variable is not set", key_env))?;

    let gateway = DeepSeekGateway::new(
        &config.upstream.base_url,
        api_key,
        config.upstream.request_timeout(),
        config.upstream.connect_timeout(),
    )?;
    info!("Upstream endpoint: {}", gateway.endpoint());
    Ok(Arc::new(gateway))
}

async fn serve(config: &FileConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let gateway = gateway(config)?;
    let state = AppState::new(gateway, config.relay_params());

    let address = format!(
        "{}:{}",
        host.unwrap_or_else(|| config.server.host.clone()),
        port.unwrap_or(config.server.port)
    );
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    println!("llm-relay listening on http://{}", address);
    info!("Serving {} tiers with model {}", config.tiers.len(), config.upstream.model);

    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")
}

async fn experiment(config: &FileConfig, run: &RunArgs, overflow_only: bool) -> Result<()> {
    let gateway = gateway(config)?;

    let mut params: ExperimentParams = config.experiment_params()?;
    if let Some(ms) = run.delay_ms {
        params = params.with_step_delay(Duration::from_millis(ms));
    }

    let fixtures_dir = run
        .fixtures
        .clone()
        .unwrap_or_else(|| config.experiment.fixtures_dir.clone());
    let fixtures = Arc::new(DirectoryFixtureSource::new(fixtures_dir));

    let suite = RunExperimentSuiteUseCase::new(gateway, fixtures, &config.upstream.model, params)
        .with_logger(experiment_logger(config, run))
        .with_temperature(config.upstream.experiment_temperature);

    let result = if overflow_only {
        FullExperimentResult::new(vec![suite.execute_overflow().await?], now_millis())
    } else {
        suite.execute().await?
    };

    let output = run
        .output
        .clone()
        .unwrap_or_else(|| config.experiment.output_path.clone());
    JsonResultWriter::save(&result, &output)?;

    if run.json {
        println!("{}", ConsoleFormatter::format_json(&result));
    } else {
        println!("{}", ConsoleFormatter::format_suite(&result));
        println!("Results saved to {}", output.display());
    }

    Ok(())
}

/// Console logger, plus a JSONL transcript when a path is configured.
fn experiment_logger(config: &FileConfig, run: &RunArgs) -> Arc<dyn ExperimentLogger> {
    let mut delegates: Vec<Arc<dyn ExperimentLogger>> = vec![Arc::new(ConsoleExperimentLogger)];

    let transcript = run
        .log
        .clone()
        .or_else(|| config.logging.conversation_log.clone());
    if let Some(path) = transcript {
        match JsonlExperimentLogger::new(&path) {
            Some(logger) => {
                info!("Writing experiment transcript to {}", path.display());
                delegates.push(Arc::new(logger));
            }
            None => warn!("Continuing without a transcript"),
        }
    }

    Arc::new(CompositeExperimentLogger::new(delegates))
}

fn inspect(config: &FileConfig, fixture: &str, fixtures: Option<PathBuf>) -> Result<()> {
    let as_path = Path::new(fixture);
    let (name, raw) = if as_path.is_file() {
        let name = as_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| fixture.to_string());
        let raw = std::fs::read_to_string(as_path)
            .with_context(|| format!("Failed to read {}", as_path.display()))?;
        (name, raw)
    } else {
        let dir = fixtures.unwrap_or_else(|| config.experiment.fixtures_dir.clone());
        let source = DirectoryFixtureSource::new(dir);
        let raw = source.load(fixture)?;
        (fixture.to_string(), raw)
    };

    let case = parse_test_case(&name, &raw);
    if case.steps.is_empty() {
        warn!("{} contains no recognised steps", name);
    }
    println!("{}", ConsoleFormatter::format_test_case(&case));
    Ok(())
}
