//! CLI entrypoint for llm-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use panel_application::{
    NoStatus, RunWorkflowUseCase, StatusObserver, WorkflowInput, WorkflowOutput,
};
use panel_domain::PanelError;
use panel_infrastructure::{
    ConfigLoader, EnvCredentialStore, FileOutputWriter, LocalContextLoader, ResolvedConfig,
    StaticProviderRegistry, TimestampRunNamer,
};
use panel_presentation::{
    Cli, ConsoleFormatter, MarkdownRenderer, SimpleStatusPrinter, StatusReporter,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Guards flush buffered log lines on drop, so they live until exit
    let _guards = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting llm-panel");

    match run(&cli).await {
        Ok(output) => {
            if cli.json {
                println!("{}", ConsoleFormatter::format_json(&output));
            } else if !cli.quiet {
                println!("{}", ConsoleFormatter::format(&output));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", ConsoleFormatter::format_error(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(cli: &Cli) -> Result<WorkflowOutput, PanelError> {
    let resolved = load_config(cli)?;
    info!(
        "Loaded {} model(s) and {} group(s)",
        resolved.app.models.len(),
        resolved.app.groups.len()
    );

    // === Dependency Injection ===
    let credentials = Arc::new(EnvCredentialStore::new());
    let registry = StaticProviderRegistry::with_http_providers(
        &resolved.providers,
        Arc::clone(&credentials),
    );

    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding queries");
            on_interrupt.cancel();
        }
    });

    let use_case = RunWorkflowUseCase::new(
        Arc::new(resolved.app),
        Arc::new(registry),
        credentials,
        Arc::new(LocalContextLoader::new()),
        Arc::new(MarkdownRenderer),
        Arc::new(FileOutputWriter::new()),
        Arc::new(TimestampRunNamer),
    )
    .with_cancellation(cancellation);

    let input = WorkflowInput::new(&cli.instructions, cli.output_dir(&resolved.defaults))
        .with_context_paths(cli.context.clone())
        .with_criteria(cli.selection_criteria())
        .with_system_prompt(cli.system_prompt_override())
        .with_timeout(cli.timeout(&resolved.defaults))
        .with_thinking(cli.thinking);

    let observer = status_observer(cli);
    use_case.execute_with_status(input, observer.as_ref()).await
}

fn load_config(cli: &Cli) -> Result<ResolvedConfig, PanelError> {
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    Ok(file_config.resolve()?)
}

/// Spinners on an interactive terminal, plain lines otherwise. Plain
/// lines go to stdout, so they are suppressed for `--json`.
fn status_observer(cli: &Cli) -> Box<dyn StatusObserver> {
    if cli.quiet {
        Box::new(NoStatus)
    } else if std::io::stderr().is_terminal() {
        Box::new(StatusReporter::new())
    } else if cli.json {
        Box::new(NoStatus)
    } else {
        Box::new(SimpleStatusPrinter)
    }
}

/// Log to stderr at a level chosen by `-v` (overridable with `RUST_LOG`),
/// and also to `log_file` when given.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Vec<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (stderr, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());
    let mut guards = vec![stderr_guard];

    let file_layer = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            guards.push(guard);
            Some(fmt::layer().with_writer(writer).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(guards)
}
