//! Pagehand - snapshot-indexed browser action engine.
//!
//! Main entry point for the Pagehand CLI.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use futures::FutureExt;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pagehand_browser::tools::definitions;
use pagehand_browser::{BrowserWorker, toolset};
use pagehand_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};
use pagehand_protocols::{ExportFormat, Tool, ToolContext, ToolError, ToolResult};

/// Pagehand CLI.
#[derive(Parser)]
#[command(name = "pagehand")]
#[command(about = "Snapshot-indexed browser action engine")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve tool calls as JSON lines on stdin/stdout (default)
    Run {
        /// Page to open before reading requests
        #[arg(long)]
        url: Option<String>,
    },

    /// Print the tool definitions
    Tools {
        #[arg(long, value_enum, default_value_t = ToolFormat::Openai)]
        format: ToolFormat,
    },

    /// Load and validate the configuration file
    CheckConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum ToolFormat {
    Openai,
    Anthropic,
}

impl From<ToolFormat> for ExportFormat {
    fn from(format: ToolFormat) -> Self {
        match format {
            ToolFormat::Openai => ExportFormat::OpenAi,
            ToolFormat::Anthropic => ExportFormat::Anthropic,
        }
    }
}

/// One request line.
#[derive(Debug, Deserialize)]
struct ToolCall {
    tool: String,
    #[serde(default)]
    params: serde_json::Value,
}

/// Initialize tracing with stderr and daily-rolled file output.
///
/// Stdout carries the tool protocol, so nothing logs there.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = PathBuf::from(ConfigLoader::expand_path(
        &logging.resolved_dir().to_string_lossy(),
    ));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&logging.file_prefix)
        .max_log_files(14)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let json_file = logging.json.then(|| {
        fmt::layer()
            .json()
            .with_writer(non_blocking.clone())
    });
    let text_file = (!logging.json).then(|| {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(json_file)
        .with(text_file)
        .init();

    Ok(())
}

fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    Ok(ConfigLoader::load_or_default(path)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Some(Commands::Tools { format }) => {
            print_tools(format)?;
            Ok(())
        }
        Some(Commands::CheckConfig) => check_config(&cli.config, &config),
        Some(Commands::Run { url }) => {
            init_tracing(&config.logging)?;
            run(config, url).await
        }
        None => {
            init_tracing(&config.logging)?;
            run(config, None).await
        }
    }
}

fn print_tools(format: ToolFormat) -> Result<(), serde_json::Error> {
    let exported: Vec<serde_json::Value> = definitions()
        .iter()
        .map(|def| def.export(format.into()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&exported)?);
    Ok(())
}

fn check_config(path: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config)?;
    if !path.exists() {
        println!("{} not found, using defaults", path.display());
    }
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        return Err(format!("{} configuration error(s)", result.errors.len()).into());
    }
    println!("Configuration OK");
    Ok(())
}

/// Serve tool calls until stdin closes, Ctrl-C, or a fatal error.
async fn run(config: Config, url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Pagehand v{}", env!("CARGO_PKG_VERSION"));

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for e in &validation.errors {
            error!("Config {}: {}", e.path, e.message);
        }
        return Err("invalid configuration".into());
    }

    let worker = BrowserWorker::spawn(config).await?;
    let handle = worker.handle();

    if let Some(url) = url {
        let report = handle
            .call(move |c| async move { c.navigate(&url).await }.boxed_local())
            .await?;
        if report.success {
            info!("Opened {}", report.url);
        } else {
            warn!("Initial navigation failed: {:?}", report.error);
        }
    }

    let tools: HashMap<String, Arc<dyn Tool>> = toolset(handle)
        .into_iter()
        .map(|tool| (tool.definition().id.clone(), tool))
        .collect();
    let session_id = format!("cli-{}", std::process::id());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let (result, fatal) = handle_line(&tools, &line, &session_id).await;
        let mut out = serde_json::to_string(&result)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;

        if fatal {
            error!("Stopping after unrecoverable error");
            break;
        }
    }

    worker.shutdown().await?;
    info!("Pagehand stopped");
    Ok(())
}

/// Execute one request line. The flag is set when the engine must not be
/// used again.
async fn handle_line(
    tools: &HashMap<String, Arc<dyn Tool>>,
    line: &str,
    session_id: &str,
) -> (ToolResult, bool) {
    let call: ToolCall = match serde_json::from_str(line) {
        Ok(call) => call,
        Err(e) => {
            let err = ToolError::InvalidParameters(format!("Malformed request: {}", e));
            return (ToolResult::error(err.to_string()), false);
        }
    };

    let Some(tool) = tools.get(&call.tool) else {
        let err = ToolError::NotFound(call.tool);
        return (ToolResult::error(err.to_string()), false);
    };

    match tool.execute(call.params, ToolContext::new(session_id)).await {
        Ok(result) => (result, false),
        Err(e) => {
            let fatal = !e.is_recoverable();
            (ToolResult::error(e.to_string()), fatal)
        }
    }
}
