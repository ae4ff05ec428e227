//! Structured logging for policyweaver runs
//!
//! Features:
//! - Human-readable console logging for interactive runs
//! - Structured JSON logging for scheduled/pipeline runs
//! - File output with daily rotation
//! - Per-run span (`weave{run_id=..}`) on every event from the core

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "policyweaver.log";

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format for interactive runs
    Pretty,
    /// JSON format for pipelines (structured logging)
    Json,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    /// Log to stdout only
    Stdout,
    /// Log to file only
    File,
    /// Log to both stdout and file
    Both,
}

impl LogOutput {
    pub fn parse(value: &str) -> Self {
        match value {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stdout,
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    let base = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    // HTTP internals only warn, whatever the configured level
    ["hyper=warn", "reqwest=warn", "h2=warn"]
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(base, |filter, directive| filter.add_directive(directive))
}

fn file_appender(directory: &str) -> RollingFileAppender {
    std::fs::create_dir_all(directory).ok();
    RollingFileAppender::new(Rotation::DAILY, directory, LOG_FILE_PREFIX)
}

/// Initialize the logging system from the `logging:` config block
///
/// Examples:
/// ```bash
/// # Interactive: pretty console output
/// RUST_LOG=info policyweaver --config config.yaml --export export.json
///
/// # Pipeline: JSON to file
/// LOG_FORMAT=json LOG_OUTPUT=file LOG_DIR=/var/log/policyweaver policyweaver ...
/// ```
pub fn init(config: &LoggingConfig) {
    let format = LogFormat::parse(&config.format);
    let output = LogOutput::parse(&config.output);
    let filter = env_filter(&config.level);

    let stdout_layer = match output {
        LogOutput::File => None,
        LogOutput::Stdout | LogOutput::Both => Some(match format {
            LogFormat::Pretty => fmt::layer().pretty().with_target(true).boxed(),
            LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
            LogFormat::Compact => fmt::layer().compact().boxed(),
        }),
    };

    let file_layer = match output {
        LogOutput::Stdout => None,
        LogOutput::File | LogOutput::Both => Some(
            fmt::layer()
                .with_writer(file_appender(&config.directory))
                .with_ansi(false)
                .boxed(),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::debug!(
        format = ?format,
        output = ?output,
        level = %config.level,
        "Logging initialized"
    );
}
