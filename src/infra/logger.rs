// ============================================================
// Layer 6 - Logger Setup
// ============================================================
// Installs the process-wide `tracing` subscriber:
//
//   console sink   - always, written to stderr
//   file sink      - only with --write_log, appended to log.txt
//
// Both sinks share one line layout:
//   [2026-10-19 14:03:07,512] 87: INFO - Loaded 431 samples
//
// `init` is guarded: the first call installs the sinks and every
// later call hands back the same Logger without attaching more.
//
// Reference: tracing-subscriber documentation (FormatEvent, Layer)

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::{
    fmt,
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Default logger name.
pub const LOGGER_NAME: &str = "AdaMatting";

/// Default file sink, relative to the working directory.
pub const LOG_FILE: &str = "log.txt";

/// How the process logger should be set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub name:      String,
    pub write_log: bool,
    pub log_file:  PathBuf,
}

impl LoggerConfig {
    /// The standard setup: console always, `log.txt` when `write_log`.
    pub fn new(write_log: bool) -> Self {
        Self {
            name: LOGGER_NAME.to_string(),
            write_log,
            log_file: PathBuf::from(LOG_FILE),
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }
}

/// Handle to the installed logger, passed to whoever needs to know
/// how logging was configured.
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The file sink, if one was attached.
    pub fn log_file(&self) -> Option<&Path> {
        self.config
            .write_log
            .then_some(self.config.log_file.as_path())
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

static INSTALLED: OnceLock<Logger> = OnceLock::new();
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// Install the logger described by `config`, or return the one that
/// is already installed. A second call never attaches extra sinks,
/// even when its `config` differs from the first.
pub fn init(config: &LoggerConfig) -> Result<&'static Logger> {
    let _guard = INSTALL_LOCK
        .lock()
        .map_err(|_| anyhow!("logger install lock poisoned"))?;

    if let Some(logger) = INSTALLED.get() {
        if logger.config() != config {
            tracing::debug!("Logger '{}' already configured; ignoring new settings", logger.name());
        }
        return Ok(logger);
    }

    install(config)?;
    let logger = INSTALLED.get_or_init(|| Logger { config: config.clone() });
    tracing::info!("Logger '{}' ready", logger.name());
    Ok(logger)
}

fn install(config: &LoggerConfig) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let console = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(std::io::stderr);

    let file = if config.write_log {
        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Cannot open log file '{}'", config.log_file.display()))?;
        Some(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_ansi(false)
                .with_writer(Mutex::new(handle)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .context("A global tracing subscriber is already installed")
}

/// `[timestamp] line: LEVEL - message`
struct LineFormat;

/// Level names as they appear in log lines; warnings are spelled out.
fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx:        &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event:      &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "[{}] {}: {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            meta.line().unwrap_or(0),
            level_name(meta.level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
