//! Process-wide logging to a run log file and stdout.
//!
//! The log file is opened in append mode so consecutive runs share it; each
//! run starts with [`run_separator`] to keep them apart.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::{info, Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::error::DatasetError;

/// Log file used when none is given.
pub const DEFAULT_LOG_FILE: &str = "dataset_creator.log";

/// `<timestamp> - <LEVEL> - <message>`
struct RunLogFormatter;

impl<S, N> FormatEvent<S, N> for RunLogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now();
        write!(
            writer,
            "{} - {} - ",
            now.format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Line written at the start of every run.
pub fn run_separator() -> String {
    let bar = "=".repeat(40);
    format!("{bar} New Execution {bar}")
}

/// Install the global subscriber and log the run separator.
///
/// `RUST_LOG` overrides the default `info` filter. Fails if the log file
/// cannot be opened or a global subscriber is already installed.
pub fn init_logging(log_file: &Path) -> Result<(), DatasetError> {
    let logging_error = |message: String| DatasetError::Logging {
        path: log_file.to_path_buf(),
        message,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| logging_error(source.to_string()))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(RunLogFormatter)
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(RunLogFormatter)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|source| logging_error(source.to_string()))?;

    info!("{}", run_separator());
    Ok(())
}
