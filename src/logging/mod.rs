//! Log setup
//!
//! Human output is one line per event: `[2024-05-01 12:00:00] [INFO] message key=value`.

use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, WatchdogError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `[timestamp] [LEVEL] message` event format
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
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
        write!(
            writer,
            "[{}] [{}] ",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber. Logs go to stdout.
pub fn init(json: bool, verbose: bool) -> Result<()> {
    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter(verbose))
            .with_writer(std::io::stdout)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .event_format(LineFormat)
            .with_env_filter(filter(verbose))
            .with_writer(std::io::stdout)
            .try_init()
    };

    result.map_err(|e| WatchdogError::InvalidConfig(format!("Failed to set up logging: {}", e)))
}
