//! Console log format: `TIMESTAMP LEVEL target: span1:span2: message`.
//!
//! The default tracing format puts span context before the target; request logs
//! are easier to scan with the module first.

use chrono::Utc;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter that puts the target before span context
pub struct TargetFirstFormat {
    ansi: bool,
}

impl TargetFirstFormat {
    /// `ansi` colours the level; disable when logs go to a file or collector
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }
}

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[31m", // Red
        Level::WARN => "\x1b[33m",  // Yellow
        Level::INFO => "\x1b[32m",  // Green
        Level::DEBUG => "\x1b[34m", // Blue
        Level::TRACE => "\x1b[35m", // Magenta
    }
}

impl<S, N> FormatEvent<S, N> for TargetFirstFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        write!(writer, "{} ", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"))?;

        let level = metadata.level();
        if self.ansi {
            write!(writer, "{}{:>5}\x1b[0m ", level_color(level), level)?;
        } else {
            write!(writer, "{:>5} ", level)?;
        }

        write!(writer, "{}: ", metadata.target())?;

        if let Some(scope) = ctx.event_scope() {
            let mut first = true;
            for span in scope.from_root() {
                if !first {
                    write!(writer, ":")?;
                }
                write!(writer, "{}", span.name())?;
                first = false;
            }
            if !first {
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
