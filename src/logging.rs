//! Log line formatting and subscriber setup.
//!
//! Every event renders as `[<facility>] [<LEVEL>] <message> <fields>`; the
//! level tag is left out for `INFO` events.

use std::fmt;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter producing `[facility] [LEVEL] message` lines.
#[derive(Debug, Clone)]
pub struct FacilityFormat {
    facility: String,
}

impl FacilityFormat {
    /// Creates a formatter tagging every line with `facility`.
    #[must_use]
    pub fn new(facility: impl Into<String>) -> Self {
        Self {
            facility: facility.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for FacilityFormat
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
        write!(writer, "[{}] ", self.facility)?;
        let level = *event.metadata().level();
        if level != Level::INFO {
            write!(writer, "[{level}] ")?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Returns the filter directive used when `RUST_LOG` is not set.
///
/// Priority: quiet flag > verbose count > `info`.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Installs the global subscriber writing facility-tagged lines to stdout.
///
/// `RUST_LOG` overrides the verbosity flags when set.
pub fn init(facility: &str, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stdout)
        .event_format(FacilityFormat::new(facility))
        .init();
}
