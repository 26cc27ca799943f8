//! Log output for simulations.
//!
//! The scheduler emits its own events through [`tracing`] and runs every
//! process callback inside a `dispatch` span, carrying the process id, the
//! virtual time and the kind of action. [`SimFormat`] renders those spans in
//! front of each message, so that logs from process code read like a trace
//! of the simulation.

use nu_ansi_term::{Color, Style};
use std::fmt::Write as _;
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    filter::Directive,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, FormattedFields},
    registry::LookupSpan,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

/// The log level that will be used if `RUST_LOG` is not defined.
pub const FALLBACK_LOG_LEVEL: Level = Level::INFO;

/// Installs a global tracing subscriber with a [`SimFormat`] formatter,
/// filtered by `RUST_LOG`.
///
/// # Panics
///
/// Panics when a global subscriber was already installed.
pub fn init() {
    try_init().expect("Failed to install tracing subscriber");
}

/// Installs a global tracing subscriber with a [`SimFormat`] formatter,
/// filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns an error when a global subscriber was already installed.
pub fn try_init() -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .event_format(format())
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Directive::from(FALLBACK_LOG_LEVEL))
                .from_env_lossy(),
        )
        .finish()
        .try_init()
}

/// An instance of a simulation formatter.
#[must_use]
pub fn format() -> SimFormat {
    SimFormat { with_target: true }
}

/// A formatter that puts the simulation context in front of each message.
///
/// Lines are rendered as `LEVEL span{fields}: target: message fields`.
#[derive(Debug, Clone, Copy)]
pub struct SimFormat {
    with_target: bool,
}

impl SimFormat {
    /// Whether to print the target of an event.
    #[must_use]
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }
}

macro_rules! maybe_ansi {
    ($style:ident, $ansi:ident, $writer:ident: $($t:tt)*) => {
        MaybeAnsi(format!($($t)*), $style, $ansi).write(&mut $writer)
    };
}

impl<S, N> FormatEvent<S, N> for SimFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let dimmed = Style::new().dimmed();
        let bold = Style::new().bold();

        let style = match *meta.level() {
            Level::TRACE => Style::new().fg(Color::Cyan),
            Level::DEBUG => Style::new().fg(Color::Purple),
            Level::INFO => Style::new().fg(Color::Green),
            Level::WARN => Style::new().fg(Color::Yellow),
            Level::ERROR => Style::new().fg(Color::Red),
        };
        maybe_ansi!(style, ansi, writer: "{} ", meta.level().as_str())?;

        if let Some(scope) = ctx.event_scope() {
            let mut seen = false;
            for span in scope.from_root() {
                maybe_ansi!(bold, ansi, writer: "{}", span.metadata().name())?;
                seen = true;
                let ext = span.extensions();
                if let Some(fields) = &ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        maybe_ansi!(bold, ansi, writer: "{{")?;
                        write!(writer, "{fields}")?;
                        maybe_ansi!(bold, ansi, writer: "}}")?;
                    }
                }
                maybe_ansi!(dimmed, ansi, writer: ":")?;
            }

            if seen {
                writer.write_char(' ')?;
            }
        }

        if self.with_target {
            maybe_ansi!(dimmed, ansi, writer: "{}: ", meta.target())?;
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

struct MaybeAnsi(String, Style, bool);

impl MaybeAnsi {
    fn write(self, writer: &mut Writer<'_>) -> std::fmt::Result {
        if self.2 {
            write!(writer, "{}", self.1.prefix())?;
            write!(writer, "{}", self.0)?;
            write!(writer, "{}", self.1.suffix())
        } else {
            write!(writer, "{}", self.0)
        }
    }
}
