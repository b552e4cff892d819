use colored::Color;
use std::fmt;
use std::fmt::Write;
use std::fmt::{Debug, Display};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Single-line event layout: `time level target@trace_id{span fields}: message key=value`.
pub(super) struct Formatter {
    use_colors: bool,
}

impl Formatter {
    pub(super) fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl<S, N> FormatEvent<S, N> for Formatter
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
        let meta = event.metadata();
        let now = chrono::Local::now();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut trace_id = String::new();
        let mut span_fields = String::new();
        for span in ctx
            .event_scope()
            .into_iter()
            .flat_map(tracing_subscriber::registry::Scope::from_root)
        {
            let exts = span.extensions();
            let Some(fields) = exts.get::<FormattedFields<N>>() else {
                continue;
            };
            if fields.is_empty() {
                continue;
            }
            if let Some(id) = fields.strip_prefix("trace_id=") {
                write!(trace_id, "@{id}")?;
                continue;
            }
            span_fields.push_str(if span_fields.is_empty() { "{" } else { " " });
            span_fields.push_str(fields);
        }
        if !span_fields.is_empty() {
            span_fields.push('}');
        }
        let origin = format!("{}{}{}", meta.target(), trace_id, span_fields);

        if self.use_colors {
            write!(
                writer,
                "[{} {}] {} {}{}",
                Colored(Color::BrightBlack, now.format("%X%.3f")),
                Colored(level_color(meta.level()), level_label(meta.level())),
                Colored(Color::BrightBlack, format!("{origin}:")),
                visitor.message,
                visitor.fields
            )?;
        } else {
            write!(
                writer,
                "{} [{}] {} {}{}",
                now.format("%F %X%.3f"),
                level_label(meta.level()),
                origin,
                visitor.message,
                visitor.fields
            )?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: String,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            write!(self.fields, " {}={}", field.name(), value).ok();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            write!(self.message, "{:?}", value).ok();
        } else {
            write!(self.fields, " {}={:?}", field.name(), value).ok();
        }
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERR",
        Level::WARN => "WRN",
        Level::INFO => "INF",
        Level::DEBUG => "DBG",
        Level::TRACE => "TRC",
    }
}

fn level_color(level: &Level) -> Color {
    match *level {
        Level::ERROR => Color::BrightRed,
        Level::WARN => Color::BrightYellow,
        Level::INFO => Color::BrightBlue,
        Level::DEBUG => Color::BrightMagenta,
        Level::TRACE => Color::BrightWhite,
    }
}

struct Colored<T>(Color, T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\x1B[{}m{}\x1B[0m", self.0.to_fg_str(), self.1)
    }
}
