use crate::logging::format::Formatter;
use anyhow::Context;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::Layer;
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

mod format;

const CRATE_TARGET: &str = "pingd";

fn accepts(metadata: &tracing::Metadata<'_>, level: Level) -> bool {
    metadata.target().starts_with(CRATE_TARGET) && metadata.level() <= &level
}

/// Installs the global subscriber. Events go to stdout, or to
/// `<dir>/pingd.log` when a log directory is configured.
pub fn registry_logs(level: Level, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let layer = match dir {
        Some(dir) => {
            let path = dir.join("pingd.log");
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file '{path:?}'"))?;
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .event_format(Formatter::new(false))
                .with_writer(Mutex::new(file))
                .with_filter(filter::filter_fn(move |metadata| accepts(metadata, level)))
                .boxed()
        }
        None => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .event_format(Formatter::new(true))
            .with_filter(filter::filter_fn(move |metadata| accepts(metadata, level)))
            .boxed(),
    };
    tracing_subscriber::registry()
        .with(layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
