use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the file subscriber. Nothing is ever written to the terminal
/// itself, which the alternate screen owns for the whole session.
///
/// The returned guard flushes the writer on drop and must stay alive for
/// the rest of the process.
pub fn init(path: &Path) -> Result<WorkerGuard> {
    let file =
        File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
