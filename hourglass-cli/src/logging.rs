use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Log to `file` when given (the terminal belongs to ratatui during a session),
/// otherwise to stderr. Hold the returned guard until exit so buffered lines flush.
///
/// `RUST_LOG` overrides `level`.
pub fn init_logging(level: &str, file: Option<&Path>) -> Option<WorkerGuard> {
    let Some(path) = file else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter(level))
            .with_target(false)
            .init();
        return None;
    };

    let dir = path.parent()?;
    let name = path.file_name()?;
    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter(level))
        .with_ansi(false)
        .init();

    Some(guard)
}
