use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialise logging at `info`, or at `debug` when enabled in the settings
/// file. Only with debug logging enabled may `RUST_LOG` override the level.
///
/// When `log_file` is set, output is also written to that file. Keep the
/// returned guard alive for as long as the file should receive output.
pub fn init(debug: bool, log_file: Option<&str>) -> Option<WorkerGuard> {
    // Without debug logging the level is pinned so a stray `RUST_LOG` in the
    // user's environment cannot turn on verbose output.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let (file_layer, guard) = match log_file.map(Path::new) {
        Some(path) => match path.file_name() {
            Some(name) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let appender = tracing_appender::rolling::never(dir, name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().with_writer(writer).with_ansi(false)),
                    Some(guard),
                )
            }
            None => (None, None),
        },
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init();
    guard
}
