use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Without `trace_dir`, human-readable events at `warn` (or `RUST_LOG`) go
/// to stderr. With it, JSON lines at `znak_core=debug` are appended to
/// `signtool-trace.jsonl` in that directory. Keep the returned guard alive
/// until exit so buffered lines are flushed.
pub fn init_tracing(trace_dir: Option<&Path>) -> Option<WorkerGuard> {
    match trace_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "signtool-trace.jsonl");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("znak_core=debug,znak_cli=debug")),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .init();
            None
        }
    }
}
