//! Opt-in subscriber for the crate's `tracing` spans.
//!
//! Conversion code only emits spans and events; a host decides where they go.
//! With the `trace` feature off, `init_tracing` does nothing and returns `Ok`.

use std::path::Path;

/// Environment variable holding an `EnvFilter` directive, e.g. `kana_core=trace`.
pub const FILTER_ENV: &str = "KANA_LOG";

#[cfg_attr(not(feature = "trace"), allow(dead_code))]
const DEFAULT_FILTER: &str = "kana_core=debug";
#[cfg_attr(not(feature = "trace"), allow(dead_code))]
const LOG_FILE: &str = "kana-trace.jsonl";

#[derive(Debug, Clone, Copy)]
pub enum TraceOutput<'a> {
    /// JSON lines appended to `<dir>/kana-trace.jsonl` through a background writer.
    JsonFile(&'a Path),
    /// Human-readable lines on stderr, for tools and debugging sessions.
    Stderr,
}

#[derive(Debug, thiserror::Error)]
pub enum TraceInitError {
    #[error("a global tracing subscriber is already installed")]
    AlreadySet,
}

#[cfg(feature = "trace")]
pub fn init_tracing(output: TraceOutput<'_>) -> Result<(), TraceInitError> {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(filter);

    match output {
        TraceOutput::JsonFile(dir) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));
            builder
                .json()
                .with_writer(writer)
                .try_init()
                .map_err(|_| TraceInitError::AlreadySet)?;
            // The writer flushes on drop; an installed subscriber lives for the process.
            std::mem::forget(guard);
        }
        TraceOutput::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|_| TraceInitError::AlreadySet)?,
    }
    Ok(())
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_output: TraceOutput<'_>) -> Result<(), TraceInitError> {
    Ok(())
}
