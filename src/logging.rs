//! Logging setup.
//!
//! The crate never installs a global subscriber. Instead a [`Logger`] is
//! built once at startup and handed to every component that logs (tool set,
//! reformulator, runtime, HTTP server). Each invocation runs inside a request
//! scope: a span carrying `session_id` and `request_id`, attached to the
//! logger's dispatcher with [`WithSubscriber`].
//!
//! [`Logger::new`] also returns a [`LogGuard`]; keep it alive until exit so
//! buffered file output is flushed.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument, Span, info, info_span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use uuid::Uuid;

use crate::error::ConfigError;

/// Default filter directive.
const DEFAULT_FILTER: &str = "info";

/// Default filter with `-v`.
const VERBOSE_FILTER: &str = "debug";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                key: "log format".to_string(),
                message: format!("'{other}' (expected text or json)"),
            }),
        }
    }
}

/// Log sink configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `faq_agent=debug`.
    pub filter: String,
    /// Line format.
    pub format: LogFormat,
    /// Append to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

impl LogConfig {
    /// Reads `FAQ_AGENT_LOG` (falling back to `RUST_LOG`),
    /// `FAQ_AGENT_LOG_FORMAT` and `FAQ_AGENT_LOG_FILE`.
    ///
    /// `verbose` lowers the default filter to `debug`; an explicit filter
    /// in either variable still wins.
    pub fn from_env(verbose: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), verbose)
    }

    /// [`LogConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, verbose: bool) -> Result<Self, ConfigError> {
        let filter = lookup("FAQ_AGENT_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }.to_string());
        let format = match lookup("FAQ_AGENT_LOG_FORMAT") {
            Some(v) => LogFormat::parse(&v)?,
            None => LogFormat::Text,
        };
        let file = lookup("FAQ_AGENT_LOG_FILE").map(PathBuf::from);
        Ok(Self {
            filter,
            format,
            file,
        })
    }
}

/// Keeps the non-blocking file writer alive; dropping it flushes
/// pending lines.
#[must_use = "dropping the guard flushes and detaches the log file"]
pub struct LogGuard {
    worker: Option<WorkerGuard>,
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard")
            .field("file", &self.worker.is_some())
            .finish()
    }
}

/// Opens `path` for appending without rotation.
fn file_appender(path: &Path) -> Result<RollingFileAppender, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "log file".to_string(),
        message: format!("{}: {message}", path.display()),
    };
    let name = path
        .file_name()
        .ok_or_else(|| invalid("not a file path".to_string()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| invalid(e.to_string()))
}

/// Correlation identifiers for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIds {
    /// Conversation session id (reused across turns when supplied).
    pub session_id: String,
    /// Unique id of this request.
    pub request_id: String,
}

impl RequestIds {
    /// Keeps `session_id` when given, otherwise generates one; always
    /// generates a fresh request id.
    #[must_use]
    pub fn new(session_id: Option<&str>) -> Self {
        Self {
            session_id: session_id.map_or_else(|| Uuid::new_v4().to_string(), str::to_string),
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Summary of one completed invocation, written to the log sink.
#[derive(Debug, Clone)]
pub struct InvocationTrace<'a> {
    /// Correlation ids.
    pub ids: &'a RequestIds,
    /// User utterance.
    pub query: &'a str,
    /// Names of the tools called, in call order.
    pub tool_calls: Vec<&'a str>,
    /// Final answer text.
    pub response: &'a str,
}

/// Explicitly constructed logger handle.
///
/// Cloning is cheap; all clones write to the same sink.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Logger {
    /// Builds a logger from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a bad filter directive or
    /// an unwritable log file.
    pub fn new(config: &LogConfig) -> Result<(Self, LogGuard), ConfigError> {
        let filter = EnvFilter::try_new(&config.filter).map_err(|e| ConfigError::InvalidValue {
            key: "log filter".to_string(),
            message: e.to_string(),
        })?;

        let (writer, worker, ansi) = match &config.file {
            Some(path) => {
                let (writer, worker) = tracing_appender::non_blocking(file_appender(path)?);
                (BoxMakeWriter::new(writer), Some(worker), false)
            }
            None => (BoxMakeWriter::new(std::io::stderr), None, true),
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(false);

        let dispatch = match config.format {
            LogFormat::Text => Dispatch::new(builder.finish()),
            LogFormat::Json => Dispatch::new(builder.json().finish()),
        };

        Ok((Self { dispatch }, LogGuard { worker }))
    }

    /// Wraps an existing subscriber.
    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: tracing::Subscriber + Send + Sync + 'static,
    {
        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// A logger that discards everything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// The underlying dispatcher.
    #[must_use]
    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Runs `f` with this logger as the thread's default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Attaches this logger to a future without any request span.
    pub fn attach<F: Future>(&self, fut: F) -> impl Future<Output = F::Output> {
        fut.with_subscriber(self.dispatch.clone())
    }

    /// Creates the per-request span.
    #[must_use]
    pub fn request_span(&self, ids: &RequestIds) -> Span {
        self.in_scope(|| {
            info_span!(
                "invocation",
                session_id = %ids.session_id,
                request_id = %ids.request_id
            )
        })
    }

    /// Runs `fut` inside a request scope for `ids`.
    pub fn scope<F: Future>(&self, ids: &RequestIds, fut: F) -> impl Future<Output = F::Output> {
        fut.instrument(self.request_span(ids))
            .with_subscriber(self.dispatch.clone())
    }

    /// Writes the invocation trace record.
    pub fn record_trace(&self, trace: &InvocationTrace<'_>) {
        self.in_scope(|| {
            info!(
                session_id = %trace.ids.session_id,
                request_id = %trace.ids.request_id,
                query = trace.query,
                tool_calls = ?trace.tool_calls,
                tool_call_count = trace.tool_calls.len(),
                response = trace.response,
                "invocation complete"
            );
        });
    }
}

/// In-memory log capture for tests.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod capture {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::EnvFilter;

    use super::Logger;

    #[derive(Clone, Default)]
    pub struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        pub fn contents(&self) -> String {
            let bytes = self.inner.lock().unwrap().clone();
            String::from_utf8(bytes).unwrap()
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for BufferWriter {
        type Writer = BufferGuard;

        fn make_writer(&'a self) -> Self::Writer {
            BufferGuard {
                inner: self.inner.clone(),
            }
        }
    }

    pub struct BufferGuard {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl Write for BufferGuard {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.inner.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// A logger writing plain text into a shared buffer.
    pub fn logger() -> (Logger, BufferWriter) {
        let writer = BufferWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_ansi(false)
            .without_time()
            .with_writer(writer.clone())
            .finish();
        (Logger::from_subscriber(subscriber), writer)
    }
}
