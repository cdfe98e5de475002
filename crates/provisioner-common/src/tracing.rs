// Per-component trace sources. Every message goes through the shared
// SecretMasker before it reaches the `tracing` subscriber. Severity
// filtering is left to the subscriber (`RUST_LOG`).

use crate::secret_masker::SecretMasker;
use chrono::{DateTime, Utc};
use provisioner_sdk::TraceWriter;
use std::sync::Arc;

/// Trace event severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEventType {
    Verbose,
    Information,
    Warning,
    Error,
}

impl std::fmt::Display for TraceEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEventType::Verbose => write!(f, "VERB"),
            TraceEventType::Information => write!(f, "INFO"),
            TraceEventType::Warning => write!(f, "WARN"),
            TraceEventType::Error => write!(f, "ERR "),
        }
    }
}

/// Configuration for trace output.
#[derive(Debug, Clone, Default)]
pub struct TraceSetting {
    /// Also echo every line to stdout, timestamped. The subscriber itself
    /// writes to stderr, so the echo is the only log output on stdout.
    pub print_to_stdout: bool,
}

/// A named trace source, e.g. `"TokenClient"` or `"Configurator"`.
///
/// All sources created by one [`TraceManager`] share its `SecretMasker`, so a
/// secret registered after a source was created is still masked by it.
#[derive(Clone)]
pub struct Tracing {
    name: String,
    secret_masker: Arc<SecretMasker>,
    setting: TraceSetting,
}

impl Tracing {
    pub fn new(
        name: impl Into<String>,
        secret_masker: Arc<SecretMasker>,
        setting: TraceSetting,
    ) -> Self {
        Self {
            name: name.into(),
            secret_masker,
            setting,
        }
    }

    fn trace(&self, event_type: TraceEventType, message: &str) {
        let masked = self.secret_masker.mask_secrets(message);
        let component = self.name.as_str();

        match event_type {
            TraceEventType::Error => tracing::error!(component = %component, "{}", masked),
            TraceEventType::Warning => tracing::warn!(component = %component, "{}", masked),
            TraceEventType::Information => tracing::info!(component = %component, "{}", masked),
            TraceEventType::Verbose => tracing::debug!(component = %component, "{}", masked),
        }

        if self.setting.print_to_stdout {
            println!("{}", self.stdout_line(Utc::now(), event_type, &masked));
        }
    }

    fn stdout_line(&self, at: DateTime<Utc>, event_type: TraceEventType, masked: &str) -> String {
        format!(
            "[{}][{}] {}: {}",
            at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.name,
            event_type,
            masked
        )
    }

    /// Log an error together with its full chain of causes.
    pub fn error_chain(&self, err: &anyhow::Error) {
        self.error(&format!("{err}"));
        for cause in err.chain().skip(1) {
            self.error(&format!("  caused by: {cause}"));
        }
    }
}

impl TraceWriter for Tracing {
    fn info(&self, message: &str) {
        self.trace(TraceEventType::Information, message);
    }

    fn verbose(&self, message: &str) {
        self.trace(TraceEventType::Verbose, message);
    }

    fn warning(&self, message: &str) {
        self.trace(TraceEventType::Warning, message);
    }

    fn error(&self, message: &str) {
        self.trace(TraceEventType::Error, message);
    }
}

/// Hands out named trace sources that share one `SecretMasker`.
pub struct TraceManager {
    secret_masker: Arc<SecretMasker>,
    default_setting: TraceSetting,
}

impl TraceManager {
    pub fn new(secret_masker: Arc<SecretMasker>, setting: TraceSetting) -> Self {
        Self {
            secret_masker,
            default_setting: setting,
        }
    }

    /// Get (create) a named trace source.
    pub fn get(&self, name: &str) -> Tracing {
        Tracing::new(name, self.secret_masker.clone(), self.default_setting.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parking_lot::Mutex;
    use std::io;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn capture_with(filter: &str, emit: impl FnOnce()) -> String {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        capture.text()
    }

    #[test]
    fn secret_added_later_is_masked_by_existing_source() {
        let masker = Arc::new(SecretMasker::new());
        let manager = TraceManager::new(masker.clone(), TraceSetting::default());
        let trace = manager.get("TokenClient");
        masker.add_value("late-secret");

        let output = capture_with("info", || trace.info("value is late-secret"));

        assert!(output.contains("value is ***"));
        assert!(output.contains("TokenClient"));
        assert!(!output.contains("late-secret"));
    }

    #[test]
    fn subscriber_filter_decides_verbose_output() {
        let trace = TraceManager::new(Arc::new(SecretMasker::new()), TraceSetting::default())
            .get("Provisioner");

        let quiet = capture_with("info", || {
            trace.verbose("verbose detail");
            trace.info("info line");
        });
        assert!(!quiet.contains("verbose detail"));
        assert!(quiet.contains("info line"));

        let chatty = capture_with("debug", || trace.verbose("verbose detail"));
        assert!(chatty.contains("verbose detail"));
    }

    #[test]
    fn error_chain_logs_every_cause() {
        let trace = TraceManager::new(Arc::new(SecretMasker::new()), TraceSetting::default())
            .get("Provisioner");
        let err = anyhow::anyhow!("root cause").context("outer failure");

        let output = capture_with("info", || trace.error_chain(&err));

        assert!(output.contains("outer failure"));
        assert!(output.contains("caused by: root cause"));
    }

    #[test]
    fn stdout_echo_is_timestamped_and_masked() {
        let masker = Arc::new(SecretMasker::new());
        masker.add_value("abc123");
        let trace = TraceManager::new(masker.clone(), TraceSetting { print_to_stdout: true })
            .get("Configurator");
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

        let line = trace.stdout_line(
            at,
            TraceEventType::Warning,
            &masker.mask_secrets("token abc123"),
        );

        assert_eq!(line, "[2026-10-19T08:30:00.000Z][Configurator] WARN: token ***");
    }
}
