/// Lightweight diagnostic sink used by the SDK layer.
///
/// The SDK never talks to a logging backend directly: callers hand in a
/// `TraceWriter`, and the common layer supplies one that masks secrets and
/// forwards to `tracing`.
pub trait TraceWriter: Send + Sync {
    fn info(&self, message: &str);

    fn verbose(&self, message: &str);

    fn warning(&self, message: &str) {
        self.info(message);
    }

    fn error(&self, message: &str) {
        self.info(message);
    }
}

/// The level of a collected trace message.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceLevel {
    Info,
    Verbose,
    Warning,
    Error,
}

/// A trace writer that keeps every message in memory so tests can assert
/// on what a component reported.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectingTraceWriter {
    messages: parking_lot::Mutex<Vec<(TraceLevel, String)>>,
}

#[cfg(test)]
impl CollectingTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all collected messages.
    pub fn messages(&self) -> Vec<(TraceLevel, String)> {
        self.messages.lock().clone()
    }

    /// Whether any message at any level contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }

    fn push(&self, level: TraceLevel, message: &str) {
        self.messages.lock().push((level, message.to_string()));
    }
}

#[cfg(test)]
impl TraceWriter for CollectingTraceWriter {
    fn info(&self, message: &str) {
        self.push(TraceLevel::Info, message);
    }

    fn verbose(&self, message: &str) {
        self.push(TraceLevel::Verbose, message);
    }

    fn warning(&self, message: &str) {
        self.push(TraceLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(TraceLevel::Error, message);
    }
}
