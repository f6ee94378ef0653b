//! A logger that keeps every message for later assertions

use assetio_manager_api::{LoggerInterface, Severity};
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message logged so far, in order
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().clone()
    }

    /// Messages logged at exactly `severity`
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(logged, _)| *logged == severity)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl LoggerInterface for RecordingLogger {
    fn log(&self, severity: Severity, message: &str) {
        self.entries.lock().push((severity, message.to_string()));
    }
}
