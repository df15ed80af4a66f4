use chrono::Utc;
use serde_json::json;

/// JSON-lines logger bound to one request id.
///
/// Everything goes to stderr so the proposed document on stdout stays clean.
#[derive(Clone, Debug)]
pub struct Logger {
    rid: u64,
    verbose: bool,
}

impl Logger {
    /// Creates a new `Logger` with info output enabled.
    ///
    /// # Panics
    ///
    /// Panics if `rid` is zero.
    #[must_use]
    pub fn new(rid: u64) -> Self {
        assert!(rid > 0, "Logger rid must be non-zero");
        Self { rid, verbose: true }
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn rid(&self) -> u64 {
        self.rid
    }

    pub fn info(&self, subsystem: &str, action: &str, message: &str) {
        if self.verbose {
            self.emit("info", subsystem, action, message);
        }
    }

    pub fn error(&self, subsystem: &str, action: &str, message: &str) {
        self.emit("error", subsystem, action, message);
    }

    fn emit(&self, level: &str, subsystem: &str, action: &str, message: &str) {
        let log_entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "level": level,
            "rid": self.rid,
            "subsystem": subsystem,
            "action": action,
            "msg": message,
        });
        eprintln!("{log_entry}");
    }
}
