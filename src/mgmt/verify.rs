//! Asynchronous extension script verification.
//!
//! Verification pings the script URL and reports the HTTP status code back
//! to the caller. Checks run on a worker thread so the UI never blocks on a
//! slow endpoint; results carry the request token they were issued with so
//! stale answers can be recognized.

use std::sync::Arc;
use std::thread;

use tracing::debug;

/// Result of one verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyResult {
    pub token: u64,
    pub status: u16,
}

/// Pings an extension script and reports the HTTP status.
pub trait ScriptCheck: Send + Sync {
    fn status_of(&self, script: &str) -> u16;
}

/// Demo classification by script path: moved scripts redirect, removed
/// scripts 404, broken backends 500.
#[derive(Debug, Default)]
pub struct DemoScriptCheck;

impl ScriptCheck for DemoScriptCheck {
    fn status_of(&self, script: &str) -> u16 {
        if script.contains("missing") {
            404
        } else if script.contains("boom") {
            500
        } else if script.contains("moved") {
            301
        } else if script.ends_with(".js") {
            200
        } else {
            404
        }
    }
}

/// Runs script checks off the UI thread.
pub struct ScriptVerifier {
    check: Arc<dyn ScriptCheck>,
}

impl ScriptVerifier {
    pub fn new(check: Arc<dyn ScriptCheck>) -> Self {
        Self { check }
    }

    /// Fires a verification; `done` is called from a worker thread.
    pub fn verify<F>(&self, token: u64, script: String, done: F)
    where
        F: FnOnce(VerifyResult) + Send + 'static,
    {
        let check = Arc::clone(&self.check);
        thread::spawn(move || {
            debug!(token, script = %script, "verifying extension script");
            let status = check.status_of(&script);
            done(VerifyResult { token, status });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_demo_check_classification() {
        let check = DemoScriptCheck;
        assert_eq!(check.status_of("https://acme.example/log-viewer.js"), 200);
        assert_eq!(check.status_of("https://acme.example/metrics-moved.js"), 301);
        assert_eq!(check.status_of("https://acme.example/missing.js"), 404);
        assert_eq!(check.status_of("https://acme.example/boom.js"), 500);
        assert_eq!(check.status_of("https://acme.example/readme.txt"), 404);
    }

    #[test]
    fn test_verify_reports_on_worker_thread() {
        let verifier = ScriptVerifier::new(Arc::new(DemoScriptCheck));
        let (tx, rx) = mpsc::channel();
        verifier.verify(7, "https://acme.example/log-viewer.js".to_string(), move |result| {
            tx.send(result).unwrap();
        });
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result, VerifyResult { token: 7, status: 200 });
    }
}
