//! Passive request diagnostics.
//!
//! The gateway reports every round trip to an injected observer. Observation
//! is strictly one-way: the gateway never reads anything back, so a failing
//! or absent observer cannot affect control flow.

use std::sync::Mutex;

/// Maximum number of body characters kept in a record
pub const BODY_PREVIEW_LEN: usize = 512;

/// Diagnostic record of one HTTP round trip
#[derive(Debug, Clone)]
pub struct RequestRecord {
    /// Monotonically increasing per-gateway request id
    pub id: u64,
    /// Endpoint path, e.g. `/construction/submit`
    pub endpoint: String,
    /// HTTP status, absent when the request never reached the server
    pub status: Option<u16>,
    /// Wall-clock duration of the round trip
    pub duration_ms: u64,
    /// Response body truncated to [`BODY_PREVIEW_LEN`] characters
    pub body_preview: String,
}

/// Hook receiving one record per request issued by the gateway
pub trait RequestObserver: Send + Sync {
    /// Called after every round trip, successful or not
    fn on_request(&self, record: &RequestRecord);
}

/// In-memory collector, mainly for tests and post-run inspection
#[derive(Debug, Default)]
pub struct RequestLog {
    records: Mutex<Vec<RequestRecord>>,
}

impl RequestLog {
    /// Creates an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<RequestRecord> {
        self.records.lock().expect("request log poisoned").clone()
    }

    /// Number of requests recorded
    pub fn len(&self) -> usize {
        self.records.lock().expect("request log poisoned").len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestObserver for RequestLog {
    fn on_request(&self, record: &RequestRecord) {
        self.records
            .lock()
            .expect("request log poisoned")
            .push(record.clone());
    }
}

/// Truncates a response body for diagnostics
pub(crate) fn body_preview(body: &str) -> String {
    if body.len() <= BODY_PREVIEW_LEN {
        body.to_string()
    } else {
        let mut end = BODY_PREVIEW_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_collects_records() {
        let log = RequestLog::new();
        assert!(log.is_empty());

        log.on_request(&RequestRecord {
            id: 1,
            endpoint: "/network/status".into(),
            status: Some(200),
            duration_ms: 12,
            body_preview: "{}".into(),
        });

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].endpoint, "/network/status");
        assert_eq!(records[0].status, Some(200));
    }

    #[test]
    fn test_body_preview_truncation() {
        let long = "x".repeat(2 * BODY_PREVIEW_LEN);
        let preview = body_preview(&long);
        assert!(preview.chars().count() <= BODY_PREVIEW_LEN + 1);
        assert!(preview.ends_with('…'));

        assert_eq!(body_preview("short"), "short");
    }
}
