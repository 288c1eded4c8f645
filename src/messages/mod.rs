use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// One line in the user-facing message log.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LogEntry {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub logged_at: DateTime<Utc>,
}

/// Append-only sink for messages shown to the user.
pub trait MessageSink: Send + Sync {
    fn add(&self, message: &str, metadata: Option<Value>);
}

/// In-memory message log shared between the UI and camera services.
///
/// Clones share the same backing store. Appends are serialized by a mutex,
/// so concurrent callers never interleave inside an entry.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in append order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop everything shown so far. Only the owner of the log calls this.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl MessageSink for MessageLog {
    fn add(&self, message: &str, metadata: Option<Value>) {
        match &metadata {
            Some(meta) => info!(target: "messages", metadata = %meta, "{}", message),
            None => info!(target: "messages", "{}", message),
        }

        self.entries.lock().push(LogEntry {
            message: message.to_string(),
            metadata,
            logged_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_appends_in_order() {
        let log = MessageLog::new();
        log.add("first", None);
        log.add("second", Some(json!(true)));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[0].metadata, None);
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].metadata, Some(json!(true)));
        assert!(entries[0].logged_at <= entries[1].logged_at);
    }

    #[test]
    fn clones_share_storage() {
        let log = MessageLog::new();
        let cloned = log.clone();
        cloned.add("from clone", None);

        assert_eq!(log.messages(), vec!["from clone".to_string()]);
    }

    #[test]
    fn clear_empties_log() {
        let log = MessageLog::new();
        log.add("x", None);
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let log = MessageLog::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        log.add(&format!("t{i}-{j}"), None);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(log.len(), 800);
    }

    #[test]
    fn metadata_is_omitted_when_absent() {
        let log = MessageLog::new();
        log.add("plain", None);
        let json = serde_json::to_value(&log.entries()[0]).unwrap();
        assert!(json.get("metadata").is_none());
        assert_eq!(json["message"], "plain");
    }
}
