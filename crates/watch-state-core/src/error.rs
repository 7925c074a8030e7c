use thiserror::Error;

/// Failures at the durable-storage boundary.
///
/// Only writes carry an error type: reads fall back to an empty collection
/// with a diagnostic and never fail the caller. Write failures are logged
/// and dropped by the task that spawned them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write record {record}: {source}")]
    Write {
        record: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record {record}: {source}")]
    Serialize {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
