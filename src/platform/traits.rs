//! Capability traits for host facilities, mockable in tests

use anyhow::Result;
use async_trait::async_trait;

/// Persistent key-value storage for form snapshots
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Store a serialized payload under a key
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Read the payload stored under a key, if any
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Remove the payload stored under a key
    fn remove(&self, key: &str) -> Result<()>;
}

/// Clipboard write access; the single suspending step of the export pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Pass/fail notification surface
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn success(&mut self, message: &str);
    fn failure(&mut self, message: &str);
}
