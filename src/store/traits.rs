//! `SettingsStore` trait — the async interface the controller persists through.
//!
//! Mirrors browser-origin key-value storage: synchronous-feeling get/set/remove
//! of a JSON value under a string key, scoped per user.

use async_trait::async_trait;

use crate::error::DatabaseError;

/// Backend-agnostic settings storage keyed by `(user_id, key)`.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting value. `None` when the key has never been written.
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError>;

    /// Write (or overwrite) a setting value.
    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError>;

    /// Delete a setting. Returns whether a row was actually removed.
    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError>;
}
