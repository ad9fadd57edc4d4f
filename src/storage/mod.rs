//! Namespaced key-value persistence with retry, quota checks, corruption
//! detection and import/export.
//!
//! # Overview
//!
//! [`SafeStorage`] is a cheap-to-clone handle over a [`StorageBackend`]. The
//! composition root builds one and passes it to whoever needs persistence.
//! Every value is wrapped in a [`StoredRecord`] envelope and written under
//! `namespace + key`; listing, clearing and export only touch keys in that
//! namespace.
//!
//! Every failure is classified into an [`AppError`] and logged with
//! [`log_error`] before being returned.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use social_hub_core::storage::{MemoryBackend, SafeStorage, StorageSettings};
//!
//! # tokio_test::block_on(async {
//! let storage = SafeStorage::new(Arc::new(MemoryBackend::new()), StorageSettings::default());
//! storage.save("k", &serde_json::json!({ "a": 1 })).await.unwrap();
//! let loaded: serde_json::Value = storage.load_or("k", serde_json::Value::Null).await.unwrap();
//! assert_eq!(loaded["a"], 1);
//! # });
//! ```

mod backend;
mod envelope;
mod memory;
mod retry;
mod sqlite;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use backend::{BackendError, BackendErrorKind, StorageBackend};
pub use envelope::{ENVELOPE_VERSION, StoredRecord, record_age};
pub use memory::MemoryBackend;
pub use retry::{
    Backoff, DEFAULT_MAX_ATTEMPTS, FailureType, RetryDecision, RetryFailure, RetryPolicy,
};
pub use sqlite::SqliteBackend;

use crate::clock::now_millis;
use crate::failure::{AppError, ErrorContext, ErrorDetails, ErrorKind, create_error, log_error};

/// Default key prefix.
pub const DEFAULT_NAMESPACE: &str = "social_hub_";

/// Default assumed capacity (5 MiB).
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Default age after which a loaded record is flagged as stale (30 days).
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(30 * 24 * 60 * 60);

const COMPONENT: &str = "SafeStorage";

/// Tunables for a [`SafeStorage`] handle.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub namespace: String,
    pub quota_bytes: usize,
    pub freshness: Duration,
    pub retry: RetryPolicy,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            quota_bytes: DEFAULT_QUOTA_BYTES,
            freshness: DEFAULT_FRESHNESS,
            retry: RetryPolicy::default(),
        }
    }
}

impl StorageSettings {
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_quota_bytes(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    #[must_use]
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Usage of the namespace, in bytes of `key + value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    pub used: usize,
    /// `total - used`, floored at zero.
    pub available: usize,
    pub total: usize,
    /// Unprefixed keys, sorted.
    pub keys: Vec<String>,
}

/// Why one write attempt did not stick.
#[derive(Debug, Error)]
enum WriteFailure {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("write verification failed for key '{0}'")]
    Unverified(String),
}

impl WriteFailure {
    fn failure_type(&self) -> FailureType {
        match self {
            Self::Backend(error) => error.kind.failure_type(),
            Self::Unverified(_) => FailureType::Transient,
        }
    }
}

/// Handle to the namespaced store. Clones share the same backend.
#[derive(Clone)]
pub struct SafeStorage {
    backend: Arc<dyn StorageBackend>,
    settings: Arc<StorageSettings>,
}

impl fmt::Debug for SafeStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeStorage")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SafeStorage {
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>, settings: StorageSettings) -> Self {
        Self {
            backend,
            settings: Arc::new(settings),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &StorageSettings {
        &self.settings
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.settings.namespace)
    }

    fn context(&self, action: &str, data: Value) -> ErrorContext {
        ErrorContext::new(COMPONENT, action).with_data(data)
    }

    /// Logs `error` and hands it back for returning.
    fn fail(error: AppError) -> AppError {
        log_error(&error);
        error
    }

    /// Serializes `data` into an envelope and writes it under `key`, retrying
    /// per the handle's configured [`RetryPolicy`].
    ///
    /// # Errors
    ///
    /// Same as [`save_with`](Self::save_with).
    pub async fn save<T>(&self, key: &str, data: &T) -> Result<(), AppError>
    where
        T: Serialize + ?Sized,
    {
        self.save_with(key, data, &self.settings.retry).await
    }

    /// Serializes `data` into an envelope and writes it under `key`.
    ///
    /// Data serializing to `null` is rejected before any write. A write
    /// that would exceed the quota fails immediately; other failed or
    /// unverified writes are retried per `policy`, which overrides the
    /// handle's default for this call only.
    ///
    /// # Errors
    ///
    /// - `FORM_INVALID_INPUT` for `null`/unserializable data
    /// - `STORAGE_QUOTA_EXCEEDED` when the envelope does not fit
    /// - `STORAGE_SAVE_FAILED` once retries are exhausted (last error as cause)
    #[instrument(skip(self, data, policy), fields(max_attempts = policy.max_attempts()))]
    pub async fn save_with<T>(
        &self,
        key: &str,
        data: &T,
        policy: &RetryPolicy,
    ) -> Result<(), AppError>
    where
        T: Serialize + ?Sized,
    {
        let value = match serde_json::to_value(data) {
            Ok(Value::Null) => {
                return Err(Self::fail(create_error(
                    ErrorKind::FormInvalidInput,
                    Some(
                        ErrorDetails::new()
                            .field(key)
                            .message("Cannot save undefined data"),
                    ),
                    Some(self.context("save", json!({ "key": key }))),
                )));
            }
            Ok(value) => value,
            Err(error) => {
                return Err(Self::fail(
                    create_error(
                        ErrorKind::FormInvalidInput,
                        Some(ErrorDetails::new().field(key)),
                        Some(self.context("save", json!({ "key": key }))),
                    )
                    .with_cause(error),
                ));
            }
        };

        let serialized = serde_json::to_string(&StoredRecord::new(value)).map_err(|error| {
            Self::fail(
                create_error(
                    ErrorKind::StorageSaveFailed,
                    Some(ErrorDetails::new().key(key)),
                    Some(self.context("save", json!({ "key": key }))),
                )
                .with_cause(error),
            )
        })?;

        let info = self.get_storage_info().await?;
        if serialized.len() > info.available {
            return Err(Self::fail(create_error(
                ErrorKind::StorageQuotaExceeded,
                Some(
                    ErrorDetails::new()
                        .key(key)
                        .with("required", serialized.len())
                        .with("available", info.available)
                        .with("used", info.used),
                ),
                Some(self.context(
                    "save",
                    json!({ "key": key, "required": serialized.len(), "available": info.available }),
                )),
            )));
        }

        let full_key = self.full_key(key);
        let outcome = policy
            .run(
                |attempt| {
                    let full_key = full_key.clone();
                    let serialized = serialized.clone();
                    async move {
                        debug!(attempt, key = %full_key, "writing record");
                        self.write_verified(&full_key, &serialized).await
                    }
                },
                WriteFailure::failure_type,
            )
            .await;

        match outcome {
            Ok(()) => Ok(()),
            Err(failure) => {
                let context = self.context(
                    "save",
                    json!({ "key": key, "attempts": failure.attempts }),
                );
                let kind = match &failure.error {
                    WriteFailure::Backend(error) if error.is_quota_exceeded() => {
                        ErrorKind::StorageQuotaExceeded
                    }
                    _ => ErrorKind::StorageSaveFailed,
                };
                Err(Self::fail(
                    create_error(kind, Some(ErrorDetails::new().key(key)), Some(context))
                        .with_cause(failure.error),
                ))
            }
        }
    }

    async fn write_verified(&self, full_key: &str, serialized: &str) -> Result<(), WriteFailure> {
        self.backend.set(full_key, serialized).await?;
        match self.backend.get(full_key).await? {
            Some(stored) if stored == serialized => Ok(()),
            _ => Err(WriteFailure::Unverified(full_key.to_string())),
        }
    }

    /// Reads and unwraps the record under `key`; `Ok(None)` if absent or
    /// stored as an empty string.
    ///
    /// Records older than the freshness window are returned normally and
    /// flagged with a warning.
    ///
    /// # Errors
    ///
    /// - `STORAGE_CORRUPTED_DATA` when the stored text is not JSON (the key
    ///   is deleted) or has no `data` field (the key is kept)
    /// - `STORAGE_LOAD_FAILED` when the backend fails or `data` does not
    ///   deserialize into `T`
    #[instrument(skip(self))]
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let full_key = self.full_key(key);
        let raw = match self.backend.get(&full_key).await {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Ok(None),
            Err(error) => return Err(self.load_failed(key, error)),
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(parse_error) => {
                if let Err(error) = self.backend.remove(&full_key).await {
                    warn!(key, error = %error, "could not delete corrupted record");
                }
                return Err(Self::fail(
                    create_error(
                        ErrorKind::StorageCorruptedData,
                        Some(
                            ErrorDetails::new()
                                .key(key)
                                .message("JSON parse error - data removed"),
                        ),
                        Some(self.context("load", json!({ "key": key, "removed": true }))),
                    )
                    .with_cause(parse_error),
                ));
            }
        };

        let Value::Object(mut record) = parsed else {
            return Err(self.invalid_structure(key));
        };
        let Some(data) = record.remove("data") else {
            return Err(self.invalid_structure(key));
        };

        if let Some(timestamp) = record.get("timestamp").and_then(Value::as_u64) {
            let age = record_age(timestamp, now_millis());
            if age > self.settings.freshness {
                warn!(
                    key,
                    age_days = age.as_secs() / 86_400,
                    "stored record is older than the freshness window, consider refreshing"
                );
            }
        }

        serde_json::from_value(data)
            .map(Some)
            .map_err(|error| self.load_failed(key, error))
    }

    /// [`load`](Self::load), substituting `default` for a missing key.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub async fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, AppError> {
        Ok(self.load(key).await?.unwrap_or(default))
    }

    fn load_failed<E>(&self, key: &str, cause: E) -> AppError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::fail(
            create_error(
                ErrorKind::StorageLoadFailed,
                Some(ErrorDetails::new().key(key)),
                Some(self.context("load", json!({ "key": key }))),
            )
            .with_cause(cause),
        )
    }

    fn invalid_structure(&self, key: &str) -> AppError {
        Self::fail(create_error(
            ErrorKind::StorageCorruptedData,
            Some(
                ErrorDetails::new()
                    .key(key)
                    .message("Invalid data structure"),
            ),
            Some(self.context("load", json!({ "key": key }))),
        ))
    }

    /// Deletes `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure.
    #[instrument(skip(self))]
    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.backend
            .remove(&self.full_key(key))
            .await
            .map_err(|error| self.classified(error, "remove", json!({ "key": key })))
    }

    /// Deletes every key in the namespace; foreign keys are untouched.
    /// Returns how many keys were removed.
    ///
    /// # Errors
    ///
    /// Returns the classified backend failure; keys removed before it stay
    /// removed.
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<usize, AppError> {
        let keys = self.namespaced_keys("clearAll").await?;
        for key in &keys {
            self.backend
                .remove(key)
                .await
                .map_err(|error| self.classified(error, "clearAll", json!({ "key": key })))?;
        }
        debug!(count = keys.len(), "namespace cleared");
        Ok(keys.len())
    }

    /// Sums `key + value` byte lengths over the namespace.
    ///
    /// # Errors
    ///
    /// Returns `STORAGE_LOAD_FAILED` if the backend cannot be enumerated.
    pub async fn get_storage_info(&self) -> Result<StorageInfo, AppError> {
        let full_keys = self.namespaced_keys("getStorageInfo").await?;
        let mut used = 0;
        let mut keys = Vec::with_capacity(full_keys.len());
        for full_key in full_keys {
            let value = self.backend.get(&full_key).await.map_err(|error| {
                Self::fail(
                    create_error(
                        ErrorKind::StorageLoadFailed,
                        None,
                        Some(self.context("getStorageInfo", json!({ "key": full_key }))),
                    )
                    .with_cause(error),
                )
            })?;
            if let Some(value) = value {
                used += full_key.len() + value.len();
            }
            keys.push(self.strip_namespace(&full_key).to_string());
        }
        let total = self.settings.quota_bytes;
        Ok(StorageInfo {
            used,
            available: total.saturating_sub(used),
            total,
            keys,
        })
    }

    /// Dumps the namespace as unprefixed key → parsed value.
    ///
    /// Values that are not JSON are exported as raw strings. Backend
    /// failures are logged and the affected entries skipped.
    #[instrument(skip(self))]
    pub async fn export_data(&self) -> BTreeMap<String, Value> {
        let mut exported = BTreeMap::new();
        let keys = match self.namespaced_keys("exportData").await {
            Ok(keys) => keys,
            Err(_) => return exported,
        };
        for full_key in keys {
            match self.backend.get(&full_key).await {
                Ok(Some(raw)) => {
                    let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                    exported.insert(self.strip_namespace(&full_key).to_string(), value);
                }
                Ok(None) => {}
                Err(error) => {
                    self.classified(error, "exportData", json!({ "key": full_key }));
                }
            }
        }
        exported
    }

    /// Saves every entry of `data`. An entry that is an envelope (object with
    /// a non-null `data` field) is unwrapped first.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failed save.
    #[instrument(skip(self, data), fields(entries = data.len()))]
    pub async fn import_data(&self, data: &BTreeMap<String, Value>) -> Result<(), AppError> {
        for (key, value) in data {
            let payload = match value.get("data") {
                Some(inner) if !inner.is_null() => inner,
                _ => value,
            };
            self.save(key, payload).await?;
        }
        Ok(())
    }

    async fn namespaced_keys(&self, action: &str) -> Result<Vec<String>, AppError> {
        let keys = self.backend.keys().await.map_err(|error| {
            Self::fail(
                create_error(
                    ErrorKind::StorageLoadFailed,
                    None,
                    Some(self.context(action, Value::Null)),
                )
                .with_cause(error),
            )
        })?;
        Ok(keys
            .into_iter()
            .filter(|key| key.starts_with(&self.settings.namespace))
            .collect())
    }

    fn strip_namespace<'a>(&self, full_key: &'a str) -> &'a str {
        full_key
            .strip_prefix(&self.settings.namespace)
            .unwrap_or(full_key)
    }

    fn classified(&self, error: BackendError, action: &str, data: Value) -> AppError {
        Self::fail(crate::failure::classify(
            error,
            Some(self.context(action, data)),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::registry::LookupSpan;

    #[derive(Debug)]
    struct CapturedEvent {
        level: Level,
        fields: HashMap<String, String>,
    }

    #[derive(Default)]
    struct EventFieldVisitor {
        fields: HashMap<String, String>,
    }

    impl Visit for EventFieldVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.fields
                .insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    struct EventCaptureLayer {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    impl<S> Layer<S> for EventCaptureLayer
    where
        S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = EventFieldVisitor::default();
            event.record(&mut visitor);
            self.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                fields: visitor.fields,
            });
        }
    }

    fn storage() -> (Arc<MemoryBackend>, SafeStorage) {
        let backend = Arc::new(MemoryBackend::new());
        let storage = SafeStorage::new(backend.clone(), StorageSettings::default());
        (backend, storage)
    }

    // ==================== save / load ====================

    #[tokio::test]
    async fn test_save_writes_namespaced_envelope() {
        let (backend, storage) = storage();
        storage.save("k", &json!({ "a": 1 })).await.unwrap();

        let raw = backend.get("social_hub_k").await.unwrap().unwrap();
        let record: StoredRecord<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.data, json!({ "a": 1 }));
        assert_eq!(record.version, ENVELOPE_VERSION);
    }

    #[tokio::test]
    async fn test_save_rejects_null() {
        let (backend, storage) = storage();
        let err = storage.save("k", &Option::<u8>::None).await.unwrap_err();
        assert_eq!(err.code(), ErrorKind::FormInvalidInput);
        assert_eq!(err.details(), Some("Invalid value for \"k\""));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_load_typed() {
        #[derive(Debug, PartialEq, Serialize, serde::Deserialize)]
        struct Prefs {
            theme: String,
        }
        let (_, storage) = storage();
        let prefs = Prefs {
            theme: "dark".into(),
        };
        storage.save("prefs", &prefs).await.unwrap();
        assert_eq!(storage.load::<Prefs>("prefs").await.unwrap(), Some(prefs));
    }

    #[tokio::test]
    async fn test_load_type_mismatch_is_load_failed() {
        let (backend, storage) = storage();
        storage.save("n", &"text").await.unwrap();
        let err = storage.load::<u32>("n").await.unwrap_err();
        assert_eq!(err.code(), ErrorKind::StorageLoadFailed);
        assert!(err.cause().is_some());
        assert!(backend.get("social_hub_n").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_load_missing_data_field_keeps_key() {
        let (backend, storage) = storage();
        backend
            .set("social_hub_k", r#"{"timestamp":1,"version":"1.0"}"#)
            .await
            .unwrap();
        let err = storage.load::<Value>("k").await.unwrap_err();
        assert_eq!(err.code(), ErrorKind::StorageCorruptedData);
        assert!(backend.get("social_hub_k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_load_empty_string_is_absent() {
        let (backend, storage) = storage();
        backend.set("social_hub_k", "").await.unwrap();

        assert!(storage.load::<String>("k").await.unwrap().is_none());
        assert_eq!(
            storage.load_or("k", "dflt".to_string()).await.unwrap(),
            "dflt"
        );
        assert_eq!(
            backend.get("social_hub_k").await.unwrap().as_deref(),
            Some("")
        );
    }

    #[tokio::test]
    async fn test_load_stale_record_still_returned_with_warning() {
        let (backend, storage) = storage();
        backend
            .set("social_hub_old", r#"{"data":7,"timestamp":1,"version":"1.0"}"#)
            .await
            .unwrap();
        storage.save("fresh", &8).await.unwrap();

        let events = Arc::new(Mutex::new(Vec::<CapturedEvent>::new()));
        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::filter::LevelFilter::WARN)
            .with(EventCaptureLayer {
                events: Arc::clone(&events),
            });
        let guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();

        assert_eq!(storage.load::<u32>("old").await.unwrap(), Some(7));
        assert_eq!(storage.load::<u32>("fresh").await.unwrap(), Some(8));
        drop(guard);

        let events = events.lock().unwrap();
        let stale: Vec<_> = events
            .iter()
            .filter(|event| {
                event
                    .fields
                    .get("message")
                    .is_some_and(|message| message.contains("older than the freshness window"))
            })
            .collect();
        assert_eq!(stale.len(), 1, "captured events: {events:?}");
        assert_eq!(stale[0].fields.get("key").map(String::as_str), Some("old"));
        assert_eq!(stale[0].level, tracing::Level::WARN);
    }

    // ==================== quota ====================

    #[tokio::test]
    async fn test_save_quota_exceeded_before_write() {
        let backend = Arc::new(MemoryBackend::new());
        let storage = SafeStorage::new(
            backend.clone(),
            StorageSettings::default().with_quota_bytes(64),
        );
        let err = storage.save("big", &"x".repeat(100)).await.unwrap_err();
        assert_eq!(err.code(), ErrorKind::StorageQuotaExceeded);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_storage_info_counts_namespace_only() {
        let (backend, storage) = storage();
        backend.set("foreign", "zzzz").await.unwrap();
        storage.save("a", &1).await.unwrap();

        let raw = backend.get("social_hub_a").await.unwrap().unwrap();
        let info = storage.get_storage_info().await.unwrap();
        assert_eq!(info.keys, vec!["a"]);
        assert_eq!(info.used, "social_hub_a".len() + raw.len());
        assert_eq!(info.total, DEFAULT_QUOTA_BYTES);
        assert_eq!(info.available, info.total - info.used);
    }

    // ==================== remove / clear ====================

    #[tokio::test]
    async fn test_remove_and_clear_all() {
        let (backend, storage) = storage();
        backend.set("other_app_key", "1").await.unwrap();
        storage.save("a", &1).await.unwrap();
        storage.save("b", &2).await.unwrap();

        storage.remove("a").await.unwrap();
        assert!(storage.load::<u32>("a").await.unwrap().is_none());

        assert_eq!(storage.clear_all().await.unwrap(), 1);
        assert_eq!(backend.keys().await.unwrap(), vec!["other_app_key"]);
    }

    // ==================== export / import ====================

    #[tokio::test]
    async fn test_export_falls_back_to_raw_string() {
        let (backend, storage) = storage();
        backend.set("social_hub_raw", "not json").await.unwrap();
        storage.save("ok", &json!([1, 2])).await.unwrap();

        let exported = storage.export_data().await;
        assert_eq!(exported["raw"], Value::String("not json".into()));
        assert_eq!(exported["ok"]["data"], json!([1, 2]));
    }

    #[tokio::test]
    async fn test_import_unwraps_envelopes() {
        let (_, storage) = storage();
        let mut data = BTreeMap::new();
        data.insert(
            "wrapped".to_string(),
            json!({ "data": { "x": 1 }, "timestamp": 5, "version": "1.0" }),
        );
        data.insert("bare".to_string(), json!([1, 2, 3]));
        storage.import_data(&data).await.unwrap();

        assert_eq!(
            storage.load::<Value>("wrapped").await.unwrap(),
            Some(json!({ "x": 1 }))
        );
        assert_eq!(
            storage.load::<Value>("bare").await.unwrap(),
            Some(json!([1, 2, 3]))
        );
    }

    #[test]
    fn test_settings_defaults() {
        let settings = StorageSettings::default();
        assert_eq!(settings.namespace, "social_hub_");
        assert_eq!(settings.quota_bytes, 5_242_880);
        assert_eq!(settings.freshness, Duration::from_secs(2_592_000));
        assert_eq!(settings.retry.max_attempts(), 3);
    }
}
