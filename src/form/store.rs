//! Form value tracking and snapshot persistence

use crate::form::error::FormError;
use crate::platform::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default storage key for saved form snapshots
pub const STORAGE_KEY: &str = "formData";

/// A tracked field value.
///
/// Serialized untagged so snapshots stay plain name→value JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    List(Vec<String>),
    Text(String),
}

/// Name → value map backing a live form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    values: BTreeMap<String, FieldValue>,
}

impl FormData {
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text content of a value-bearing entry, if any
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn snapshot_all(&self) -> BTreeMap<String, FieldValue> {
        self.values.clone()
    }

    /// Replace the entire map with a snapshot
    pub fn restore_all(&mut self, values: BTreeMap<String, FieldValue>) {
        self.values = values;
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Write the current snapshot through the storage capability.
    /// Failures are recoverable: logged as warnings, never returned.
    pub fn save(&self, store: &dyn KeyValueStore, key: &str) {
        let payload = match serde_json::to_string(&self.values) {
            Ok(payload) => payload,
            Err(err) => {
                let err = FormError::Persistence(err.to_string());
                tracing::warn!("could not serialize form data: {err}");
                return;
            }
        };
        match store.write(key, &payload) {
            Ok(()) => tracing::info!("form data saved under key {key:?}"),
            Err(err) => {
                let err = FormError::Persistence(err.to_string());
                tracing::warn!("could not save form data: {err}");
            }
        }
    }
}

/// Read a stored snapshot through the storage capability.
///
/// Returns `None` when nothing is stored under the key (state stays
/// unchanged). An unreadable or malformed payload degrades to an empty
/// snapshot with a warning; it never produces an error.
pub fn read_snapshot(
    store: &dyn KeyValueStore,
    key: &str,
) -> Option<BTreeMap<String, FieldValue>> {
    match store.read(key) {
        Ok(Some(payload)) => match serde_json::from_str(&payload) {
            Ok(values) => {
                tracing::info!("form data loaded from key {key:?}");
                Some(values)
            }
            Err(err) => {
                let err = FormError::Persistence(err.to_string());
                tracing::warn!("stored form data is malformed, starting empty: {err}");
                Some(BTreeMap::new())
            }
        },
        Ok(None) => None,
        Err(err) => {
            let err = FormError::Persistence(err.to_string());
            tracing::warn!("form data store is unreadable, starting empty: {err}");
            Some(BTreeMap::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MockKeyValueStore;
    use anyhow::anyhow;

    fn sample_data() -> FormData {
        let mut data = FormData::default();
        data.set("patient", FieldValue::Text("Ivanov".to_string()));
        data.set("followup", FieldValue::Flag(true));
        data.set(
            "complaints",
            FieldValue::List(vec!["headache".to_string(), "fever".to_string()]),
        );
        data
    }

    #[test]
    fn test_set_and_get() {
        let data = sample_data();
        assert_eq!(
            data.get("patient"),
            Some(&FieldValue::Text("Ivanov".to_string()))
        );
        assert_eq!(data.text("patient"), Some("Ivanov"));
        assert_eq!(data.text("followup"), None);
        assert_eq!(data.get("missing"), None);
    }

    #[test]
    fn test_restore_snapshot_round_trip() {
        let mut data = sample_data();
        let snapshot = data.snapshot_all();
        data.restore_all(snapshot.clone());
        assert_eq!(data.snapshot_all(), snapshot);
    }

    #[test]
    fn test_clear_empties_map() {
        let mut data = sample_data();
        data.clear();
        assert_eq!(data.names().count(), 0);
    }

    #[test]
    fn test_untagged_serialization_shape() {
        let data = sample_data();
        let json = serde_json::to_string(&data.snapshot_all()).unwrap();
        assert_eq!(
            json,
            r#"{"complaints":["headache","fever"],"followup":true,"patient":"Ivanov"}"#
        );
    }

    #[test]
    fn test_untagged_deserialization() {
        let json = r#"{"ok":true,"items":["a"],"name":"x"}"#;
        let values: BTreeMap<String, FieldValue> = serde_json::from_str(json).unwrap();
        assert_eq!(values["ok"], FieldValue::Flag(true));
        assert_eq!(values["items"], FieldValue::List(vec!["a".to_string()]));
        assert_eq!(values["name"], FieldValue::Text("x".to_string()));
    }

    #[test]
    fn test_save_writes_through_store() {
        let data = sample_data();
        let mut store = MockKeyValueStore::new();
        store
            .expect_write()
            .withf(|key, payload| key == STORAGE_KEY && payload.contains("Ivanov"))
            .times(1)
            .returning(|_, _| Ok(()));
        data.save(&store, STORAGE_KEY);
    }

    #[test]
    fn test_save_failure_is_recovered() {
        let data = sample_data();
        let mut store = MockKeyValueStore::new();
        store
            .expect_write()
            .returning(|_, _| Err(anyhow!("disk full")));
        // must not panic or propagate
        data.save(&store, STORAGE_KEY);
    }

    #[test]
    fn test_read_snapshot_absent_is_none() {
        let mut store = MockKeyValueStore::new();
        store.expect_read().returning(|_| Ok(None));
        assert_eq!(read_snapshot(&store, STORAGE_KEY), None);
    }

    #[test]
    fn test_read_snapshot_success() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_read()
            .returning(|_| Ok(Some(r#"{"patient":"Ivanov"}"#.to_string())));
        let values = read_snapshot(&store, STORAGE_KEY).unwrap();
        assert_eq!(values["patient"], FieldValue::Text("Ivanov".to_string()));
    }

    #[test]
    fn test_read_snapshot_malformed_falls_back_to_empty() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_read()
            .returning(|_| Ok(Some("{not json".to_string())));
        let values = read_snapshot(&store, STORAGE_KEY).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_read_snapshot_error_falls_back_to_empty() {
        let mut store = MockKeyValueStore::new();
        store.expect_read().returning(|_| Err(anyhow!("io error")));
        let values = read_snapshot(&store, STORAGE_KEY).unwrap();
        assert!(values.is_empty());
    }
}
