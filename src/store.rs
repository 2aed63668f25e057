//! The in-memory item collection.
//!
//! [`ItemStore`] owns the ordered list of items and the id counter. Both sit
//! behind one mutex: the server runs handlers on a multi-threaded runtime,
//! and id uniqueness plus insertion order only hold if allocation and append
//! happen as one step. Every operation takes the lock once and releases it
//! before returning, so it is never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

/// A stored item.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// `2026-10-16T09:30:00.123Z`
fn iso_millis<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

const SEED_NAMES: [&str; 2] = ["First item", "Second item"];

struct Inner {
    items: Vec<Item>,
    next_id: u64,
}

/// Process-lifetime item collection plus id allocator.
///
/// A fresh store holds two seed items, ids `"1"` and `"2"`; new ids are
/// allocated from `3` upwards and are never reused, even after a delete.
pub struct ItemStore {
    inner: Mutex<Inner>,
}

impl ItemStore {
    pub fn new() -> Self {
        let now = Utc::now();
        let items: Vec<Item> = SEED_NAMES.iter()
            .zip(1u64..)
            .map(|(name, id)| Item { id: id.to_string(), name: (*name).to_owned(), created_at: now })
            .collect();
        let next_id = items.len() as u64 + 1;

        Self { inner: Mutex::new(Inner { items, next_id }) }
    }

    // No operation leaves `Inner` half-updated, so a poisoned lock is still
    // consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All items, in insertion order.
    pub fn list(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    /// The item whose id equals `id` exactly.
    pub fn get(&self, id: &str) -> Result<Item, ApiError> {
        self.lock().items.iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    /// Appends a new item named after `name`.
    ///
    /// `None` and JSON `null` are rejected without touching the store. Any
    /// other value is normalized with [`name_to_string`]; an empty string is
    /// a valid name.
    pub fn create(&self, name: Option<Value>) -> Result<Item, ApiError> {
        let name = match name {
            None | Some(Value::Null) => return Err(ApiError::NameRequired),
            Some(value) => name_to_string(&value),
        };

        let mut inner = self.lock();
        let item = Item {
            id: inner.next_id.to_string(),
            name,
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.items.push(item.clone());
        drop(inner);

        debug!(id = %item.id, "item created");
        Ok(item)
    }

    /// Removes the item whose id equals `id`, keeping the order of the rest.
    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut inner = self.lock();
        let index = inner.items.iter()
            .position(|item| item.id == id)
            .ok_or(ApiError::NotFound)?;
        inner.items.remove(index);
        drop(inner);

        debug!(id, "item deleted");
        Ok(())
    }
}

impl Default for ItemStore {
    fn default() -> Self { Self::new() }
}

/// Canonical string form of a JSON value used as an item name.
///
/// - strings are kept as-is
/// - numbers print the way JavaScript's `String(n)` does: no trailing
///   fraction on integral values (`3.0` → `"3"`), `-0` as `"0"`, and
///   exponent form outside `[1e-6, 1e21)` (`1e21` → `"1e+21"`)
/// - booleans print as `true` / `false`
/// - arrays join their elements with `,`, `null` elements printing empty
/// - objects print as `[object Object]`
pub fn name_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), number_to_string),
        Value::Array(values) => values.iter()
            .map(name_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

// JSON numbers are doubles to a JavaScript client, so every number is
// formatted from its `f64` value.
fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}
