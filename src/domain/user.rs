//! Canonical user record shared by all sources.
//!
//! Every upstream source normalizes into this one shape, regardless of how
//! its own schema names or nests the fields. The `id` is only unique within
//! a single source's result set; the aggregator merges without deduplicating.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// A normalized user record.
///
/// Constructed by a source adapter and treated as immutable afterwards,
/// except for the free-form `metadata` map, which carries side information
/// such as source provenance.
///
/// # Example
/// ```
/// use user_fanout::User;
///
/// let user = User::new(7, "nina@example.com", "Nina", "Simone", "https://example.com/7.jpg");
/// assert_eq!(user.id(), 7);
/// assert_eq!(user.email(), "nina@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    avatar_url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Value>,
}

impl User {
    /// Create a user record with empty metadata.
    pub fn new(
        id: i64,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            avatar_url: avatar_url.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// The source-local identifier (synthesized for sources without one).
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    /// Side information attached to this record, e.g. source provenance.
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Attach a metadata entry, replacing any previous value for the key.
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Convert to the transport-neutral mapping form handed to filters.
    ///
    /// The `metadata` key is only present when the map is non-empty, so
    /// records without side information stay flat.
    pub fn to_value(&self) -> Value {
        let mut record = json!({
            "id": self.id,
            "email": self.email,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "avatar": self.avatar_url,
        });
        if !self.metadata.is_empty() {
            if let Value::Object(map) = &mut record {
                map.insert("metadata".to_string(), json!(self.metadata));
            }
        }
        record
    }
}
