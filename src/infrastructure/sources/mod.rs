//! Per-source client and adapter implementations.
//!
//! Each upstream source gets its own module holding a config struct, a
//! [`SourceClient`](crate::application::client::SourceClient) and a
//! [`UserAdapter`](crate::application::adapter::UserAdapter). Sources
//! differ in URL shape, pagination semantics, rate limits, and payload
//! structure; everything they share lives in the application layer.

pub mod json_placeholder;
pub mod random_user;
pub mod reqres;

use serde_json::Value;

/// Extract a string at a nested key path, defaulting to empty.
pub(crate) fn str_at(raw: &Value, path: &[&str]) -> String {
    let mut current = raw;
    for key in path {
        match current.get(key) {
            Some(next) => current = next,
            None => return String::new(),
        }
    }
    current.as_str().unwrap_or_default().to_string()
}

/// Extract an integer field, defaulting to zero.
pub(crate) fn id_at(raw: &Value, key: &str) -> i64 {
    raw.get(key).and_then(Value::as_i64).unwrap_or_default()
}
