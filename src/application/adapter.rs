//! Normalization contract between raw upstream records and [`User`]s.

use crate::domain::user::User;
use serde_json::Value;

/// Converts one source's raw records into canonical users.
///
/// Adapters never fail: absent or malformed fields default to empty strings
/// and zero ids. Structural validation of the payload is the source
/// client's job, not the adapter's.
pub trait UserAdapter: Send + Sync {
    /// Convert one raw record.
    fn convert_to_user(&self, raw: &Value) -> User;

    /// Convert a collection, preserving order, one user per record.
    fn convert_collection(&self, raws: &[Value]) -> Vec<User> {
        raws.iter().map(|raw| self.convert_to_user(raw)).collect()
    }
}
