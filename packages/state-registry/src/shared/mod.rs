//! Shared primitives: DN utilities and interned keys

pub mod dn;

use std::sync::Arc;

/// Interned DN / kind key.
///
/// Index tables hold clones of the same `Arc<str>` instead of owned
/// `String`s, so adjacency lists and kind sets never copy DN text.
pub type InternedString = Arc<str>;

/// Helper to create interned strings
#[inline]
pub fn intern(s: impl AsRef<str>) -> InternedString {
    Arc::from(s.as_ref())
}
