//! Message key index.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::KeyId;

/// The key was never declared by the default language.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown message key '{0}'")]
pub struct UnknownKey(pub String);

/// Assigns contiguous, zero-based indices to message keys in first-seen order.
///
/// Indices are never reused or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyIndex {
    /// Keys in index order.
    keys: Vec<String>,
    /// Key to index lookup.
    positions: HashMap<String, KeyId>,
}

impl KeyIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `key`, assigning the next one if it is new.
    pub fn assign(&mut self, key: &str) -> KeyId {
        if let Some(&id) = self.positions.get(key) {
            return id;
        }

        let id = self.keys.len();
        self.keys.push(key.to_string());
        self.positions.insert(key.to_string(), id);
        id
    }

    /// # Errors
    /// Returns [`UnknownKey`] if `key` was never assigned.
    pub fn index_of(&self, key: &str) -> Result<KeyId, UnknownKey> {
        self.positions.get(key).copied().ok_or_else(|| UnknownKey(key.to_string()))
    }

    /// Key at `id`, if assigned.
    #[must_use]
    pub fn key(&self, id: KeyId) -> Option<&str> {
        self.keys.get(id).map(String::as_str)
    }

    /// Number of assigned keys (`N`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(index, key)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyId, &str)> {
        self.keys.iter().map(String::as_str).enumerate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::empty(&[])]
    #[case::single(&["HELLO"])]
    #[case::several(&["HELLO", "BYE", "OK", "CANCEL"])]
    fn test_assign_follows_first_seen_order(#[case] keys: &[&str]) {
        let mut index = KeyIndex::new();

        let ids: Vec<_> = keys.iter().map(|key| index.assign(key)).collect();

        assert_eq!(ids, (0..keys.len()).collect::<Vec<_>>());
        assert_that!(index.len(), eq(keys.len()));
        for (expected, key) in keys.iter().enumerate() {
            assert_that!(index.index_of(key), ok(eq(&expected)));
        }
    }

    #[rstest]
    fn test_assign_repeated_key_keeps_first_index() {
        let mut index = KeyIndex::new();
        index.assign("A");
        index.assign("B");

        let again = index.assign("A");
        let next = index.assign("C");

        assert_that!(again, eq(0));
        assert_that!(next, eq(2));
        assert_that!(index.len(), eq(3));
    }

    #[rstest]
    fn test_index_of_unknown_key() {
        let mut index = KeyIndex::new();
        index.assign("HELLO");

        assert_that!(index.index_of("UNKNOWN_KEY"), err(eq(&UnknownKey("UNKNOWN_KEY".to_string()))));
    }

    #[rstest]
    fn test_key_and_iter() {
        let mut index = KeyIndex::new();
        index.assign("HELLO");
        index.assign("BYE");

        assert_that!(index.key(1), some(eq("BYE")));
        assert_that!(index.key(2), none());
        assert_that!(
            index.iter().collect::<Vec<_>>(),
            elements_are![eq(&(0, "HELLO")), eq(&(1, "BYE"))]
        );
    }
}
