//! Deduplicated string storage.

use std::collections::HashMap;

use crate::types::Slot;

/// Stores each distinct string once and hands out stable [`Slot`]s.
///
/// Equality is by content. Slots are allocated in interning order with no
/// gaps and are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPool {
    /// Values in slot order.
    values: Vec<String>,
    /// Value to slot lookup.
    slots: HashMap<String, Slot>,
}

impl StringPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot holding `value`, allocating one on first sight.
    pub fn intern(&mut self, value: &str) -> Slot {
        if let Some(&slot) = self.slots.get(value) {
            return slot;
        }

        let slot = Slot::new(self.values.len());
        self.values.push(value.to_string());
        self.slots.insert(value.to_string(), slot);
        tracing::trace!(%slot, "Interned new string");
        slot
    }

    #[must_use]
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.values.get(slot.index()).map(String::as_str)
    }

    /// Slot of `value` if it was interned.
    #[must_use]
    pub fn find(&self, value: &str) -> Option<Slot> {
        self.slots.get(value).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(slot, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &str)> {
        self.values.iter().enumerate().map(|(index, value)| (Slot::new(index), value.as_str()))
    }
}
