//! Reactive binding of one storage key to an in-memory value.
//!
//! State machine:
//!
//! ```text
//! Unbound --rebind(k)--> Loading(k) --complete_load(k)--> Bound(k)
//!    ^                       |  ^                             |
//!    |                       |  +--------rebind(k')-----------+
//!    +------rebind("")-------+
//! ```
//!
//! A key change always goes back through `Loading` and drops whatever was
//! held for the old key. Loads for a key that is no longer pending are
//! discarded.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyedLocalStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingState {
    Unbound,
    Loading { key: String },
    Bound { key: String },
}

#[derive(Debug)]
pub struct Binding<T> {
    store: KeyedLocalStore,
    initial: T,
    value: T,
    state: BindingState,
}

impl<T> Binding<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Bind `key`, loading its stored value (or `initial` when absent).
    pub fn new(store: KeyedLocalStore, key: &str, initial: T) -> Self {
        let mut binding =
            Self { store, value: initial.clone(), initial, state: BindingState::Unbound };
        binding.rebind(key);
        binding
    }

    pub fn state(&self) -> &BindingState {
        &self.state
    }

    pub fn key(&self) -> Option<&str> {
        match &self.state {
            BindingState::Unbound => None,
            BindingState::Loading { key } | BindingState::Bound { key } => Some(key),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, BindingState::Loading { .. })
    }

    /// Current value; the initial value while unbound or loading.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Switch to `key` and load it synchronously.
    pub fn rebind(&mut self, key: &str) {
        if self.key() == Some(key) {
            return;
        }

        self.begin_load(key);
        if key.is_empty() {
            return;
        }

        let loaded = self.store.read(key, self.initial.clone());
        self.complete_load(key, loaded);
    }

    /// First half of a key change, for backends that load asynchronously.
    pub fn begin_load(&mut self, key: &str) {
        self.value = self.initial.clone();
        self.state = if key.is_empty() {
            BindingState::Unbound
        } else {
            BindingState::Loading { key: key.to_string() }
        };
    }

    /// Second half of a key change. Returns `false` (and keeps the current
    /// value) when `key` is not the pending key.
    pub fn complete_load(&mut self, key: &str, loaded: T) -> bool {
        let pending = matches!(&self.state, BindingState::Loading { key: k } if k == key);
        if !pending {
            log::debug!("Discarding stale load for \"{}\"", key);
            return false;
        }

        self.value = loaded;
        self.state = BindingState::Bound { key: key.to_string() };
        true
    }

    /// Re-read the bound key, picking up writes made through other stores.
    pub fn reload(&mut self) {
        if let BindingState::Bound { key } = &self.state {
            self.value = self.store.read(key, self.initial.clone());
        }
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.persist();
    }

    /// Set from the previous value (toggle / increment).
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }

    fn persist(&mut self) {
        let key = match &self.state {
            BindingState::Unbound => return,
            BindingState::Loading { key } | BindingState::Bound { key } => key.clone(),
        };

        // The in-memory value stands even if the write fails
        self.store.write(&key, &self.value);
        self.state = BindingState::Bound { key };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{shared_memory, UnavailableStorage};
    use crate::test_support::{capture_logs, warnings};

    #[test]
    fn test_bind_loads_stored_value() {
        let store = KeyedLocalStore::in_memory();
        store.write("count", &5u32);

        let binding = store.bind("count", 0u32);
        assert_eq!(*binding.value(), 5);
        assert_eq!(binding.state(), &BindingState::Bound { key: "count".to_string() });
    }

    #[test]
    fn test_bind_absent_key_uses_initial() {
        let store = KeyedLocalStore::in_memory();
        let binding = store.bind("count", 3u32);
        assert_eq!(*binding.value(), 3);
        assert!(!store.contains("count"));
    }

    #[test]
    fn test_update_persists() {
        let store = KeyedLocalStore::in_memory();
        let mut binding = store.bind("count", 0u32);

        binding.update(|n| n + 1);
        binding.update(|n| n + 1);

        assert_eq!(*binding.value(), 2);
        assert_eq!(store.read("count", 0u32), 2);
    }

    #[test]
    fn test_empty_key_setter_does_not_persist() {
        capture_logs();
        let (memory, store) = shared_memory();
        let mut binding = store.bind("", 1u32);

        assert_eq!(binding.state(), &BindingState::Unbound);
        assert_eq!(*binding.value(), 1);

        binding.set(42);
        assert_eq!(*binding.value(), 42);
        assert!(memory.is_empty());
        assert!(warnings().is_empty());
    }

    #[test]
    fn test_rebind_reloads_for_new_key() {
        let store = KeyedLocalStore::in_memory();
        store.write("team-a", &10u32);
        store.write("team-b", &20u32);

        let mut binding = store.bind("team-a", 0u32);
        binding.set(11);
        binding.rebind("team-b");
        assert_eq!(*binding.value(), 20);

        binding.set(21);
        assert_eq!(store.read("team-a", 0u32), 11);
        assert_eq!(store.read("team-b", 0u32), 21);
    }

    #[test]
    fn test_rebind_to_empty_unbinds() {
        let store = KeyedLocalStore::in_memory();
        let mut binding = store.bind("k", 0u32);
        binding.set(5);

        binding.rebind("");
        assert_eq!(binding.state(), &BindingState::Unbound);
        assert_eq!(*binding.value(), 0);

        binding.set(9);
        assert_eq!(store.read("k", 0u32), 5);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let store = KeyedLocalStore::in_memory();
        let mut binding = store.bind("", 0u32);

        binding.begin_load("old");
        binding.begin_load("new");
        assert!(!binding.complete_load("old", 99));
        assert!(binding.is_loading());
        assert_eq!(*binding.value(), 0);

        assert!(binding.complete_load("new", 7));
        assert_eq!(*binding.value(), 7);
    }

    #[test]
    fn test_set_while_loading_wins_over_late_load() {
        let store = KeyedLocalStore::in_memory();
        let mut binding = store.bind("", 0u32);

        binding.begin_load("k");
        binding.set(3);
        assert_eq!(binding.state(), &BindingState::Bound { key: "k".to_string() });
        assert!(!binding.complete_load("k", 100));
        assert_eq!(*binding.value(), 3);
        assert_eq!(store.read("k", 0u32), 3);
    }

    #[test]
    fn test_reload_sees_other_tab() {
        let tab_a = KeyedLocalStore::in_memory();
        let tab_b = tab_a.clone();

        let mut a = tab_a.bind("k", 0u32);
        let mut b = tab_b.bind("k", 0u32);
        a.set(1);
        b.set(2);

        a.reload();
        assert_eq!(*a.value(), 2);
    }

    #[test]
    fn test_failed_write_keeps_in_memory_value() {
        capture_logs();
        let store = KeyedLocalStore::new(UnavailableStorage);
        let mut binding = store.bind("k", 0u32);

        binding.update(|n| n + 1);
        binding.update(|n| n + 1);

        assert_eq!(*binding.value(), 2);
        // one failed read on bind, one failed write per update
        assert_eq!(warnings().len(), 3);
    }
}
