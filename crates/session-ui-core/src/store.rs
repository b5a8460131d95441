use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::keys::StorageKeys;

/// Notification that another view of the same origin mutated the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// `None` when the whole store was cleared.
    pub key: Option<String>,
}

impl StoreChange {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    #[must_use]
    pub fn cleared() -> Self {
        Self { key: None }
    }

    #[must_use]
    pub fn touches_identity(&self, keys: &StorageKeys) -> bool {
        self.key.as_deref().is_none_or(|key| keys.contains(key))
    }

    #[must_use]
    pub fn touches_key(&self, key: &str) -> bool {
        self.key.as_deref().is_none_or(|changed| changed == key)
    }
}

pub type ChangeListener = Rc<dyn Fn(&StoreChange)>;

/// Origin-scoped string key-value store shared by every open view.
///
/// Operations are infallible from the caller's point of view; host failures
/// are treated as absent values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    /// Register a listener for mutations made by *other* views.
    fn subscribe(&self, listener: ChangeListener);
}

#[derive(Default)]
struct SharedEntries {
    entries: BTreeMap<String, String>,
    listeners: Vec<(u64, ChangeListener)>,
    next_tab: u64,
}

/// In-memory store. Every handle returned by [`MemoryStore::open_tab`] sees the
/// same entries and is notified of mutations made through the other handles,
/// like browser tabs sharing `localStorage`.
#[derive(Clone)]
pub struct MemoryStore {
    shared: Rc<RefCell<SharedEntries>>,
    tab: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("MemoryStore")
            .field("tab", &self.tab)
            .field("entries", &shared.entries)
            .field("listeners", &shared.listeners.len())
            .finish()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(SharedEntries {
                next_tab: 1,
                ..SharedEntries::default()
            })),
            tab: 0,
        }
    }

    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.shared.borrow_mut().entries.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// Another handle over the same entries, notified as a separate view.
    #[must_use]
    pub fn open_tab(&self) -> Self {
        let mut shared = self.shared.borrow_mut();
        let tab = shared.next_tab;
        shared.next_tab += 1;
        Self {
            shared: Rc::clone(&self.shared),
            tab,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.shared.borrow().entries.clone()
    }

    pub fn clear(&self) {
        let had_entries = {
            let mut shared = self.shared.borrow_mut();
            let had_entries = !shared.entries.is_empty();
            shared.entries.clear();
            had_entries
        };
        if had_entries {
            self.notify_other_tabs(&StoreChange::cleared());
        }
    }

    fn notify_other_tabs(&self, change: &StoreChange) {
        // Listeners may read the store, so release the borrow before calling out.
        let listeners: Vec<ChangeListener> = self
            .shared
            .borrow()
            .listeners
            .iter()
            .filter(|(tab, _)| *tab != self.tab)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.shared.borrow().entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let previous = self
            .shared
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
        if previous.as_deref() != Some(value) {
            self.notify_other_tabs(&StoreChange::key(key));
        }
    }

    fn remove(&self, key: &str) {
        let previous = self.shared.borrow_mut().entries.remove(key);
        if previous.is_some() {
            self.notify_other_tabs(&StoreChange::key(key));
        }
    }

    fn subscribe(&self, listener: ChangeListener) {
        self.shared
            .borrow_mut()
            .listeners
            .push((self.tab, listener));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn counting_listener(store: &MemoryStore) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        store.subscribe(Rc::new(move |_change| seen.set(seen.get() + 1)));
        count
    }

    #[test]
    fn tabs_share_entries() {
        let first = MemoryStore::new();
        let second = first.open_tab();
        first.set("utente", "a@b.com");
        assert_eq!(second.get("utente").as_deref(), Some("a@b.com"));
    }

    #[test]
    fn mutation_notifies_only_other_tabs() {
        let first = MemoryStore::new();
        let second = first.open_tab();
        let first_count = counting_listener(&first);
        let second_count = counting_listener(&second);

        first.set("utente", "a@b.com");

        assert_eq!(first_count.get(), 0);
        assert_eq!(second_count.get(), 1);
    }

    #[test]
    fn unchanged_writes_and_missing_removes_are_silent() {
        let first = MemoryStore::with_entries([("utente", "a@b.com")]);
        let second = first.open_tab();
        let count = counting_listener(&second);

        first.set("utente", "a@b.com");
        first.remove("missing");

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn listener_can_read_store_during_notification() {
        let first = MemoryStore::new();
        let second = first.open_tab();
        let observed = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&observed);
        let reader = second.clone();
        second.subscribe(Rc::new(move |change| {
            let key = change.key.clone().unwrap_or_default();
            *sink.borrow_mut() = reader.get(&key);
        }));

        first.set("utente", "a@b.com");

        assert_eq!(observed.borrow().as_deref(), Some("a@b.com"));
    }

    #[test]
    fn clear_reports_whole_store_change() {
        let first = MemoryStore::with_entries([("theme-preference", "dark")]);
        let second = first.open_tab();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        second.subscribe(Rc::new(move |change| sink.borrow_mut().push(change.clone())));

        first.clear();

        assert_eq!(*changes.borrow(), vec![StoreChange::cleared()]);
        assert!(second.snapshot().is_empty());
    }

    #[test]
    fn change_filters() {
        let keys = StorageKeys::logical();
        assert!(StoreChange::key("identity").touches_identity(&keys));
        assert!(StoreChange::cleared().touches_identity(&keys));
        assert!(!StoreChange::key("theme-preference").touches_identity(&keys));
        assert!(StoreChange::key("theme-preference").touches_key("theme-preference"));
    }
}
