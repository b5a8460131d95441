use super::*;
use session_ui_core::ChangeListener;

/// `localStorage` handle. A detached handle reads nothing and drops writes.
#[derive(Clone)]
pub(super) struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub(super) fn open() -> Result<Self, WebShellError> {
        let window = web_sys::window().ok_or(WebShellError::WindowUnavailable)?;
        let storage = window
            .local_storage()
            .ok()
            .flatten()
            .ok_or(WebShellError::StorageUnavailable)?;
        Ok(Self {
            storage: Some(storage),
        })
    }

    pub(super) fn detached() -> Self {
        Self { storage: None }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(_) => {
                warn!(key, "failed to read local storage");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if storage.set_item(key, value).is_err() {
            warn!(key, "failed to write local storage");
        }
    }

    fn remove(&self, key: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        if storage.remove_item(key).is_err() {
            warn!(key, "failed to remove local storage entry");
        }
    }

    fn subscribe(&self, listener: ChangeListener) {
        if self.storage.is_none() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::<dyn FnMut(web_sys::StorageEvent)>::wrap(Box::new(
            move |event: web_sys::StorageEvent| {
                let change = match event.key() {
                    Some(key) => StoreChange::key(key),
                    None => StoreChange::cleared(),
                };
                listener(&change);
            },
        ));
        if window
            .add_event_listener_with_callback(STORAGE_EVENT, callback.as_ref().unchecked_ref())
            .is_err()
        {
            warn!("failed to subscribe to storage events");
            return;
        }
        STORAGE_EVENT_HANDLERS.with(|handlers| handlers.borrow_mut().push(callback));
    }
}
