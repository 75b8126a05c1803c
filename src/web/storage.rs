use web_sys::{Storage, Window};

use crate::selection::KeyValueStore;

/// `window.localStorage`, or nothing at all when the browser refuses access
/// (private mode, disabled storage). Failed writes are logged and ignored.
pub struct LocalStorage {
    inner: Option<Storage>,
}

impl LocalStorage {
    pub fn from_window(win: &Window) -> Self {
        let inner = win.local_storage().ok().flatten();
        if inner.is_none() {
            log::warn!("localStorage unavailable; selections will not persist");
        }
        Self { inner }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.inner {
            if let Err(err) = storage.set_item(key, value) {
                log::warn!("could not save {key}: {err:?}");
            }
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.inner {
            if let Err(err) = storage.remove_item(key) {
                log::warn!("could not remove {key}: {err:?}");
            }
        }
    }
}
