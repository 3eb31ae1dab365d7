use crate::models::{AccountInfo, RecentPrompt};
use crate::util::now_ms;
use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "promptdeck_token";
pub(crate) const USER_KEY: &str = "promptdeck_user";
pub(crate) const SIDEBAR_COLLAPSED_KEY: &str = "promptdeck_sidebar_collapsed";
pub(crate) const CURRENT_CATEGORY_KEY: &str = "promptdeck_current_category_id";
pub(crate) const RECENT_PROMPTS_KEY: &str = "promptdeck_recent_prompts";

/// Single place credentials live. One implementation per host environment;
/// nothing else in the app touches the raw token key.
pub(crate) trait CredentialStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// Browser host: token in localStorage under [`TOKEN_KEY`].
pub(crate) struct LocalStorageCredentials;

impl CredentialStore for LocalStorageCredentials {
    fn get(&self) -> Option<String> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
    }

    fn set(&self, token: &str) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }

    fn clear(&self) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}

pub(crate) fn web_credentials() -> LocalStorageCredentials {
    LocalStorageCredentials
}

/// In-memory implementation for host environments without localStorage
/// (native test harness).
#[allow(dead_code)]
pub(crate) struct MemoryCredentials(std::cell::RefCell<Option<String>>);

#[allow(dead_code)]
impl MemoryCredentials {
    pub fn new() -> Self {
        Self(std::cell::RefCell::new(None))
    }
}

impl CredentialStore for MemoryCredentials {
    fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    fn set(&self, token: &str) {
        *self.0.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.0.borrow_mut() = None;
    }
}

pub(crate) fn save_user_to_storage(user: &AccountInfo) {
    if let Ok(json) = serde_json::to_string(user) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(USER_KEY, &json);
        }
    }
}

pub(crate) fn load_user_from_storage() -> Option<AccountInfo> {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        if let Ok(Some(json)) = storage.get_item(USER_KEY) {
            return serde_json::from_str(&json).ok();
        }
    }
    None
}

pub(crate) fn clear_user_from_storage() {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.remove_item(USER_KEY);
    }
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn upsert_lru_by_key<T: Clone>(
    mut items: Vec<T>,
    item: T,
    same_key: impl Fn(&T, &T) -> bool,
    max: usize,
) -> Vec<T> {
    items.retain(|x| !same_key(x, &item));
    items.insert(0, item);
    if items.len() > max {
        items.truncate(max);
    }
    items
}

pub(crate) fn load_recent_prompts() -> Vec<RecentPrompt> {
    load_json_from_storage::<Vec<RecentPrompt>>(RECENT_PROMPTS_KEY).unwrap_or_default()
}

pub(crate) fn save_recent_prompts(items: &[RecentPrompt]) {
    save_json_to_storage(RECENT_PROMPTS_KEY, &items.to_vec());
}

pub(crate) fn write_recent_prompt(prompt_id: &str, title: &str) {
    if prompt_id.trim().is_empty() {
        return;
    }

    let item = RecentPrompt {
        prompt_id: prompt_id.to_string(),
        title: title.to_string(),
        last_opened_ms: now_ms(),
    };

    let next = upsert_lru_by_key(
        load_recent_prompts(),
        item,
        |a, b| a.prompt_id == b.prompt_id,
        10,
    );
    save_json_to_storage(RECENT_PROMPTS_KEY, &next);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_credentials_roundtrip() {
        let store = MemoryCredentials::new();
        assert!(store.get().is_none());

        store.set("t1");
        assert_eq!(store.get().as_deref(), Some("t1"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn lru_moves_existing_key_to_front() {
        let items = vec![("a", 1), ("b", 2), ("c", 3)];
        let next = upsert_lru_by_key(items, ("b", 9), |x, y| x.0 == y.0, 10);
        assert_eq!(next[0], ("b", 9));
        assert_eq!(next.len(), 3);
    }

    #[test]
    fn lru_truncates_at_max() {
        let items = vec![("a", 1), ("b", 2)];
        let next = upsert_lru_by_key(items, ("c", 3), |x, y| x.0 == y.0, 2);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].0, "c");
        assert_eq!(next[1].0, "a");
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` +
// wasm-bindgen-test-runner).
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_credentials_roundtrip() {
        let store = web_credentials();
        store.clear();
        assert!(store.get().is_none());

        store.set("t1");
        assert_eq!(store.get().as_deref(), Some("t1"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[wasm_bindgen_test]
    fn user_storage_roundtrip() {
        let user = AccountInfo {
            extra: serde_json::json!({"id": 1, "username": "u"}),
        };
        save_user_to_storage(&user);
        let loaded = load_user_from_storage().expect("should load user from localStorage");
        assert_eq!(loaded.extra["username"], "u");

        clear_user_from_storage();
        assert!(load_user_from_storage().is_none());
    }
}
