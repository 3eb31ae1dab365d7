pub(crate) mod create_flow;
pub(crate) mod store;

use crate::api::ApiClient;
use crate::models::{AccountInfo, Category, Prompt};
use crate::storage::{load_user_from_storage, CURRENT_CATEGORY_KEY, SIDEBAR_COLLAPSED_KEY};
use leptos::prelude::*;
use std::collections::HashSet;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<AccountInfo>>,

    /// Cached category list; fully replaced on each successful fetch.
    pub categories: RwSignal<Vec<Category>>,
    pub categories_loading: RwSignal<bool>,
    pub categories_error: RwSignal<Option<String>>,

    /// Cached prompt list; fully replaced on each successful fetch.
    pub prompts: RwSignal<Vec<Prompt>>,
    pub prompts_loading: RwSignal<bool>,
    pub prompts_error: RwSignal<Option<String>>,

    /// Fetch sequence numbers. A completing request only installs its result
    /// when its number is still current, so a stale in-flight response that
    /// lands after a newer request is discarded instead of clobbering it.
    pub categories_request_id: RwSignal<u64>,
    pub prompts_request_id: RwSignal<u64>,

    /// Guards the initial load (an empty backend list is still "loaded").
    pub catalog_loaded_once: RwSignal<bool>,

    /// Current category selection (drives the library filter + deep links).
    pub current_category_id: RwSignal<Option<String>>,

    /// Expanded nodes in the sidebar tree.
    pub expanded_category_ids: RwSignal<HashSet<String>>,

    /// Global UI state.
    pub sidebar_collapsed: RwSignal<bool>,
    pub search_query: RwSignal<String>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();
        let stored_user = load_user_from_storage();

        let (sidebar_collapsed, current_category_id) = if let Some(storage) =
            web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            let sidebar_collapsed = storage
                .get_item(SIDEBAR_COLLAPSED_KEY)
                .ok()
                .flatten()
                .map(|v| v == "1" || v == "true")
                .unwrap_or(false);

            let current_category_id = storage
                .get_item(CURRENT_CATEGORY_KEY)
                .ok()
                .flatten()
                .filter(|v| !v.trim().is_empty());

            (sidebar_collapsed, current_category_id)
        } else {
            (false, None)
        };

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
            categories: RwSignal::new(vec![]),
            categories_loading: RwSignal::new(false),
            categories_error: RwSignal::new(None),
            prompts: RwSignal::new(vec![]),
            prompts_loading: RwSignal::new(false),
            prompts_error: RwSignal::new(None),
            categories_request_id: RwSignal::new(0),
            prompts_request_id: RwSignal::new(0),
            catalog_loaded_once: RwSignal::new(false),
            current_category_id: RwSignal::new(current_category_id),
            expanded_category_ids: RwSignal::new(HashSet::new()),
            sidebar_collapsed: RwSignal::new(sidebar_collapsed),
            search_query: RwSignal::new(String::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[derive(Clone, Copy)]
pub(crate) struct CategoryUiActions {
    pub open_create: Callback<Option<String>>,
    pub open_rename: Callback<(String, String)>,
    pub open_delete: Callback<(String, String)>,
    pub open_new_prompt: Callback<Option<String>>,
}
