use crate::api::{
    ApiError, ApiErrorKind, ApiResult, NewCategoryRequest, NewPromptRequest,
    UpdateCategoryRequest, UpdatePromptRequest,
};
use crate::models::{Category, Prompt};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Cache controller over the two remote collections.
///
/// All reads and mutations for categories and prompts go through here so the
/// rules stay in one place:
/// - a successful fetch fully replaces the cached collection;
/// - a stale fetch (superseded by a newer request) is discarded;
/// - a failed mutation leaves the cache untouched;
/// - Unauthorized drops the credential and forces re-login.
#[derive(Clone)]
pub(crate) struct CatalogStore {
    app: AppContext,
}

impl CatalogStore {
    pub fn new(app: AppContext) -> Self {
        Self { app }
    }

    fn force_relogin(&self) {
        let mut client = self.app.0.api_client.get_untracked();
        client.logout();
        self.app.0.api_client.set(client);
        self.app.0.current_user.set(None);
        self.app.0.categories.set(vec![]);
        self.app.0.prompts.set(vec![]);
        let _ = window().location().set_href("/login");
    }

    /// Funnel for remote errors on read paths: Unauthorized kicks back to
    /// login, everything else becomes alert text.
    fn note_error(&self, e: &ApiError, error_slot: RwSignal<Option<String>>) {
        if e.kind == ApiErrorKind::Unauthorized {
            self.force_relogin();
        } else {
            error_slot.set(Some(e.to_string()));
        }
    }

    async fn refresh_categories(&self) {
        let seq = self.app.0.categories_request_id.get_untracked() + 1;
        self.app.0.categories_request_id.set(seq);
        self.app.0.categories_loading.set(true);
        self.app.0.categories_error.set(None);

        let client = self.app.0.api_client.get_untracked();
        let result = client.get_categories().await;

        // A newer request took over while we were in flight; drop this result.
        if self.app.0.categories_request_id.get_untracked() != seq {
            return;
        }

        match result {
            Ok(list) => self.app.0.categories.set(list),
            Err(e) => self.note_error(&e, self.app.0.categories_error),
        }
        self.app.0.categories_loading.set(false);
    }

    async fn refresh_prompts(&self) {
        let seq = self.app.0.prompts_request_id.get_untracked() + 1;
        self.app.0.prompts_request_id.set(seq);
        self.app.0.prompts_loading.set(true);
        self.app.0.prompts_error.set(None);

        let client = self.app.0.api_client.get_untracked();
        let result = client.get_prompts().await;

        if self.app.0.prompts_request_id.get_untracked() != seq {
            return;
        }

        match result {
            Ok(list) => self.app.0.prompts.set(list),
            Err(e) => self.note_error(&e, self.app.0.prompts_error),
        }
        self.app.0.prompts_loading.set(false);
    }

    /// Fire-and-forget load of both collections (initial shell load, manual
    /// refresh button).
    pub fn spawn_load_all(&self) {
        if !self.app.0.api_client.get_untracked().is_authenticated() {
            return;
        }

        let s = self.clone();
        spawn_local(async move {
            s.refresh_categories().await;
            s.refresh_prompts().await;
            s.app.0.catalog_loaded_once.set(true);
        });
    }

    pub fn spawn_load_categories(&self) {
        let s = self.clone();
        spawn_local(async move { s.refresh_categories().await });
    }

    pub fn spawn_load_prompts(&self) {
        let s = self.clone();
        spawn_local(async move { s.refresh_prompts().await });
    }

    pub async fn create_category(&self, req: NewCategoryRequest) -> ApiResult<Category> {
        let client = self.app.0.api_client.get_untracked();
        let created = client.create_category(req).await?;
        self.refresh_categories().await;
        Ok(created)
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        req: UpdateCategoryRequest,
    ) -> ApiResult<Category> {
        let client = self.app.0.api_client.get_untracked();
        let updated = client.update_category(category_id, req).await?;
        self.refresh_categories().await;
        Ok(updated)
    }

    /// Deleting a category uncategorizes its prompts server-side, so both
    /// collections are refreshed; the client never deletes prompts locally.
    pub async fn delete_category(&self, category_id: &str) -> ApiResult<()> {
        let client = self.app.0.api_client.get_untracked();
        client.delete_category(category_id).await?;

        if self.app.0.current_category_id.get_untracked().as_deref() == Some(category_id) {
            self.app.0.current_category_id.set(None);
        }

        self.refresh_categories().await;
        self.refresh_prompts().await;
        Ok(())
    }

    pub async fn create_prompt(&self, req: NewPromptRequest) -> ApiResult<Prompt> {
        let client = self.app.0.api_client.get_untracked();
        let created = client.create_prompt(req).await?;
        self.refresh_prompts().await;
        Ok(created)
    }

    pub async fn update_prompt(
        &self,
        prompt_id: &str,
        req: UpdatePromptRequest,
    ) -> ApiResult<Prompt> {
        let client = self.app.0.api_client.get_untracked();
        let updated = client.update_prompt(prompt_id, req).await?;
        self.refresh_prompts().await;
        Ok(updated)
    }

    pub async fn delete_prompt(&self, prompt_id: &str) -> ApiResult<()> {
        let client = self.app.0.api_client.get_untracked();
        client.delete_prompt(prompt_id).await?;
        self.refresh_prompts().await;
        Ok(())
    }

    /// Server-side search; results are page-local, never installed into the
    /// cached prompt list.
    pub async fn search_prompts(&self, q: &str) -> ApiResult<Vec<Prompt>> {
        let client = self.app.0.api_client.get_untracked();
        client.search_prompts(q).await
    }

    /// Shared handler for mutation errors raised at page call sites.
    pub fn surface_error(&self, e: &ApiError, error_slot: RwSignal<Option<String>>) {
        self.note_error(e, error_slot);
    }
}
