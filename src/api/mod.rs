use crate::models::{AccountInfo, Category, Prompt};
use crate::storage::{web_credentials, CredentialStore};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:8787".to_string();

        // Deployments inject `window.ENV.API_URL` from a small config script.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_api_url() -> String {
    EnvConfig::new().api_url
}

/// Response contract: every 2xx body is `{ "data": <payload> }`.
///
/// Decoding is strict; a body that doesn't match is a Parse error, never a
/// silent fallback to some other shape.
#[derive(Deserialize, Debug)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthSession {
    pub token: String,
    pub account: AccountInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewCategoryRequest {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Partial update; only present fields are sent.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateCategoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewPromptRequest {
    pub title: String,
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub is_favorite: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePromptRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

pub(crate) fn search_path(q: &str) -> String {
    format!("/prompts/search?q={}", urlencoding::encode(q))
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    /// Build a client from the host credential store.
    pub fn load_from_storage() -> Self {
        let base_url = get_api_url();
        let token = web_credentials().get();
        Self { base_url, token }
    }

    pub fn save_to_storage(&self) {
        if let Some(token) = &self.token {
            web_credentials().set(token);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn get_auth_token(&self) -> Option<String> {
        self.token.clone()
    }

    pub fn logout(&mut self) {
        self.token = None;
        web_credentials().clear();
        crate::storage::clear_user_from_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<reqwest::Response> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url);
        req = Self::with_auth_headers(req, self.get_auth_token());

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            Ok(res)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        let envelope: Envelope<T> = res.json().await.map_err(ApiError::parse)?;
        Ok(envelope.data)
    }

    /// For endpoints that ack with 204 and no body (DELETE).
    async fn request_no_content(&self, method: reqwest::Method, path: &str) -> ApiResult<()> {
        let _ = self.send(method, path, None::<&()>).await?;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        self.request(
            reqwest::Method::POST,
            "/auth/login",
            Some(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> ApiResult<AuthSession> {
        self.request(
            reqwest::Method::POST,
            "/auth/register",
            Some(&RegisterRequest {
                email: email.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    pub async fn get_categories(&self) -> ApiResult<Vec<Category>> {
        self.request(reqwest::Method::GET, "/categories", None::<&()>)
            .await
    }

    pub async fn create_category(&self, req: NewCategoryRequest) -> ApiResult<Category> {
        self.request(reqwest::Method::POST, "/categories", Some(&req))
            .await
    }

    pub async fn update_category(
        &self,
        category_id: &str,
        req: UpdateCategoryRequest,
    ) -> ApiResult<Category> {
        self.request(
            reqwest::Method::PUT,
            &format!("/categories/{}", category_id),
            Some(&req),
        )
        .await
    }

    /// The backend uncategorizes dependent prompts on its side; the client
    /// must not delete them locally.
    pub async fn delete_category(&self, category_id: &str) -> ApiResult<()> {
        self.request_no_content(
            reqwest::Method::DELETE,
            &format!("/categories/{}", category_id),
        )
        .await
    }

    pub async fn get_prompts(&self) -> ApiResult<Vec<Prompt>> {
        self.request(reqwest::Method::GET, "/prompts", None::<&()>)
            .await
    }

    pub async fn get_prompt(&self, prompt_id: &str) -> ApiResult<Prompt> {
        self.request(
            reqwest::Method::GET,
            &format!("/prompts/{}", prompt_id),
            None::<&()>,
        )
        .await
    }

    pub async fn create_prompt(&self, req: NewPromptRequest) -> ApiResult<Prompt> {
        self.request(reqwest::Method::POST, "/prompts", Some(&req))
            .await
    }

    pub async fn update_prompt(
        &self,
        prompt_id: &str,
        req: UpdatePromptRequest,
    ) -> ApiResult<Prompt> {
        self.request(
            reqwest::Method::PUT,
            &format!("/prompts/{}", prompt_id),
            Some(&req),
        )
        .await
    }

    pub async fn delete_prompt(&self, prompt_id: &str) -> ApiResult<()> {
        self.request_no_content(reqwest::Method::DELETE, &format!("/prompts/{}", prompt_id))
            .await
    }

    pub async fn search_prompts(&self, q: &str) -> ApiResult<Vec<Prompt>> {
        self.request(reqwest::Method::GET, &search_path(q), None::<&()>)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_decodes_strictly() {
        let ok = r#"{"data": [{"id": "c1", "name": "Work"}]}"#;
        let parsed: Envelope<Vec<Category>> =
            serde_json::from_str(ok).expect("envelope should parse");
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].id, "c1");

        // A body without the documented `data` wrapper must fail loudly,
        // not be probed for alternative shapes.
        let bad = r#"{"categories": [{"id": "c1", "name": "Work"}]}"#;
        assert!(serde_json::from_str::<Envelope<Vec<Category>>>(bad).is_err());
    }

    #[test]
    fn auth_session_contract_deserialize() {
        let json = r#"{
            "token": "jwt-token",
            "account": {"id": 1, "username": "u", "email": "u@example.com"}
        }"#;
        let parsed: AuthSession = serde_json::from_str(json).expect("session should parse");
        assert_eq!(parsed.token, "jwt-token");
        assert!(parsed.account.extra.is_object());
    }

    #[test]
    fn new_category_request_omits_absent_fields() {
        let req = NewCategoryRequest {
            name: "Code".to_string(),
            parent_id: Some("c1".to_string()),
            ..Default::default()
        };
        let v = serde_json::to_value(&req).expect("should serialize");
        assert_eq!(v["name"], "Code");
        assert_eq!(v["parentId"], "c1");
        assert!(v.get("description").is_none());
        assert!(v.get("color").is_none());
    }

    #[test]
    fn update_prompt_request_is_sparse() {
        let req = UpdatePromptRequest {
            category_id: Some("c2".to_string()),
            ..Default::default()
        };
        let v = serde_json::to_value(&req).expect("should serialize");
        assert_eq!(v.as_object().map(|o| o.len()), Some(1));
        assert_eq!(v["categoryId"], "c2");
    }

    #[test]
    fn search_path_encodes_query() {
        assert_eq!(search_path("rust tips"), "/prompts/search?q=rust%20tips");
        assert_eq!(search_path("a&b=c"), "/prompts/search?q=a%26b%3Dc");
    }

    #[test]
    fn api_client_new_has_no_token() {
        let client = ApiClient::new("http://localhost:8787".to_string());
        assert_eq!(client.base_url, "http://localhost:8787");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn api_client_set_token_authenticates() {
        let mut client = ApiClient::new("http://localhost:8787".to_string());
        client.set_token("my-jwt-token".to_string());
        assert!(client.is_authenticated());
        assert_eq!(client.get_auth_token().as_deref(), Some("my-jwt-token"));
    }
}
