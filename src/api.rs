use std::sync::Arc;

use reqwest::{cookie::Jar, Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{ChatRequest, ChatResponse, ConversationDetail, ConversationSummary, UserProfile};

/// HTTP client for the chat server's JSON API.
///
/// Every request goes through one cookie jar, so a session cookie seeded at
/// construction (or set by the server later) accompanies all calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidConfig(format!("base url '{}': {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = config.session_cookie.as_deref().filter(|c| !c.trim().is_empty()) {
            jar.add_cookie_str(cookie.trim(), &base);
        }

        let http = Client::builder()
            .cookie_provider(jar)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("http client: {}", e)))?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // new() only accepts bases that can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    #[instrument(skip(self))]
    pub async fn whoami(&self) -> ApiResult<UserProfile> {
        let url = self.endpoint(&["api", "user"]);
        let response = self.send(self.http.get(url.clone()), &url).await?;
        read_json(&url, response).await
    }

    #[instrument(skip(self))]
    pub async fn list_conversations(&self) -> ApiResult<Vec<ConversationSummary>> {
        let url = self.endpoint(&["api", "conversations"]);
        let response = self.send(self.http.get(url.clone()), &url).await?;
        read_json(&url, response).await
    }

    #[instrument(skip(self))]
    pub async fn get_conversation(&self, id: &str) -> ApiResult<ConversationDetail> {
        let url = self.endpoint(&["api", "conversations", id]);
        let response = self.send(self.http.get(url.clone()), &url).await?;
        read_json(&url, response).await
    }

    #[instrument(skip(self))]
    pub async fn delete_conversation(&self, id: &str) -> ApiResult<()> {
        let url = self.endpoint(&["api", "conversations", id]);
        let response = self.send(self.http.delete(url.clone()), &url).await?;
        expect_success(&url, response).await.map(drop)
    }

    #[instrument(skip(self, request), fields(personality = %request.personality, conversation_id = ?request.conversation_id))]
    pub async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        let url = self.endpoint(&["api", "chat"]);
        let response = self.send(self.http.post(url.clone()).json(request), &url).await?;
        read_json(&url, response).await
    }

    #[instrument(skip(self))]
    pub async fn logout(&self) -> ApiResult<()> {
        let url = self.endpoint(&["auth", "logout"]);
        let response = self.send(self.http.get(url.clone()), &url).await?;
        expect_success(&url, response).await.map(drop)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> ApiResult<Response> {
        debug!(%url, "sending request");
        request.send().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })
    }
}

async fn expect_success(url: &Url, response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(ApiError::Server {
        url: url.to_string(),
        status,
        body,
    })
}

async fn read_json<T: DeserializeOwned>(url: &Url, response: Response) -> ApiResult<T> {
    let response = expect_success(url, response).await?;
    let body = response.text().await.map_err(|source| ApiError::Network {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| ApiError::Parse {
        url: url.to_string(),
        source,
    })
}
