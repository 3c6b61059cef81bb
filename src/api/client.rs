//! Chat Backend REST Client
//!
//! HTTP client for the chat service. Every request reads the credential
//! from storage at call time and, when one exists, sends it as
//! `Authorization: Token <credential>`.

use crate::api::dto::{
    AuthResponse, Credentials, Message, MessageListParams, NewMessage, Profile, ProfileUpdate,
};
use crate::api::error::{ApiError, ApiResult, ErrorBody};
use crate::api::ChatBackend;
use crate::config::ApiConfig;
use crate::session::AUTH_TOKEN_KEY;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Scheme word placed before the credential in the `Authorization` header
pub const AUTH_SCHEME: &str = "Token";

/// Chat backend REST client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a client for the backend at `config.base_url`
    ///
    /// `storage` is where the credential is looked up on every request.
    pub fn new(config: &ApiConfig, storage: Arc<dyn KeyValueStore>) -> ApiResult<Self> {
        // No client-side timeout: a call lasts as long as the server takes
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current credential, read fresh from storage
    ///
    /// A failing read is logged and treated as "no credential".
    fn credential(&self) -> Option<String> {
        match self.storage.get_item(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read credential from storage");
                None
            }
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "Sending request");

        let builder = self.client.request(method, url);
        match self.credential() {
            Some(token) => builder.header(AUTHORIZATION, format!("{} {}", AUTH_SCHEME, token)),
            None => builder,
        }
    }

    /// Send once and decode the JSON answer; no retries
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Request rejected");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                body: ErrorBody::parse(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn register(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let builder = self
            .request(Method::POST, "/api/auth/register")
            .json(credentials);
        self.execute(builder).await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let builder = self.request(Method::POST, "/api/auth/login").json(credentials);
        self.execute(builder).await
    }

    async fn get_profile(&self) -> ApiResult<Profile> {
        let builder = self.request(Method::GET, "/api/auth/profile");
        self.execute(builder).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Profile> {
        let builder = self.request(Method::PUT, "/api/auth/profile").json(update);
        self.execute(builder).await
    }

    async fn fetch_messages(&self, limit: Option<u32>) -> ApiResult<Vec<Message>> {
        let mut builder = self.request(Method::GET, "/api/chat/messages");
        if let Some(limit) = limit.filter(|l| *l > 0) {
            builder = builder.query(&MessageListParams { limit });
        }

        let messages: Option<Vec<Message>> = self.execute(builder).await?;
        Ok(messages.unwrap_or_default())
    }

    async fn send_message(&self, message: &NewMessage) -> ApiResult<Message> {
        let builder = self
            .request(Method::POST, "/api/chat/messages")
            .json(message);
        self.execute(builder).await
    }
}
