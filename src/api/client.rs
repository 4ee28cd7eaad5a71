use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::auth::{bearer_header, Authenticator, SessionToken};
use super::types::{AuthResponse, Credentials, Todo, User};
use crate::config::ApiConfig;
use crate::error::{ApiError, Error, Result};
use crate::storage::{keys, Storage};

/// HTTP+JSON client for the remote resource API.
///
/// Any token persisted under `auth-token` is attached as a bearer header to
/// every outgoing request; it is read fresh for each call so a login or
/// logout elsewhere takes effect immediately.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    storage: Storage,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, storage: Storage) -> Result<Self> {
        let base_url = normalize_base(&config.base_url)?;

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .user_agent(concat!("starter-core/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(u64::from(secs)));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            storage,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn todos(&self) -> Result<Vec<Todo>> {
        self.get("todos", &[]).await
    }

    pub async fn todos_by_user(&self, user_id: u64) -> Result<Vec<Todo>> {
        self.get("todos", &[("userId", user_id.to_string())]).await
    }

    pub async fn todo(&self, id: u64) -> Result<Todo> {
        self.get(&format!("todos/{}", id), &[]).await
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.get("users", &[]).await
    }

    pub async fn user(&self, id: u64) -> Result<User> {
        self.get(&format!("users/{}", id), &[]).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        let (status, body) = self.execute(Method::GET, url, None::<&()>).await?;
        decode(status, body)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, payload: &B) -> Result<(StatusCode, String)> {
        let url = self.endpoint(path)?;
        self.execute(Method::POST, url, Some(payload)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Api(ApiError::new(format!("Invalid endpoint '{}': {}", path, e))))
    }

    async fn authorize(&self, mut builder: RequestBuilder) -> RequestBuilder {
        let token: Option<SessionToken> = self.storage.get_json(keys::AUTH_TOKEN).await;
        if let Some((name, value)) = token.as_ref().and_then(bearer_header) {
            builder = builder.header(name, value);
        }
        builder
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        payload: Option<&B>,
    ) -> Result<(StatusCode, String)> {
        let started = Instant::now();
        let path = url.path().to_string();

        let mut builder = self.http.request(method.clone(), url);
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }
        let builder = self.authorize(builder).await;

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path = %path, error = %e, "Request failed");
            ApiError::new(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ApiError::new(format!("Failed to read response body: {}", e)).with_status(status.as_u16())
        })?;

        tracing::debug!(
            %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        if !status.is_success() {
            return Err(Error::Api(error_from_response(status, body)));
        }
        Ok((status, body))
    }
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse> {
        credentials.validate()?;
        let (status, body) = self.post("auth/login", credentials).await?;
        decode(status, body)
    }

    async fn invalidate(&self, token: &SessionToken) -> Result<()> {
        let url = self.endpoint("auth/logout")?;
        let mut builder = self.http.post(url);
        if let Some((name, value)) = bearer_header(token) {
            builder = builder.header(name, value);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::new(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Api(error_from_response(status, body)))
    }
}

fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ApiError::new(format!("Invalid base URL '{}': {}", raw, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<T> {
    serde_json::from_str(&body).map_err(|e| {
        Error::Api(
            ApiError::new(format!("Invalid response body: {}", e))
                .with_status(status.as_u16())
                .with_body(body),
        )
    })
}

/// Build an [`ApiError`] from a non-2xx response.
///
/// The message is taken from a JSON `message` or `error` string field when
/// present, otherwise from the status' canonical reason.
fn error_from_response(status: StatusCode, body: String) -> ApiError {
    let from_body = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            ["message", "error"].iter().find_map(|field| {
                value
                    .get(field)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
            })
        });
    let message = from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();

    let error = ApiError::new(message).with_status(status.as_u16());
    if body.is_empty() {
        error
    } else {
        error.with_body(body)
    }
}
