use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::envelope::Envelope;
use super::error::ApiError;
use crate::auth::SharedSession;
use crate::config::Config;

/// HTTP client shared by every resource client
///
/// All calls go to `{base_url}/api/{path}` and carry the session's bearer
/// token when one is present. Responses are unwrapped from the envelope.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SharedSession,
}

impl ApiClient {
    pub fn new(config: &Config, session: SharedSession) -> Result<Self, ApiError> {
        // Normalize URL - ensure no trailing slash
        let base_url = config.api_base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "'{}' must start with http:// or https://",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Build full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> Option<String> {
        self.session
            .read()
            .ok()
            .and_then(|s| s.access_token().map(str::to_string))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("{} {}", method, url);

        let request = self.client.request(method, &url);
        match self.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET returning the envelope's result
    pub async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).query(query);
        self.send::<T>(request).await?.into_result()
    }

    /// POST a JSON body, returning the envelope's result
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.send::<T>(request).await?.into_result()
    }

    /// PUT a JSON body, returning the envelope's result
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.send::<T>(request).await?.into_result()
    }

    /// POST where only success matters; returns the server message
    pub async fn post_ack<B>(&self, path: &str, body: &B) -> Result<Option<String>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).json(body);
        self.send_ack(request).await
    }

    /// DELETE; returns the server message
    pub async fn delete(&self, path: &str) -> Result<Option<String>, ApiError> {
        let request = self.request(Method::DELETE, path);
        self.send_ack(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, ApiError> {
        let body = self.send_text(request).await?;
        decode_envelope(&body)
    }

    /// A 2xx with no body (204 No Content) counts as success
    async fn send_ack(&self, request: RequestBuilder) -> Result<Option<String>, ApiError> {
        let body = self.send_text(request).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        decode_envelope::<serde_json::Value>(&body)?.into_ack()
    }

    /// Send and read the body, mapping non-2xx statuses to errors
    async fn send_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            log::warn!("API responded {}: {}", status, message.as_deref().unwrap_or("<no message>"));
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized { message },
                StatusCode::NOT_FOUND => ApiError::NotFound { message },
                _ => ApiError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }
        Ok(body)
    }
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if !envelope.is_success {
        log::info!(
            "API rejected request: {}",
            envelope.message.as_deref().unwrap_or("<no message>")
        );
    }
    Ok(envelope)
}

/// Pull a message out of an error body: an envelope message, a `title`
/// (ASP.NET problem details), or short plain text
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["message", "title", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string),
        Err(_) if body.len() <= 200 && !body.starts_with('<') => Some(body.to_string()),
        Err(_) => None,
    }
}
