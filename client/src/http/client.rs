//! HTTP client implementation

use std::sync::Arc;

use async_trait::async_trait;
use http::header::{self, HeaderMap, HeaderValue};
use http::Method;
use openapi_client::models::Outcome;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::errors::{ApiError, CoolifyError};

/// Path prefix of the versioned API
pub const API_PREFIX: &str = "/api/v1";

/// Join `segments` into an endpoint path, percent-encoding each one
///
/// Ids come from user input, so a segment can never add path levels or a
/// query. Empty, `.` and `..` segments are rejected.
pub fn endpoint(segments: &[&str]) -> Result<String, CoolifyError> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| CoolifyError::Internal(e.to_string()))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| CoolifyError::Internal("Base URL has no path".to_string()))?;
        path.clear();
        for segment in segments {
            if matches!(*segment, "" | "." | "..") {
                return Err(CoolifyError::Validation(format!(
                    "Invalid identifier: {:?}",
                    segment
                )));
            }
            path.push(segment);
        }
    }
    Ok(url.path().to_string())
}

/// Server address and bearer token for one request
#[derive(Debug, Clone)]
pub struct Credentials {
    pub server_address: String,
    pub api_token: SecretString,
}

/// Where the client looks up the configured instance
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn server_address(&self) -> Option<String>;

    async fn api_token(&self) -> Option<SecretString>;
}

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Merged over the default headers
    pub headers: HeaderMap,
    /// Return the body as raw text instead of parsing JSON
    pub is_text: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
            is_text: false,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn text() -> Self {
        Self {
            is_text: true,
            ..Self::default()
        }
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, CoolifyError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Result of checking a candidate token against `/version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValidation {
    pub success: bool,
    pub message: Option<String>,
    /// Instance version, reported on success
    pub version: Option<String>,
}

/// HTTP client for the Coolify API
pub struct HttpClient {
    client: Client,
    credentials: Arc<dyn CredentialsProvider>,
}

impl HttpClient {
    pub fn new(credentials: Arc<dyn CredentialsProvider>) -> Result<Self, CoolifyError> {
        let client = Client::builder()
            .user_agent(concat!("coolkit/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Resolve the configured server address and token
    pub async fn credentials(&self) -> Result<Credentials, CoolifyError> {
        let server_address = self
            .credentials
            .server_address()
            .await
            .ok_or_else(|| CoolifyError::Configuration("Server address not found".to_string()))?;
        let api_token = self
            .credentials
            .api_token()
            .await
            .ok_or_else(|| CoolifyError::Configuration("API token not found".to_string()))?;

        Ok(Credentials {
            server_address,
            api_token,
        })
    }

    /// Make an authenticated request against `/api/v1{endpoint}`
    ///
    /// With `is_text` the raw body is decoded as a JSON string, so `T` is
    /// typically `String` in that mode.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, CoolifyError> {
        let credentials = self.credentials().await?;
        self.request_with(&credentials, endpoint, options).await
    }

    /// Same as [`HttpClient::request`] with explicit credentials
    pub async fn request_with<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, CoolifyError> {
        let is_text = options.is_text;
        let body = self.execute(Some(credentials), &credentials.server_address, endpoint, options).await?;

        let value = if is_text {
            Value::String(body)
        } else if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)?
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Send the request and return the body of a successful response
    async fn execute(
        &self,
        credentials: Option<&Credentials>,
        server_address: &str,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<String, CoolifyError> {
        let url = format!("{}{}{}", server_address, API_PREFIX, endpoint);
        debug!("{} {}", options.method, url);

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(credentials) = credentials {
            let bearer = format!("Bearer {}", credentials.api_token.expose_secret());
            let mut value = HeaderValue::from_str(&bearer)
                .map_err(|e| CoolifyError::Validation(format!("Invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self.client.request(options.method.clone(), &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(|e| {
            error!("HTTP {} {} failed: {}", options.method, url, e);
            CoolifyError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() >= 400 {
            error!("HTTP {} {} failed: {} - {}", options.method, url, status, body);
            return Err(CoolifyError::Domain(ApiError::from_body(
                Some(status.as_u16()),
                &body,
            )));
        }

        Ok(body)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoolifyError> {
        self.request(path, RequestOptions::get()).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoolifyError> {
        self.request(path, RequestOptions::method(Method::POST).with_body(body)?)
            .await
    }

    /// POST without a body, as the action endpoints expect
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoolifyError> {
        self.request(path, RequestOptions::method(Method::POST)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CoolifyError> {
        self.request(path, RequestOptions::method(Method::PATCH).with_body(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoolifyError> {
        self.request(path, RequestOptions::method(Method::DELETE)).await
    }

    /// Probe `<address>/api/v1/health` without credentials and return the body
    pub async fn health(&self, server_address: &str) -> Result<String, CoolifyError> {
        self.execute(None, server_address, "/health", RequestOptions::text())
            .await
    }

    /// Check `token` against `/version` on `server_address`
    ///
    /// A rejection by the server is reported in the result, not as an error;
    /// transport failures are still errors.
    pub async fn validate_token(
        &self,
        server_address: &str,
        token: &SecretString,
    ) -> Result<TokenValidation, CoolifyError> {
        let credentials = Credentials {
            server_address: server_address.to_string(),
            api_token: token.clone(),
        };

        match self
            .execute(Some(&credentials), server_address, "/version", RequestOptions::text())
            .await
        {
            Ok(body) => Ok(classify_version_body(&body)),
            Err(CoolifyError::Domain(e)) => Ok(TokenValidation {
                success: false,
                message: e.message,
                version: None,
            }),
            Err(e) => Err(e),
        }
    }
}

/// A `/version` body is plain text on success, but some instances answer 200
/// with `{message, success: false}`.
fn classify_version_body(body: &str) -> TokenValidation {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if map.get("success") == Some(&Value::Bool(false)) {
            return TokenValidation {
                success: false,
                message: map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                version: None,
            };
        }
    }

    TokenValidation {
        success: true,
        message: None,
        version: Some(body.trim().trim_matches('"').to_string()),
    }
}

/// Decode a body that may carry an error message in place of the success shape
pub fn decode_outcome<T: DeserializeOwned>(value: Value) -> Result<T, CoolifyError> {
    match serde_json::from_value::<Outcome<T>>(value)? {
        Outcome::Success(v) => Ok(v),
        Outcome::Failure(e) => Err(CoolifyError::Domain(ApiError::from_response(None, e))),
    }
}
