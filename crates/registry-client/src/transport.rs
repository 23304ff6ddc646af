//! Transport layer
//!
//! [`Transport`] is the seam between the resource services and the network.
//! [`HttpTransport`] implements it with reqwest; tests plug in an in-memory
//! server instead.

use crate::config::ClientConfig;
use crate::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::fmt;

/// HTTP method subset used by the registry API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A request relative to the API root
///
/// Path segments are kept unencoded; the transport encodes them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path segments below the API root
    pub segments: Vec<String>,
    /// Query parameters in order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create request
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            method,
            segments: segments.into_iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET request
    pub fn get<I: IntoIterator<Item = S>, S: ToString>(segments: I) -> Self {
        Self::new(Method::Get, segments)
    }

    /// POST request
    pub fn post<I: IntoIterator<Item = S>, S: ToString>(segments: I) -> Self {
        Self::new(Method::Post, segments)
    }

    /// PUT request
    pub fn put<I: IntoIterator<Item = S>, S: ToString>(segments: I) -> Self {
        Self::new(Method::Put, segments)
    }

    /// DELETE request
    pub fn delete<I: IntoIterator<Item = S>, S: ToString>(segments: I) -> Self {
        Self::new(Method::Delete, segments)
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn with_query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Unencoded path, e.g. `/students/3`
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Query parameter value by key
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A decoded response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body; `None` when empty
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Create response
    #[inline]
    #[must_use]
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// 200 with a JSON body
    #[inline]
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::new(200, Some(body))
    }

    /// Whether the status is 2xx
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the registry API
///
/// Exactly one attempt per call; retrying is the caller's decision.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send a request and return the raw response
    ///
    /// # Errors
    /// `RegistryError::Transport` if no response was received. Non-success
    /// statuses are returned as responses, not errors.
    async fn send(&self, request: ApiRequest) -> RegistryResult<ApiResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create transport from configuration
    ///
    /// # Errors
    /// `RegistryError::Config` if the base URL is invalid or the HTTP client
    /// cannot be built
    pub fn new(config: &ClientConfig) -> RegistryResult<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RegistryError::config(format!("invalid base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RegistryError::config("base_url cannot be a base URL"));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RegistryError::config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// API root
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of a request, with percent-encoded segments and query
    ///
    /// # Errors
    /// `RegistryError::Config` if the base URL cannot carry path segments
    pub fn url_for(&self, request: &ApiRequest) -> RegistryResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| RegistryError::config("base_url cannot be a base URL"))?;
            segments.pop_if_empty();
            segments.extend(&request.segments);
        }
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> RegistryResult<ApiResponse> {
        let url = self.url_for(&request)?;
        let mut builder = self.client.request(request.method.into(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RegistryError::transport(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RegistryError::transport(e.to_string()))?;

        let body = if bytes.is_empty() {
            None
        } else {
            // Non-JSON bodies (plain-text errors) are kept as a JSON string
            Some(serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }))
        };

        Ok(ApiResponse::new(status, body))
    }
}
