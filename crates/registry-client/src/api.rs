//! Typed request execution over a [`Transport`]

use crate::config::ClientConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::transport::{ApiRequest, HttpTransport, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Executes requests and decodes their bodies
///
/// Cheap to clone; all services share one transport.
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create client over a transport
    #[inline]
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create client over HTTP
    ///
    /// # Errors
    /// `RegistryError::Config` if the configuration is invalid
    pub fn http(config: &ClientConfig) -> RegistryResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Send a request, mapping non-success statuses to errors
    ///
    /// # Errors
    /// - `RegistryError::Transport` when no response arrived
    /// - `RegistryError::Status` for non-2xx responses
    pub async fn execute(&self, request: ApiRequest) -> RegistryResult<Option<Value>> {
        let method = request.method;
        let path = request.path();
        tracing::debug!(%method, %path, "sending request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %path, error = %e, "request failed");
                return Err(e);
            }
        };

        if !response.is_success() {
            let err = RegistryError::from_status(response.status, response.body.as_ref());
            tracing::warn!(%method, %path, status = response.status, error = %err, "request rejected");
            return Err(err);
        }

        tracing::debug!(%method, %path, status = response.status, "request completed");
        Ok(response.body)
    }

    /// Send a request and decode the body as `T`
    ///
    /// # Errors
    /// As [`ApiClient::execute`], plus `RegistryError::Decode` when the body
    /// does not match `T`
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> RegistryResult<T> {
        let body = self.execute(request).await?.unwrap_or(Value::Null);
        serde_json::from_value(body).map_err(|e| RegistryError::decode(e.to_string()))
    }

    /// Send a request whose body is irrelevant
    ///
    /// # Errors
    /// As [`ApiClient::execute`]
    pub async fn send(&self, request: ApiRequest) -> RegistryResult<()> {
        self.execute(request).await.map(|_| ())
    }
}

/// Encode a payload as a JSON body
///
/// # Errors
/// `RegistryError::Decode` if the payload cannot be represented as JSON
pub(crate) fn to_body<T: serde::Serialize>(payload: &T) -> RegistryResult<Value> {
    serde_json::to_value(payload).map_err(|e| RegistryError::decode(e.to_string()))
}
