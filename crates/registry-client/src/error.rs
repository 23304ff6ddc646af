//! Error types for the registry client
//!
//! Three failure classes reach callers:
//! - Transport failures (no response at all)
//! - Non-success statuses (the server rejected the request)
//! - Name lookups that matched nothing in the loaded list
//!
//! None of them is fatal; page controllers turn them into notifications.

use registry_model::EntityKind;
use serde_json::Value;

/// Message shown when the server does not explain a failure
pub const GENERIC_ERROR_MESSAGE: &str = "Произошла ошибка при обращении к серверу";

/// Main registry error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// No response was received
    #[error("transport error: {message}")]
    Transport {
        /// Underlying transport message
        message: String,
    },

    /// Server answered with a non-success status
    #[error("server returned {status}: {}", .server_message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Status {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, when the server sent one
        server_message: Option<String>,
    },

    /// Success status with a body that does not match the expected type
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder message
        message: String,
    },

    /// Exact name lookup found no match in the loaded list
    #[error("{kind} not found by name: '{name}'")]
    NotFoundByName {
        /// Kind of entity looked up
        kind: EntityKind,
        /// Name that matched nothing
        name: String,
    },

    /// Invalid or unreadable configuration
    #[error("configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

impl RegistryError {
    /// Create transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create name lookup miss
    pub fn not_found_by_name(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFoundByName {
            kind,
            name: name.into(),
        }
    }

    /// Build a status error from a response body
    ///
    /// Picks up the `message` field of a JSON object body, or a bare JSON
    /// string body. Blank messages count as absent.
    #[must_use]
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let server_message = body
            .and_then(|b| match b {
                Value::Object(map) => map.get("message").and_then(Value::as_str),
                Value::String(s) => Some(s.as_str()),
                _ => None,
            })
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Self::Status {
            status,
            server_message,
        }
    }

    /// HTTP status, for server rejections
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server reported the target as missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Whether no response was received
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Localized text for the user
    ///
    /// A server-provided message wins; name misses get their own text;
    /// everything else falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                server_message: Some(message),
                ..
            } => message.clone(),
            Self::NotFoundByName { kind, name } => {
                format!("{} «{}» не найден", kind.label(), name)
            }
            _ => fallback.to_string(),
        }
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_picks_server_message() {
        let body = json!({"message": "Группа уже существует"});
        let err = RegistryError::from_status(409, Some(&body));
        assert_eq!(err.status_code(), Some(409));
        assert_eq!(err.user_message("fallback"), "Группа уже существует");
        assert!(err.to_string().contains("Группа уже существует"));
    }

    #[test]
    fn status_error_without_message_uses_generic_text() {
        let err = RegistryError::from_status(500, None);
        assert!(err.to_string().contains(GENERIC_ERROR_MESSAGE));
        assert_eq!(err.user_message("Ошибка загрузки"), "Ошибка загрузки");

        let blank = RegistryError::from_status(400, Some(&json!({"message": "  "})));
        assert_eq!(blank.user_message("x"), "x");
    }

    #[test]
    fn not_found_by_name_is_distinct_from_transport() {
        let err = RegistryError::not_found_by_name(EntityKind::Student, "Ann");
        assert!(!err.is_transport());
        assert!(!err.is_not_found());
        assert_eq!(err.user_message("x"), "Студент «Ann» не найден");
    }

    #[test]
    fn not_found_status() {
        assert!(RegistryError::from_status(404, None).is_not_found());
        assert!(RegistryError::transport("refused").is_transport());
    }
}
