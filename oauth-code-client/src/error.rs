use thiserror::Error;

use crate::transport::BoxError;

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Host cannot be empty")]
    MissingHost,

    #[error("Code cannot be empty")]
    EmptyCode,

    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-200 answer from the token endpoint. The message is the server's
    /// `error` and `error_description` joined by `": "`.
    #[error("{error}: {description}")]
    Protocol {
        status: u16,
        error: String,
        description: String,
    },

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OAuthError {
    /// HTTP status of a rejected token request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, OAuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_message_joins_error_and_description() {
        let err = OAuthError::Protocol {
            status: 400,
            error: "invalid_grant".to_string(),
            description: "code expired".to_string(),
        };
        assert_eq!(err.to_string(), "invalid_grant: code expired");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_protocol_message_with_empty_fields() {
        let err = OAuthError::Protocol {
            status: 502,
            error: String::new(),
            description: String::new(),
        };
        assert_eq!(err.to_string(), ": ");
    }

    #[test]
    fn test_transport_keeps_source() {
        use std::error::Error as _;

        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = OAuthError::Transport(Box::new(cause));
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("refused"));
    }
}
