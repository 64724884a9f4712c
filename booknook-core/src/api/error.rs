//! API error types.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The request never produced a usable response: the network call failed or
/// the server answered with a non-2xx status.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned status {status}")]
    Status {
        status: u16,
        /// Decoded error body, if the server sent one.
        payload: Option<Value>,
    },
}

impl TransportError {
    /// The message the server supplied with the failure, if any.
    ///
    /// An object payload contributes its string `message` field; a bare
    /// non-empty string payload is the message itself.
    pub fn server_message(&self) -> Option<String> {
        let TransportError::Status {
            payload: Some(payload),
            ..
        } = self
        else {
            return None;
        };

        match payload {
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .map(String::from),
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(_) => None,
        }
    }
}

/// Everything the HTTP adapter can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 2xx response whose body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    Build(String),
}

/// The remote operation a gateway performs. Each carries the message shown
/// when the server does not explain a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListBooks,
    CreateBook,
    UpdateBook,
    DeleteBook,
    Register,
    Login,
    FetchMe,
    ListUsers,
    UpdateUser,
    DeleteUser,
}

impl Operation {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::ListBooks => "Fetching books failed",
            Operation::CreateBook => "Creating book failed",
            Operation::UpdateBook => "Updating book failed",
            Operation::DeleteBook => "Deleting book failed",
            Operation::Register => "Registration failed",
            Operation::Login => "Login failed. Please try again.",
            Operation::FetchMe => "Failed to fetch user information.",
            Operation::ListUsers => "Fetching users failed",
            Operation::UpdateUser => "Updating user failed",
            Operation::DeleteUser => "Deleting user failed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ListBooks => "list books",
            Operation::CreateBook => "create book",
            Operation::UpdateBook => "update book",
            Operation::DeleteBook => "delete book",
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::FetchMe => "fetch current user",
            Operation::ListUsers => "list users",
            Operation::UpdateUser => "update user",
            Operation::DeleteUser => "delete user",
        };
        write!(f, "{}", name)
    }
}

/// A failed gateway call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure, labelled with the server's message or the
    /// operation's fallback.
    #[error("{message}")]
    Request {
        operation: Operation,
        message: String,
        #[source]
        source: TransportError,
    },

    /// Anything that is not a transport failure, passed through as-is.
    #[error(transparent)]
    Client(ClientError),
}

impl GatewayError {
    pub fn new(operation: Operation, err: ClientError) -> Self {
        match err {
            ClientError::Transport(source) => {
                let message = source
                    .server_message()
                    .unwrap_or_else(|| operation.fallback_message().to_string());
                GatewayError::Request {
                    operation,
                    message,
                    source,
                }
            }
            other => GatewayError::Client(other),
        }
    }

    /// The text recorded in store state and shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Request { source, .. } => source.status(),
            GatewayError::Client(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(payload: Option<Value>) -> TransportError {
        TransportError::Status {
            status: 400,
            payload,
        }
    }

    #[test]
    fn test_server_message_from_object() {
        let err = status(Some(json!({ "message": "Title is required" })));
        assert_eq!(err.server_message().as_deref(), Some("Title is required"));
    }

    #[test]
    fn test_server_message_from_string() {
        let err = status(Some(json!("Unauthorized")));
        assert_eq!(err.server_message().as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_server_message_absent() {
        assert_eq!(status(None).server_message(), None);
        assert_eq!(status(Some(json!({ "error": "x" }))).server_message(), None);
        assert_eq!(status(Some(json!(""))).server_message(), None);
        assert_eq!(
            TransportError::Network("connection refused".into()).server_message(),
            None
        );
    }

    #[test]
    fn test_gateway_error_uses_fallback() {
        let err = GatewayError::new(
            Operation::ListBooks,
            TransportError::Network("connection refused".into()).into(),
        );
        assert_eq!(err.message(), "Fetching books failed");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_fallback_message_per_operation() {
        let cases = [
            (Operation::ListBooks, "Fetching books failed"),
            (Operation::CreateBook, "Creating book failed"),
            (Operation::UpdateBook, "Updating book failed"),
            (Operation::DeleteBook, "Deleting book failed"),
            (Operation::Register, "Registration failed"),
            (Operation::Login, "Login failed. Please try again."),
            (Operation::FetchMe, "Failed to fetch user information."),
            (Operation::ListUsers, "Fetching users failed"),
            (Operation::UpdateUser, "Updating user failed"),
            (Operation::DeleteUser, "Deleting user failed"),
        ];
        for (operation, expected) in cases {
            assert_eq!(operation.fallback_message(), expected);

            let err = GatewayError::new(
                operation,
                TransportError::Status {
                    status: 500,
                    payload: None,
                }
                .into(),
            );
            assert_eq!(err.message(), expected, "{}", operation);
        }
    }

    #[test]
    fn test_gateway_error_prefers_server_message() {
        let err = GatewayError::new(
            Operation::CreateBook,
            status(Some(json!({ "message": "Duplicate title" }))).into(),
        );
        assert_eq!(err.message(), "Duplicate title");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_decode_error_passes_through() {
        let err = GatewayError::new(
            Operation::ListBooks,
            ClientError::Decode("missing field `data`".into()),
        );
        assert!(matches!(err, GatewayError::Client(ClientError::Decode(_))));
        assert!(err.message().contains("missing field"));
    }
}
