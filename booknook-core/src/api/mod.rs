//! REST gateways: one typed call per remote operation.
//!
//! Each resource has a gateway trait, so stores can be driven by in-memory
//! fakes, and an HTTP implementation on top of [`ApiClient`].

mod auth;
mod books;
mod client;
mod error;
mod users;

use serde::{Deserialize, Serialize};

pub use auth::{AuthApi, AuthGateway, LoginResponse, RegisterResponse};
pub use books::{BookApi, BookGateway};
pub use client::{path_segment, ApiClient, Credentials};
pub use error::{ClientError, GatewayError, Operation, TransportError};
pub use users::{UserApi, UserGateway};

/// Standard response wrapper: `{ data, message? }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Response to a delete: an optional message, or an empty body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
