use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::error::{GatewayError, Operation};
use crate::models::{LoginPayload, RegisterPayload, User};

/// `POST /auth/register` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub data: User,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /auth/login` response. Servers differ on whether the user object
/// comes back, and under which key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub data: Option<User>,
}

/// `GET /auth/me` answers with either an envelope or the bare user.
#[derive(Deserialize)]
#[serde(untagged)]
enum MeResponse {
    Wrapped { data: User },
    Bare(User),
}

impl From<MeResponse> for User {
    fn from(response: MeResponse) -> Self {
        match response {
            MeResponse::Wrapped { data } => data,
            MeResponse::Bare(user) => user,
        }
    }
}

/// Remote account service.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn register(&self, payload: &RegisterPayload) -> Result<RegisterResponse, GatewayError>;

    async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, GatewayError>;

    /// Current user for the held token.
    async fn me(&self) -> Result<User, GatewayError>;
}

/// [`AuthGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthGateway for AuthApi {
    async fn register(&self, payload: &RegisterPayload) -> Result<RegisterResponse, GatewayError> {
        self.client
            .post("/auth/register", payload)
            .await
            .map_err(|e| GatewayError::new(Operation::Register, e))
    }

    async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, GatewayError> {
        self.client
            .post("/auth/login", payload)
            .await
            .map_err(|e| GatewayError::new(Operation::Login, e))
    }

    async fn me(&self) -> Result<User, GatewayError> {
        self.client
            .get::<MeResponse>("/auth/me")
            .await
            .map(User::from)
            .map_err(|e| GatewayError::new(Operation::FetchMe, e))
    }
}
