use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex as FlightLock, MutexGuard};

use crate::api::{AuthGateway, Credentials, GatewayError};
use crate::models::{LoginPayload, RegisterPayload, User};
use crate::notify::{Notice, Notifier};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Session slice of the client state.
///
/// Holding a token is all it takes to count as signed in: there is no
/// expiry or signature check on this side. The token is mirrored into the
/// shared [`Credentials`] so every gateway built on the same handle sends it.
pub struct AuthStore {
    gateway: Arc<dyn AuthGateway>,
    notifier: Arc<dyn Notifier>,
    credentials: Credentials,
    state: Mutex<AuthState>,
    flight: FlightLock<()>,
}

impl AuthStore {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        credentials: Credentials,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = AuthState {
            token: credentials.token(),
            ..Default::default()
        };
        Self {
            gateway,
            notifier,
            credentials,
            state: Mutex::new(state),
            flight: FlightLock::new(()),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.lock().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.lock().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.lock().token.is_some()
    }

    /// Adopts a token saved by an earlier session.
    pub fn restore(&self, token: impl Into<String>) {
        let token = token.into();
        self.credentials.set(token.clone());
        self.state.lock().token = Some(token);
    }

    pub fn logout(&self) {
        self.credentials.clear();
        *self.state.lock() = AuthState::default();
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<(), GatewayError> {
        let _flight = self.begin().await;
        match self.gateway.register(payload).await {
            Ok(response) => {
                tracing::info!("registered as {}", response.data.username);
                self.sign_in(response.token, Some(response.data));
                self.state.lock().loading = false;
                self.notifier
                    .notify(Notice::success("Registered successfully!"));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Signs in. When the server does not send the user back, it is fetched
    /// with the fresh token.
    pub async fn login(&self, payload: &LoginPayload) -> Result<(), GatewayError> {
        let _flight = self.begin().await;
        let response = match self.gateway.login(payload).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail(err)),
        };

        self.sign_in(response.token, response.data);
        let needs_user = self.state.lock().user.is_none();
        if needs_user {
            match self.gateway.me().await {
                Ok(user) => self.state.lock().user = Some(user),
                Err(err) => {
                    // No user means no session
                    self.sign_out();
                    return Err(self.fail(err));
                }
            }
        }
        self.state.lock().loading = false;

        let message = response
            .message
            .unwrap_or_else(|| "Logged in successfully!".to_string());
        self.notifier.notify(Notice::success(message));
        Ok(())
    }

    /// Refreshes the current user for the held token.
    pub async fn fetch_me(&self) -> Result<(), GatewayError> {
        let _flight = self.begin().await;
        match self.gateway.me().await {
            Ok(user) => {
                let mut state = self.state.lock();
                state.user = Some(user);
                state.loading = false;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn begin(&self) -> MutexGuard<'_, ()> {
        let guard = self.flight.lock().await;
        let mut state = self.state.lock();
        state.loading = true;
        state.error = None;
        guard
    }

    fn sign_in(&self, token: String, user: Option<User>) {
        self.credentials.set(token.clone());
        let mut state = self.state.lock();
        state.token = Some(token);
        state.user = user;
    }

    fn sign_out(&self) {
        self.credentials.clear();
        let mut state = self.state.lock();
        state.token = None;
        state.user = None;
    }

    fn fail(&self, err: GatewayError) -> GatewayError {
        let message = err.message();
        tracing::warn!("auth action failed: {}", message);
        {
            let mut state = self.state.lock();
            state.loading = false;
            state.error = Some(message.clone());
        }
        self.notifier.notify(Notice::error(message));
        err
    }
}
