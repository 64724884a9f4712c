use std::sync::Arc;

use super::collection::{Collection, CollectionState};
use crate::api::{GatewayError, UserGateway};
use crate::models::{User, UserUpdate};
use crate::notify::{Notice, Notifier};

/// Client-side user directory. Same reconciliation rules as
/// [`BookStore`](super::BookStore).
pub struct UserStore {
    gateway: Arc<dyn UserGateway>,
    notifier: Arc<dyn Notifier>,
    users: Collection<User>,
}

impl UserStore {
    pub fn new(gateway: Arc<dyn UserGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            users: Collection::new(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<User> {
        self.users.snapshot()
    }

    pub async fn fetch_all(&self) -> Result<(), GatewayError> {
        let _flight = self.users.begin().await;
        match self.gateway.list().await {
            Ok(response) => {
                self.users.settle(|state| state.replace_all(response.data));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn update(&self, id: &str, update: &UserUpdate) -> Result<(), GatewayError> {
        let _flight = self.users.begin().await;
        match self.gateway.update(id, update).await {
            Ok(response) => {
                self.users.settle(|state| state.replace(id, response.data));
                self.notifier
                    .notify(Notice::success("User updated successfully!"));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    pub async fn remove(&self, id: &str) -> Result<(), GatewayError> {
        let _flight = self.users.begin().await;
        match self.gateway.delete(id).await {
            Ok(_) => {
                self.users.settle(|state| state.remove(id));
                self.notifier
                    .notify(Notice::success("User deleted successfully!"));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: GatewayError) -> GatewayError {
        let message = err.message();
        tracing::warn!("user action failed: {}", message);
        self.users.fail(message.clone());
        self.notifier.notify(Notice::error(message));
        err
    }
}
