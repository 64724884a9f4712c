use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::client::{path_segment, ApiClient};
use super::error::{ClientError, GatewayError, Operation};
use super::{Ack, Envelope};
use crate::models::{User, UserUpdate};

/// Remote user directory.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// `GET /users`
    async fn list(&self) -> Result<Envelope<Vec<User>>, GatewayError>;

    /// `PATCH /user/{id}` as a multipart form.
    async fn update(&self, id: &str, update: &UserUpdate) -> Result<Envelope<User>, GatewayError>;

    /// `DELETE /user/{id}`
    async fn delete(&self, id: &str) -> Result<Ack, GatewayError>;
}

/// [`UserGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct UserApi {
    client: ApiClient,
}

impl UserApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn user_form(update: &UserUpdate) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for (name, value) in update.text_fields() {
        form = form.text(name, value);
    }

    if let Some(avatar) = &update.avatar {
        let part = Part::bytes(avatar.bytes.clone())
            .file_name(avatar.file_name.clone())
            .mime_str(&avatar.mime_type)
            .map_err(|e| ClientError::Build(e.to_string()))?;
        form = form.part("avatar", part);
    }

    Ok(form)
}

#[async_trait]
impl UserGateway for UserApi {
    async fn list(&self) -> Result<Envelope<Vec<User>>, GatewayError> {
        self.client
            .get("/users")
            .await
            .map_err(|e| GatewayError::new(Operation::ListUsers, e))
    }

    async fn update(&self, id: &str, update: &UserUpdate) -> Result<Envelope<User>, GatewayError> {
        let form = user_form(update).map_err(|e| GatewayError::new(Operation::UpdateUser, e))?;
        let path = format!("/user/{}", path_segment(id));
        self.client
            .patch_multipart(&path, form)
            .await
            .map_err(|e| GatewayError::new(Operation::UpdateUser, e))
    }

    async fn delete(&self, id: &str) -> Result<Ack, GatewayError> {
        let path = format!("/user/{}", path_segment(id));
        self.client
            .delete::<Option<Ack>>(&path)
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| GatewayError::new(Operation::DeleteUser, e))
    }
}
