use async_trait::async_trait;

use super::client::{path_segment, ApiClient};
use super::error::{GatewayError, Operation};
use super::{Ack, Envelope};
use crate::models::{Book, BookPayload, BookUpdate};

/// Remote book catalog.
#[async_trait]
pub trait BookGateway: Send + Sync {
    /// `GET /book`
    async fn list(&self) -> Result<Envelope<Vec<Book>>, GatewayError>;

    /// `POST /book`
    async fn create(&self, payload: &BookPayload) -> Result<Envelope<Book>, GatewayError>;

    /// `PATCH /book/{id}`
    async fn update(&self, id: &str, payload: &BookUpdate)
        -> Result<Envelope<Book>, GatewayError>;

    /// `DELETE /book/{id}`
    async fn delete(&self, id: &str) -> Result<Ack, GatewayError>;
}

/// [`BookGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct BookApi {
    client: ApiClient,
}

impl BookApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BookGateway for BookApi {
    async fn list(&self) -> Result<Envelope<Vec<Book>>, GatewayError> {
        self.client
            .get("/book")
            .await
            .map_err(|e| GatewayError::new(Operation::ListBooks, e))
    }

    async fn create(&self, payload: &BookPayload) -> Result<Envelope<Book>, GatewayError> {
        self.client
            .post("/book", payload)
            .await
            .map_err(|e| GatewayError::new(Operation::CreateBook, e))
    }

    async fn update(
        &self,
        id: &str,
        payload: &BookUpdate,
    ) -> Result<Envelope<Book>, GatewayError> {
        let path = format!("/book/{}", path_segment(id));
        self.client
            .patch(&path, payload)
            .await
            .map_err(|e| GatewayError::new(Operation::UpdateBook, e))
    }

    async fn delete(&self, id: &str) -> Result<Ack, GatewayError> {
        let path = format!("/book/{}", path_segment(id));
        self.client
            .delete::<Option<Ack>>(&path)
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| GatewayError::new(Operation::DeleteBook, e))
    }
}
