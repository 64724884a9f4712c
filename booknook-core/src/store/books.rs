use std::sync::Arc;

use super::collection::{Collection, CollectionState};
use crate::api::{BookGateway, GatewayError};
use crate::models::{Book, BookPayload, BookUpdate, GenreFilter};
use crate::notify::{Notice, Notifier};

/// Client-side book catalog.
///
/// Entities enter, change, or leave the collection only after the server
/// confirms the change. Every failure is recorded in the state and reported
/// once to the notifier; the error is also returned for callers that need an
/// exit status.
pub struct BookStore {
    gateway: Arc<dyn BookGateway>,
    notifier: Arc<dyn Notifier>,
    books: Collection<Book>,
}

impl BookStore {
    pub fn new(gateway: Arc<dyn BookGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            books: Collection::new(),
        }
    }

    pub fn snapshot(&self) -> CollectionState<Book> {
        self.books.snapshot()
    }

    /// Books matching `filter`, in collection order.
    pub fn filtered(&self, filter: &GenreFilter) -> Vec<Book> {
        self.books
            .snapshot()
            .items
            .into_iter()
            .filter(|book| filter.matches(book))
            .collect()
    }

    /// Replaces the collection with the server's list.
    pub async fn fetch_all(&self) -> Result<(), GatewayError> {
        let _flight = self.books.begin().await;
        match self.gateway.list().await {
            Ok(response) => {
                tracing::debug!("fetched {} book(s)", response.data.len());
                self.books.settle(|state| state.replace_all(response.data));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Creates a book and puts it at the front of the collection.
    pub async fn add(&self, payload: &BookPayload) -> Result<(), GatewayError> {
        let _flight = self.books.begin().await;
        match self.gateway.create(payload).await {
            Ok(response) => {
                tracing::debug!("created book {}", response.data.id);
                self.books.settle(|state| state.prepend(response.data));
                self.notifier.notify(Notice::success("Book added successfully!"));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Patches a book; the server's copy takes the old one's place. An `id`
    /// that is not in the collection leaves it untouched.
    pub async fn update(&self, id: &str, payload: &BookUpdate) -> Result<(), GatewayError> {
        let _flight = self.books.begin().await;
        match self.gateway.update(id, payload).await {
            Ok(response) => {
                let replaced = self.books.settle(|state| state.replace(id, response.data));
                if !replaced {
                    tracing::debug!("updated book {} is not in the local collection", id);
                }
                self.notifier
                    .notify(Notice::success("Book updated successfully!"));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Deletes a book and drops it from the collection.
    pub async fn remove(&self, id: &str) -> Result<(), GatewayError> {
        let _flight = self.books.begin().await;
        match self.gateway.delete(id).await {
            Ok(_) => {
                self.books.settle(|state| state.remove(id));
                self.notifier
                    .notify(Notice::success("Book deleted successfully!"));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: GatewayError) -> GatewayError {
        let message = err.message();
        tracing::warn!("book action failed: {}", message);
        self.books.fail(message.clone());
        self.notifier.notify(Notice::error(message));
        err
    }
}
