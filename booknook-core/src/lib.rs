//! booknook core library
//!
//! Models, REST gateways and client state stores for the booknook
//! book-review service.

pub mod api;
pub mod models;
pub mod notify;
pub mod password;
pub mod store;
pub mod validation;

use std::sync::Arc;

pub use api::{
    ApiClient, AuthApi, BookApi, ClientError, Credentials, GatewayError, TransportError, UserApi,
};
pub use models::{Book, BookPayload, BookUpdate, GenreFilter, User, UserUpdate};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use store::{AuthStore, BookStore, CollectionState, UserStore};
pub use validation::ValidationError;

/// Stores wired to one API origin over a shared session token.
pub struct Client {
    pub auth: AuthStore,
    pub books: BookStore,
    pub users: UserStore,
}

impl Client {
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        let credentials = api.credentials().clone();
        Self {
            auth: AuthStore::new(
                Arc::new(AuthApi::new(api.clone())),
                credentials,
                notifier.clone(),
            ),
            books: BookStore::new(Arc::new(BookApi::new(api.clone())), notifier.clone()),
            users: UserStore::new(Arc::new(UserApi::new(api)), notifier),
        }
    }
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
