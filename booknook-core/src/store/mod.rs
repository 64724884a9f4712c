//! Client state stores.
//!
//! Each store owns the in-memory state for one resource, calls its gateway,
//! and reconciles confirmed results into that state. Stores are plain
//! instances: build one per session and share it by reference or `Arc`.

mod auth;
mod books;
mod collection;
mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthState, AuthStore};
pub use books::BookStore;
pub use collection::{Collection, CollectionState};
pub use users::UserStore;
