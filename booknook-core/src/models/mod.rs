mod book;
mod user;

pub use book::{parse_genres, year_start, Book, BookPayload, BookUpdate, GenreFilter, GENRES};
pub use user::{Avatar, LoginPayload, RegisterPayload, User, UserUpdate};

/// A record with a server-assigned identifier.
pub trait Entity {
    fn id(&self) -> &str;
}
