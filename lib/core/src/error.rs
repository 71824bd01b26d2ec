use crate::{AuthorId, BookId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Author not found: {0}")]
    AuthorNotFound(AuthorId),

    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(u64),

    #[error("Book {book} is already in the favorites of {user}")]
    FavoriteExists { user: String, book: BookId },

    #[error("Book {book} is not in the favorites of {user}")]
    FavoriteNotFound { user: String, book: BookId },

    #[error("Favorites limit reached: at most {limit} books per user")]
    FavoritesLimit { limit: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
