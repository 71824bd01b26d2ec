//! # libris Core
//!
//! Core library for the libris book catalog.
//!
//! This crate provides the domain types and the in-memory stores the rest of
//! the workspace builds on:
//!
//! - [`Book`], [`Author`] - catalog records
//! - [`Catalog`] - thread-safe store of authors and books, ordered by id
//! - [`Favorites`] - per-user favorite books, capped at [`MAX_FAVORITES`]
//!
//! ## Example
//!
//! ```rust
//! use libris_core::{Catalog, Favorites, NewBook};
//!
//! let catalog = Catalog::new();
//! let author = catalog.create_author("Ursula K. Le Guin");
//! let book = catalog
//!     .create_book(NewBook::new("The Left Hand of Darkness", author.id, 9780441478125).with_category("sci-fi"))
//!     .unwrap();
//!
//! let favorites = Favorites::new();
//! favorites.add("alice", book.id).unwrap();
//! assert_eq!(favorites.books_for("alice"), vec![book.id]);
//! ```

pub mod book;
pub mod catalog;
pub mod error;
pub mod favorite;

pub use book::{Author, AuthorId, Book, BookId, NewBook};
pub use catalog::Catalog;
pub use error::{Error, Result};
pub use favorite::{Favorite, Favorites, MAX_FAVORITES};
