//! # libris
//!
//! A small library catalog: authors, books, per-user favorites and
//! content-based book recommendations.
//!
//! Recommendations compare book categories with TF-IDF vectors and cosine
//! similarity. The vectorizer is fitted on the live catalog for every
//! request, so new or edited books are picked up immediately.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! libris import authors authors.json
//! libris import books books.json
//! libris favorite add --user alice --book 3
//! libris recommend --user alice
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use libris::prelude::*;
//!
//! let storage = StorageManager::new("./data").unwrap();
//! let author = storage.catalog().create_author("Frank Herbert");
//! let dune = storage
//!     .catalog()
//!     .create_book(NewBook::new("Dune", author.id, 9780441013593).with_category("sci-fi"))
//!     .unwrap();
//!
//! // Adding a favorite returns books similar to it
//! let similar = storage.add_favorite("alice", dune.id).unwrap();
//!
//! // Or rank against all of a user's favorites
//! let recommended = storage.recommendations("alice");
//! storage.save().unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - `libris-core` - Book, Author, Favorite, the in-memory Catalog and Favorites
//! - `libris-recommend` - TF-IDF vectorizer and the Recommender
//! - `libris-storage` - StorageManager, snapshots, JSON import/export

// Re-export core types
pub use libris_core::{
    Author, AuthorId, Book, BookId, NewBook,
    Catalog, Favorite, Favorites, MAX_FAVORITES,
    Error, Result,
};

// Re-export the engine
pub use libris_recommend::{
    Recommendation, Recommender, RecommenderConfig, DEFAULT_LIMIT,
    TfidfVectorizer, SparseVector, cosine_similarity,
};

// Re-export storage
pub use libris_storage::{StorageConfig, StorageManager, BookRecord, AuthorRecord, ImportReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Author, AuthorId, Book, BookId, NewBook,
        Catalog, Favorites,
        Recommender, RecommenderConfig,
        StorageConfig, StorageManager,
        Error, Result,
    };
}

/// Bulk JSON import and export
pub mod transfer {
    pub use libris_storage::transfer::{
        export_authors, export_books, import_authors, import_books, read_records, write_records,
    };
}
