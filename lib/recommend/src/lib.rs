//! # libris Recommend
//!
//! Content-based book recommendations.
//!
//! Given a set of seed books (a user's favorites, or one newly favorited
//! book) and the whole catalog, the [`Recommender`] returns the catalog books
//! whose categories are most similar to the seeds.
//!
//! ## Example
//!
//! ```rust
//! use libris_core::{AuthorId, Book, BookId};
//! use libris_recommend::Recommender;
//!
//! let book = |id: u64, category: &str| Book {
//!     id: BookId(id),
//!     title: format!("Book {}", id),
//!     author: AuthorId(1),
//!     category: Some(category.to_string()),
//!     isbn: id,
//!     price: None,
//!     rating: None,
//!     description: None,
//! };
//! let catalog = vec![book(1, "fiction"), book(2, "cooking"), book(3, "fiction")];
//!
//! let results = Recommender::default().recommend(&[BookId(1)], &catalog);
//! assert_eq!(results[0].id, BookId(3));
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! catalog categories ──> TfidfVectorizer ──> rows (unit length)
//!                                              │
//! seed ids ──> catalog indices ──> seed rows ──┤
//!                                              v
//!                               cosine(seed, book), mean over seeds
//!                                              │
//!                         stable sort desc ──> drop seeds ──> top N
//! ```

pub mod engine;
pub mod sparse;
pub mod vectorizer;

pub use engine::{Recommendation, Recommender, RecommenderConfig, DEFAULT_LIMIT};
pub use sparse::{cosine_similarity, SparseVector};
pub use vectorizer::{TfidfMatrix, TfidfVectorizer};
