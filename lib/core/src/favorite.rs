use crate::{BookId, Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of favorites a single user may hold
pub const MAX_FAVORITES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub user: String,
    pub book: BookId,
    pub added_at: DateTime<Utc>,
}

/// Per-user favorite books.
///
/// A `(user, book)` pair is stored at most once and each user holds at most
/// [`MAX_FAVORITES`] entries. Entries keep the order they were added in.
#[derive(Debug, Default)]
pub struct Favorites {
    by_user: RwLock<HashMap<String, Vec<Favorite>>>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries. Entries beyond the limit or duplicates
    /// of an earlier entry are dropped.
    pub fn restore<I: IntoIterator<Item = Favorite>>(favorites: I) -> Self {
        let mut by_user: HashMap<String, Vec<Favorite>> = HashMap::new();
        for favorite in favorites {
            let entries = by_user.entry(favorite.user.clone()).or_default();
            if entries.len() < MAX_FAVORITES && !entries.iter().any(|f| f.book == favorite.book) {
                entries.push(favorite);
            }
        }
        Self {
            by_user: RwLock::new(by_user),
        }
    }

    /// Add a book to a user's favorites.
    ///
    /// The limit is checked before the duplicate check. Whether the book
    /// exists in the catalog is the caller's concern.
    pub fn add(&self, user: &str, book: BookId) -> Result<Favorite> {
        let mut by_user = self.by_user.write();
        let entries = by_user.entry(user.to_string()).or_default();

        if entries.len() >= MAX_FAVORITES {
            return Err(Error::FavoritesLimit { limit: MAX_FAVORITES });
        }
        if entries.iter().any(|f| f.book == book) {
            return Err(Error::FavoriteExists {
                user: user.to_string(),
                book,
            });
        }

        let favorite = Favorite {
            user: user.to_string(),
            book,
            added_at: Utc::now(),
        };
        entries.push(favorite.clone());
        Ok(favorite)
    }

    pub fn remove(&self, user: &str, book: BookId) -> Result<Favorite> {
        let mut by_user = self.by_user.write();
        let not_found = || Error::FavoriteNotFound {
            user: user.to_string(),
            book,
        };

        let entries = by_user.get_mut(user).ok_or_else(not_found)?;
        let pos = entries.iter().position(|f| f.book == book).ok_or_else(not_found)?;
        let removed = entries.remove(pos);
        if entries.is_empty() {
            by_user.remove(user);
        }
        Ok(removed)
    }

    /// Remove a book from every user's favorites
    pub fn remove_book(&self, book: BookId) -> usize {
        self.retain_books(|id| id != book)
    }

    /// Keep only favorites whose book passes `keep`, returning how many were dropped
    pub fn retain_books<F: Fn(BookId) -> bool>(&self, keep: F) -> usize {
        let mut by_user = self.by_user.write();
        let mut removed = 0;
        for entries in by_user.values_mut() {
            let before = entries.len();
            entries.retain(|f| keep(f.book));
            removed += before - entries.len();
        }
        by_user.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// Favorite book ids of a user in the order they were added
    #[must_use]
    pub fn books_for(&self, user: &str) -> Vec<BookId> {
        self.by_user
            .read()
            .get(user)
            .map(|entries| entries.iter().map(|f| f.book).collect())
            .unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn count(&self, user: &str) -> usize {
        self.by_user.read().get(user).map_or(0, Vec::len)
    }

    /// Every stored favorite, grouped by user in name order
    #[must_use]
    pub fn all(&self) -> Vec<Favorite> {
        let by_user = self.by_user.read();
        let mut users: Vec<&String> = by_user.keys().collect();
        users.sort();
        users
            .into_iter()
            .flat_map(|user| by_user[user].iter().cloned())
            .collect()
    }
}
