use crate::persistence::SnapshotPersistence;
use libris_core::{AuthorId, Book, BookId, Catalog, Error, Favorites, Result, MAX_FAVORITES};
use libris_recommend::{Recommender, RecommenderConfig};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Save a snapshot in the background at this interval
    pub save_interval: Option<Duration>,
    pub recommender: RecommenderConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            save_interval: None,
            recommender: RecommenderConfig::default(),
        }
    }
}

struct Autosave {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns the catalog, the favorites and their persistence, and answers
/// recommendation requests against the current catalog.
pub struct StorageManager {
    catalog: Arc<Catalog>,
    favorites: Arc<Favorites>,
    recommender: Recommender,
    persistence: Arc<SnapshotPersistence>,
    data_dir: PathBuf,
    autosave: Option<Autosave>,
}

impl StorageManager {
    /// Open the data directory with default settings
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Self::with_config(StorageConfig {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        })
    }

    pub fn with_config(config: StorageConfig) -> Result<Self> {
        if config.recommender.limit == 0 {
            return Err(Error::InvalidConfig("recommendation limit must be at least 1".to_string()));
        }

        let data_dir = config.data_dir;
        std::fs::create_dir_all(&data_dir)?;

        let persistence = Arc::new(SnapshotPersistence::new(&data_dir));

        let (catalog, favorites) = match persistence
            .load()
            .map_err(|e| Error::Persistence(e.to_string()))?
        {
            Some(snapshot) => {
                info!(
                    authors = snapshot.authors.len(),
                    books = snapshot.books.len(),
                    favorites = snapshot.favorites.len(),
                    "Loaded snapshot from {:?}",
                    persistence.path()
                );
                let catalog = Catalog::restore(snapshot.authors, snapshot.books)?;
                let favorites = Favorites::restore(
                    snapshot
                        .favorites
                        .into_iter()
                        .filter(|f| catalog.contains_book(f.book)),
                );
                (catalog, favorites)
            }
            None => (Catalog::new(), Favorites::new()),
        };

        let mut manager = Self {
            catalog: Arc::new(catalog),
            favorites: Arc::new(favorites),
            recommender: Recommender::new(config.recommender),
            persistence,
            data_dir,
            autosave: None,
        };

        if let Some(interval) = config.save_interval {
            manager.start_background_save(interval);
        }

        Ok(manager)
    }

    /// Save periodically on a background thread until the manager is dropped
    fn start_background_save(&mut self, interval: Duration) {
        let catalog = self.catalog.clone();
        let favorites = self.favorites.clone();
        let persistence = self.persistence.clone();
        let (stop, stop_rx) = mpsc::channel::<()>();

        let handle = std::thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = persistence.save(&catalog, &favorites) {
                        warn!("Background save error: {}", e);
                    } else {
                        debug!("Background save completed");
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        self.autosave = Some(Autosave { stop, handle });
    }

    #[inline]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[inline]
    pub fn favorites(&self) -> &Arc<Favorites> {
        &self.favorites
    }

    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // ==================== Favorites ====================

    /// Add a book to a user's favorites and recommend books like it.
    ///
    /// Checks run in this order: favorites limit, book exists, not already
    /// a favorite. The recommendations are seeded by the new book only.
    pub fn add_favorite(&self, user: &str, book_id: BookId) -> Result<Vec<Book>> {
        self.prune_favorites();
        if self.favorites.count(user) >= MAX_FAVORITES {
            return Err(Error::FavoritesLimit { limit: MAX_FAVORITES });
        }
        if !self.catalog.contains_book(book_id) {
            return Err(Error::BookNotFound(book_id));
        }

        self.favorites.add(user, book_id)?;
        // the book may have been deleted since the check above
        if !self.catalog.contains_book(book_id) {
            let _ = self.favorites.remove(user, book_id);
            return Err(Error::BookNotFound(book_id));
        }
        info!(user, book = %book_id, "Favorite added");

        Ok(self.recommend_for(&[book_id]))
    }

    /// Drop favorites of books deleted from the catalog directly
    fn prune_favorites(&self) {
        let removed = self.favorites.retain_books(|id| self.catalog.contains_book(id));
        if removed > 0 {
            warn!(removed, "Dropped favorites of deleted books");
        }
    }

    pub fn remove_favorite(&self, user: &str, book_id: BookId) -> Result<()> {
        self.favorites.remove(user, book_id)?;
        info!(user, book = %book_id, "Favorite removed");
        Ok(())
    }

    /// Favorite books of a user, in the order they were added
    pub fn favorite_books(&self, user: &str) -> Vec<Book> {
        self.favorites
            .books_for(user)
            .into_iter()
            .filter_map(|id| self.catalog.get_book(id))
            .collect()
    }

    /// Recommendations seeded by all of the user's favorites
    pub fn recommendations(&self, user: &str) -> Vec<Book> {
        let seeds = self.favorites.books_for(user);
        if seeds.is_empty() {
            return Vec::new();
        }
        self.recommend_for(&seeds)
    }

    /// Recommendations for explicit seed books against the current catalog
    pub fn recommend_for(&self, seeds: &[BookId]) -> Vec<Book> {
        let books = self.catalog.books();
        let recommended: Vec<Book> = self
            .recommender
            .recommend(seeds, &books)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            seeds = seeds.len(),
            catalog = books.len(),
            results = recommended.len(),
            "Computed recommendations"
        );
        recommended
    }

    // ==================== Catalog cascades ====================

    /// Delete a book and every favorite that points at it
    pub fn delete_book(&self, id: BookId) -> Result<Book> {
        let book = self.catalog.delete_book(id)?;
        let removed = self.favorites.remove_book(id);
        info!(book = %id, favorites_removed = removed, "Book deleted");
        Ok(book)
    }

    /// Delete an author, their books and every favorite of those books
    pub fn delete_author(&self, id: AuthorId) -> Result<Vec<BookId>> {
        let books = self.catalog.delete_author(id)?;
        for book in &books {
            self.favorites.remove_book(*book);
        }
        info!(author = %id, books_removed = books.len(), "Author deleted");
        Ok(books)
    }

    // ==================== Persistence ====================

    /// Write a snapshot now
    pub fn save(&self) -> Result<()> {
        self.persistence
            .save(&self.catalog, &self.favorites)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        debug!("Snapshot saved to {:?}", self.persistence.path());
        Ok(())
    }

    /// Unix seconds of the last successful save, 0 if none
    pub fn last_save_time(&self) -> i64 {
        self.persistence.last_save_time()
    }
}

impl Drop for StorageManager {
    fn drop(&mut self) {
        if let Some(autosave) = self.autosave.take() {
            drop(autosave.stop);
            if autosave.handle.join().is_err() {
                warn!("Background save thread panicked");
            }
        }
    }
}
