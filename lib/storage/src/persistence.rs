// Snapshot persistence: the whole library in one bincode file
use anyhow::Result;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use libris_core::{Author, Book, BookId, Catalog, Favorite, Favorites};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE: &str = "library.bin";

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotData {
    pub authors: Vec<Author>,
    pub books: Vec<Book>,
    pub favorites: Vec<Favorite>,
    /// Unix seconds at creation
    pub timestamp: i64,
}

pub struct SnapshotPersistence {
    snapshot_path: PathBuf,
    last_save_time: AtomicI64,
}

impl SnapshotPersistence {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            snapshot_path: data_dir.as_ref().join(SNAPSHOT_FILE),
            last_save_time: AtomicI64::new(0),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Capture the library. Favorites of books missing from the captured
    /// catalog are left out.
    pub fn create_snapshot(catalog: &Catalog, favorites: &Favorites) -> SnapshotData {
        let books = catalog.books();
        let book_ids: HashSet<BookId> = books.iter().map(|b| b.id).collect();
        let favorites = favorites
            .all()
            .into_iter()
            .filter(|f| book_ids.contains(&f.book))
            .collect();

        SnapshotData {
            authors: catalog.authors(),
            books,
            favorites,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Write a snapshot, replacing the previous file atomically
    pub fn save(&self, catalog: &Catalog, favorites: &Favorites) -> Result<()> {
        let snapshot = Self::create_snapshot(catalog, favorites);
        let data = bincode::serialize(&snapshot)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;

        AtomicFile::new(&self.snapshot_path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))?;

        self.last_save_time.store(snapshot.timestamp, Ordering::Release);
        Ok(())
    }

    /// Load the snapshot if one exists
    pub fn load(&self) -> Result<Option<SnapshotData>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&self.snapshot_path)?;
        let snapshot: SnapshotData = bincode::deserialize(&data)
            .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
        Ok(Some(snapshot))
    }

    /// Unix seconds of the last successful save, 0 if none
    pub fn last_save_time(&self) -> i64 {
        self.last_save_time.load(Ordering::Acquire)
    }
}
