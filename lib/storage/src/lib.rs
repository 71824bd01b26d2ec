pub mod manager;
pub mod persistence;
pub mod transfer;

pub use manager::{StorageConfig, StorageManager};
pub use persistence::{SnapshotData, SnapshotPersistence, SNAPSHOT_FILE};
pub use transfer::{AuthorRecord, BookRecord, ImportReport, RowError};
