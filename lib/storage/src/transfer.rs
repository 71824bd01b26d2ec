//! Bulk import and export of catalog records as JSON.
//!
//! Book records name their author instead of carrying an author id, and
//! are matched against the catalog by ISBN: a known ISBN updates the
//! existing book, an unknown one creates a new book. Rows that cannot be
//! applied are reported without stopping the import.

use libris_core::{Catalog, NewBook, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    /// Author name, resolved against existing authors
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    pub isbn: u64,
    #[serde(default)]
    pub price: Option<u32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    /// 1-based position in the input
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn import_books(catalog: &Catalog, records: Vec<BookRecord>) -> ImportReport {
    let mut report = ImportReport::default();

    for (i, record) in records.into_iter().enumerate() {
        let row = i + 1;
        let Some(author) = catalog.find_author_by_name(&record.author) else {
            report.errors.push(RowError {
                row,
                message: format!("Author not found: {}", record.author),
            });
            continue;
        };

        let book = NewBook {
            title: record.title,
            author: author.id,
            category: record.category,
            isbn: record.isbn,
            price: record.price,
            rating: record.rating,
            description: record.description,
        };

        // Ok(true) when created, Ok(false) when updated
        let outcome = match catalog.find_book_by_isbn(book.isbn) {
            Some(existing) => catalog.update_book(existing.id, book).map(|_| false),
            None => catalog.create_book(book).map(|_| true),
        };
        match outcome {
            Ok(true) => report.created += 1,
            Ok(false) => report.updated += 1,
            Err(e) => report.errors.push(RowError {
                row,
                message: e.to_string(),
            }),
        }
    }

    report
}

/// Every book in catalog order. Books whose author is missing are skipped.
pub fn export_books(catalog: &Catalog) -> Vec<BookRecord> {
    catalog
        .books()
        .into_iter()
        .filter_map(|book| {
            let author = catalog.get_author(book.author)?;
            Some(BookRecord {
                title: book.title,
                author: author.name,
                category: book.category,
                isbn: book.isbn,
                price: book.price,
                rating: book.rating,
                description: book.description,
            })
        })
        .collect()
}

/// Create authors whose name is not in the catalog yet
pub fn import_authors(catalog: &Catalog, records: Vec<AuthorRecord>) -> ImportReport {
    let mut report = ImportReport::default();

    for (i, record) in records.into_iter().enumerate() {
        let name = record.name.trim();
        if name.is_empty() {
            report.errors.push(RowError {
                row: i + 1,
                message: "Author name is empty".to_string(),
            });
        } else if catalog.find_author_by_name(name).is_some() {
            report.skipped += 1;
        } else {
            catalog.create_author(name);
            report.created += 1;
        }
    }

    report
}

pub fn export_authors(catalog: &Catalog) -> Vec<AuthorRecord> {
    catalog
        .authors()
        .into_iter()
        .map(|a| AuthorRecord { name: a.name })
        .collect()
}

/// Read a JSON array of records
pub fn read_records<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Write records as a pretty-printed JSON array
pub fn write_records<T: Serialize, P: AsRef<Path>>(path: P, records: &[T]) -> Result<()> {
    let data = serde_json::to_vec_pretty(records)?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, author: &str, isbn: u64) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            author: author.to_string(),
            category: Some("fiction".to_string()),
            isbn,
            price: Some(12),
            rating: None,
            description: None,
        }
    }

    #[test]
    fn test_import_creates_and_updates_by_isbn() {
        let catalog = Catalog::new();
        catalog.create_author("Jane Austen");

        let report = import_books(&catalog, vec![record("Emma", "Jane Austen", 1), record("Persuasion", "Jane Austen", 2)]);
        assert_eq!(report.created, 2);
        assert!(!report.has_errors());

        let mut changed = record("Emma (annotated)", "Jane Austen", 1);
        changed.category = Some("classics".to_string());
        let report = import_books(&catalog, vec![changed]);
        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);

        let emma = catalog.find_book_by_isbn(1).unwrap();
        assert_eq!(emma.title, "Emma (annotated)");
        assert_eq!(emma.category.as_deref(), Some("classics"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_unknown_author_is_a_row_error() {
        let catalog = Catalog::new();
        catalog.create_author("Jane Austen");

        let report = import_books(&catalog, vec![record("Dracula", "Bram Stoker", 1), record("Emma", "Jane Austen", 2)]);
        assert_eq!(report.created, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 1);
        assert!(report.errors[0].message.contains("Bram Stoker"));
    }

    #[test]
    fn test_export_import_round_trip() {
        let catalog = Catalog::new();
        import_authors(&catalog, vec![AuthorRecord { name: "Jane Austen".to_string() }]);
        import_books(&catalog, vec![record("Emma", "Jane Austen", 1)]);

        let other = Catalog::new();
        let authors = import_authors(&other, export_authors(&catalog));
        let books = import_books(&other, export_books(&catalog));
        assert_eq!(authors.created, 1);
        assert_eq!(books.created, 1);
        assert_eq!(export_books(&other), export_books(&catalog));
    }

    #[test]
    fn test_import_authors_skips_existing() {
        let catalog = Catalog::new();
        catalog.create_author("Jane Austen");

        let report = import_authors(
            &catalog,
            vec![
                AuthorRecord { name: "Jane Austen".to_string() },
                AuthorRecord { name: " ".to_string() },
                AuthorRecord { name: "Mary Shelley".to_string() },
            ],
        );
        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors[0].row, 2);
        assert_eq!(catalog.authors().len(), 2);
    }

    #[test]
    fn test_records_file_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("books.json");

        let records = vec![record("Emma", "Jane Austen", 1)];
        write_records(&path, &records).unwrap();
        let loaded: Vec<BookRecord> = read_records(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_record_optional_fields_default() {
        let record: BookRecord = serde_json::from_str(r#"{"title": "Emma", "author": "Jane Austen", "isbn": 7}"#).unwrap();
        assert!(record.category.is_none());
        assert!(record.price.is_none());
    }
}
