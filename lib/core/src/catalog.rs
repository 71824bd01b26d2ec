use crate::{Author, AuthorId, Book, BookId, Error, NewBook, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct CatalogState {
    authors: BTreeMap<AuthorId, Author>,
    books: BTreeMap<BookId, Book>,
    // isbn -> book id
    isbn_index: HashMap<u64, BookId>,
    next_author_id: u64,
    next_book_id: u64,
}

impl CatalogState {
    fn check_book(&self, book: &NewBook, replacing: Option<BookId>) -> Result<()> {
        if !self.authors.contains_key(&book.author) {
            return Err(Error::AuthorNotFound(book.author));
        }
        match self.isbn_index.get(&book.isbn) {
            Some(existing) if Some(*existing) != replacing => Err(Error::DuplicateIsbn(book.isbn)),
            _ => Ok(()),
        }
    }
}

/// In-memory catalog of authors and books.
///
/// Books are kept ordered by id. Ids are assigned in increasing order, so
/// iteration order is insertion order and [`Catalog::books`] is a stable
/// snapshot the recommender can index into.
#[derive(Debug)]
pub struct Catalog {
    state: RwLock<CatalogState>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState {
                next_author_id: 1,
                next_book_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Rebuild a catalog from persisted records, keeping their ids
    pub fn restore(authors: Vec<Author>, books: Vec<Book>) -> Result<Self> {
        let mut state = CatalogState::default();
        for author in authors {
            state.authors.insert(author.id, author);
        }
        for book in books {
            if !state.authors.contains_key(&book.author) {
                return Err(Error::AuthorNotFound(book.author));
            }
            if state.isbn_index.insert(book.isbn, book.id).is_some() {
                return Err(Error::DuplicateIsbn(book.isbn));
            }
            state.books.insert(book.id, book);
        }
        state.next_author_id = state.authors.keys().next_back().map_or(1, |id| id.0 + 1);
        state.next_book_id = state.books.keys().next_back().map_or(1, |id| id.0 + 1);
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    // ==================== Authors ====================

    pub fn create_author(&self, name: impl Into<String>) -> Author {
        let mut state = self.state.write();
        let id = AuthorId(state.next_author_id);
        state.next_author_id += 1;
        let author = Author { id, name: name.into() };
        state.authors.insert(id, author.clone());
        author
    }

    #[inline]
    pub fn get_author(&self, id: AuthorId) -> Option<Author> {
        self.state.read().authors.get(&id).cloned()
    }

    /// First author (lowest id) with exactly this name
    pub fn find_author_by_name(&self, name: &str) -> Option<Author> {
        self.state
            .read()
            .authors
            .values()
            .find(|a| a.name == name)
            .cloned()
    }

    pub fn rename_author(&self, id: AuthorId, name: impl Into<String>) -> Result<Author> {
        let mut state = self.state.write();
        let author = state.authors.get_mut(&id).ok_or(Error::AuthorNotFound(id))?;
        author.name = name.into();
        Ok(author.clone())
    }

    /// Delete an author together with all of their books.
    /// Returns the ids of the deleted books.
    pub fn delete_author(&self, id: AuthorId) -> Result<Vec<BookId>> {
        let mut state = self.state.write();
        if state.authors.remove(&id).is_none() {
            return Err(Error::AuthorNotFound(id));
        }

        let removed: Vec<BookId> = state
            .books
            .values()
            .filter(|b| b.author == id)
            .map(|b| b.id)
            .collect();
        for book_id in &removed {
            if let Some(book) = state.books.remove(book_id) {
                state.isbn_index.remove(&book.isbn);
            }
        }
        Ok(removed)
    }

    #[must_use]
    pub fn authors(&self) -> Vec<Author> {
        self.state.read().authors.values().cloned().collect()
    }

    // ==================== Books ====================

    pub fn create_book(&self, book: NewBook) -> Result<Book> {
        let mut state = self.state.write();
        state.check_book(&book, None)?;

        let id = BookId(state.next_book_id);
        state.next_book_id += 1;
        let book = book.into_book(id);
        state.isbn_index.insert(book.isbn, id);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    /// Replace every field of an existing book
    pub fn update_book(&self, id: BookId, book: NewBook) -> Result<Book> {
        let mut state = self.state.write();
        let old_isbn = state.books.get(&id).ok_or(Error::BookNotFound(id))?.isbn;
        state.check_book(&book, Some(id))?;

        let book = book.into_book(id);
        state.isbn_index.remove(&old_isbn);
        state.isbn_index.insert(book.isbn, id);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    #[inline]
    pub fn get_book(&self, id: BookId) -> Option<Book> {
        self.state.read().books.get(&id).cloned()
    }

    pub fn find_book_by_isbn(&self, isbn: u64) -> Option<Book> {
        let state = self.state.read();
        state
            .isbn_index
            .get(&isbn)
            .and_then(|id| state.books.get(id))
            .cloned()
    }

    #[inline]
    #[must_use]
    pub fn contains_book(&self, id: BookId) -> bool {
        self.state.read().books.contains_key(&id)
    }

    pub fn delete_book(&self, id: BookId) -> Result<Book> {
        let mut state = self.state.write();
        let book = state.books.remove(&id).ok_or(Error::BookNotFound(id))?;
        state.isbn_index.remove(&book.isbn);
        Ok(book)
    }

    /// Snapshot of every book in catalog order
    #[must_use]
    pub fn books(&self) -> Vec<Book> {
        self.state.read().books.values().cloned().collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().books.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().books.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
