use serde::{Deserialize, Serialize};

/// Catalog-assigned identifier of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u64);

/// Catalog-assigned identifier of an author
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub u64);

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BookId {
    fn from(i: u64) -> Self {
        BookId(i)
    }
}

impl From<u64> for AuthorId {
    fn from(i: u64) -> Self {
        AuthorId(i)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
}

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: AuthorId,
    /// Free-text label; the only field the recommender reads besides the id
    pub category: Option<String>,
    pub isbn: u64,
    pub price: Option<u32>,
    pub rating: Option<f32>,
    pub description: Option<String>,
}

impl Book {
    /// Category text with an absent category read as the empty string
    #[inline]
    pub fn category_text(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// Field values for creating or replacing a book. The id is assigned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: AuthorId,
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

impl NewBook {
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, author: AuthorId, isbn: u64) -> Self {
        Self {
            title: title.into(),
            author,
            category: None,
            isbn,
            price: None,
            rating: None,
            description: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_price(mut self, price: u32) -> Self {
        self.price = Some(price);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            category: self.category,
            isbn: self.isbn,
            price: self.price,
            rating: self.rating,
            description: self.description,
        }
    }
}
