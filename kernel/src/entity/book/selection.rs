use destructure::Destructure;
use vodca::References;

use crate::entity::{Book, GenreName, SelectLimit, SelectOffset};

/// Primary sort key of a book listing. The other key breaks ties.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BookOrder {
    #[default]
    Title,
    Author,
}

impl BookOrder {
    /// Unknown keys fall back to [`BookOrder::Title`].
    pub fn from_key(key: &str) -> Self {
        match key {
            "author" => Self::Author,
            _ => Self::Title,
        }
    }
}

/// Case-insensitive substring filter. An empty keyword matches everything.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self(keyword.into())
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.0.is_empty() || haystack.to_lowercase().contains(&self.0.to_lowercase())
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookFilter {
    author: Keyword,
    title: Keyword,
    genres: Vec<GenreName>,
}

impl BookFilter {
    pub fn new(author: Keyword, title: Keyword, genres: Vec<GenreName>) -> Self {
        Self {
            author,
            title,
            genres,
        }
    }

    /// Genre names match whole, ignoring case. With no genres given every
    /// book passes, including books without any genre.
    pub fn matches_genres(&self, genres: &[GenreName]) -> bool {
        self.genres.is_empty()
            || genres.iter().any(|genre| {
                let genre: &String = genre.as_ref();
                self.genres.iter().any(|wanted| {
                    let wanted: &String = wanted.as_ref();
                    wanted.to_lowercase() == genre.to_lowercase()
                })
            })
    }

    pub fn matches(&self, book: &Book) -> bool {
        let author: &String = book.author().as_ref();
        let title: &String = book.title().as_ref();
        self.author.matches(author)
            && self.title.matches(title)
            && self.matches_genres(book.genres())
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookSelection {
    order: BookOrder,
    desc: bool,
    filter: BookFilter,
    limit: SelectLimit,
    offset: SelectOffset,
}

impl BookSelection {
    pub fn new(
        order: BookOrder,
        desc: bool,
        filter: BookFilter,
        limit: SelectLimit,
        offset: SelectOffset,
    ) -> Self {
        Self {
            order,
            desc,
            filter,
            limit,
            offset,
        }
    }
}

/// One page of a listing plus the number of books matching before paging.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookPage {
    books: Vec<Book>,
    total: i64,
}

impl BookPage {
    pub fn new(books: Vec<Book>, total: i64) -> Self {
        Self { books, total }
    }
}
