mod author;
mod cover_image;
mod description;
mod id;
mod price;
mod selection;
mod title;

pub use self::{
    author::*, cover_image::*, description::*, id::*, price::*, selection::*, title::*,
};
use crate::entity::GenreName;
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    description: BookDescription,
    cover_image: BookCoverImage,
    price: BookPrice,
    genres: Vec<GenreName>,
}

impl Book {
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        description: BookDescription,
        cover_image: BookCoverImage,
        price: BookPrice,
        genres: Vec<GenreName>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            description,
            cover_image,
            price,
            genres,
        }
    }
}

/// A book that has not been stored yet, so it has no id.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct BookDraft {
    title: BookTitle,
    author: BookAuthor,
    description: BookDescription,
    cover_image: BookCoverImage,
    price: BookPrice,
    genres: Vec<GenreName>,
}

impl BookDraft {
    pub fn new(
        title: BookTitle,
        author: BookAuthor,
        description: BookDescription,
        cover_image: BookCoverImage,
        price: BookPrice,
        genres: Vec<GenreName>,
    ) -> Self {
        let mut unique = Vec::with_capacity(genres.len());
        for genre in genres {
            if !unique.contains(&genre) {
                unique.push(genre);
            }
        }
        Self {
            title,
            author,
            description,
            cover_image,
            price,
            genres: unique,
        }
    }

    pub fn into_book(self, id: BookId) -> Book {
        let DestructBookDraft {
            title,
            author,
            description,
            cover_image,
            price,
            genres,
        } = self.into_destruct();
        Book::new(id, title, author, description, cover_image, price, genres)
    }
}

#[cfg(test)]
mod test {
    use super::{BookAuthor, BookCoverImage, BookDescription, BookDraft, BookId, BookPrice, BookTitle};
    use crate::entity::GenreName;

    #[test]
    fn draft_collapses_duplicate_genres() {
        let draft = BookDraft::new(
            BookTitle::new("Dune"),
            BookAuthor::new("Frank Herbert"),
            BookDescription::default(),
            BookCoverImage::default(),
            BookPrice::from_cents(1999),
            vec![
                GenreName::new("scifi"),
                GenreName::new("classic"),
                GenreName::new("scifi"),
            ],
        );
        assert_eq!(
            draft.genres(),
            &vec![GenreName::new("scifi"), GenreName::new("classic")]
        );

        let id = BookId::new(uuid::Uuid::new_v4());
        let book = draft.clone().into_book(id.clone());
        assert_eq!(book.id(), &id);
        assert_eq!(book.title(), draft.title());
        assert_eq!(book.genres(), draft.genres());
    }
}
