use error_stack::Report;
use uuid::Uuid;

use kernel::prelude::entity::{
    Book, BookAuthor, BookCoverImage, BookDescription, BookDraft, BookPrice, BookTitle,
    DestructBook, GenreName,
};
use kernel::KernelError;

#[derive(Debug, Clone, PartialEq)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub price: BookPrice,
    pub genres: Vec<String>,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            author,
            description,
            cover_image,
            price,
            genres,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            description: description.into(),
            cover_image: cover_image.into(),
            price,
            genres: genres.into_iter().map(String::from).collect(),
        }
    }
}

pub struct GetBookDto {
    pub id: String,
}

#[derive(Debug, Clone, Default)]
pub struct GetAllBookDto {
    pub page: i64,
    pub order_by: String,
    pub desc: bool,
    pub author: String,
    pub title: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BookListDto {
    pub books: Vec<BookDto>,
    pub pages: i64,
}

#[derive(Debug, Clone)]
pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub price: f64,
    pub genres: Vec<String>,
}

impl TryFrom<CreateBookDto> for BookDraft {
    type Error = Report<KernelError>;
    fn try_from(value: CreateBookDto) -> Result<Self, Self::Error> {
        let price = BookPrice::from_decimal(value.price).ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("price {} cannot be stored", value.price))
        })?;
        Ok(BookDraft::new(
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookDescription::new(value.description),
            BookCoverImage::new(value.cover_image),
            price,
            value.genres.into_iter().map(GenreName::new).collect(),
        ))
    }
}
