use axum::Json;
use serde::Serialize;

use application::transfer::{BookDto, BookListDto};
use kernel::prelude::entity::BookPrice;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: String,
    title: String,
    author: String,
    description: String,
    cover_image: String,
    genres: Vec<String>,
    price: BookPrice,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            author: value.author,
            description: value.description,
            cover_image: value.cover_image,
            genres: value.genres,
            price: value.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    books: Vec<BookResponse>,
    pages: i64,
}

pub struct Presenter;

impl Exhaust<BookDto> for Presenter {
    type To = Json<BookResponse>;
    fn emit(&self, input: BookDto) -> Self::To {
        Json(BookResponse::from(input))
    }
}

impl Exhaust<BookListDto> for Presenter {
    type To = Json<BookListResponse>;
    fn emit(&self, input: BookListDto) -> Self::To {
        Json(BookListResponse {
            books: input.books.into_iter().map(BookResponse::from).collect(),
            pages: input.pages,
        })
    }
}
