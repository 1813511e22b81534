use serde::Deserialize;

use application::transfer::{CreateBookDto, GetAllBookDto, GetBookDto};
use kernel::prelude::entity::BookPrice;

use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;

/// Every field arrives as text so that a bad value can be reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct GetAllRequest {
    page: Option<String>,
    order_by: Option<String>,
    desc: Option<String>,
    author: Option<String>,
    title: Option<String>,
    genres: Option<String>,
}

#[derive(Debug)]
pub struct GetRequest {
    id: String,
}

impl GetRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    price: Option<f64>,
    title: Option<String>,
    author: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    cover_image: String,
    genres: Option<Vec<String>>,
}

pub struct Transformer;

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn invalid(field: &str) -> ErrorStatus {
    ErrorStatus::bad_request(format!("invalid value for '{field}'"))
}

impl TryIntake<GetAllRequest> for Transformer {
    type To = GetAllBookDto;
    type Error = ErrorStatus;
    fn emit(&self, input: GetAllRequest) -> Result<Self::To, Self::Error> {
        let page = match present(input.page) {
            Some(page) => page.trim().parse::<i64>().map_err(|_| invalid("page"))?,
            None => 1,
        };
        let desc = match present(input.desc) {
            Some(desc) => parse_bool(desc.trim()).ok_or_else(|| invalid("desc"))?,
            None => false,
        };
        let genres = input
            .genres
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .map(ToString::to_string)
            .collect();
        Ok(GetAllBookDto {
            page,
            order_by: input.order_by.unwrap_or_default(),
            desc,
            author: input.author.unwrap_or_default(),
            title: input.title.unwrap_or_default(),
            genres,
        })
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetBookDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl TryIntake<CreateRequest> for Transformer {
    type To = CreateBookDto;
    type Error = ErrorStatus;
    fn emit(&self, input: CreateRequest) -> Result<Self::To, Self::Error> {
        let mut violations = Vec::new();
        match input.price.map(BookPrice::from_decimal) {
            None => violations.push("'price' is required"),
            Some(Some(price)) if price.cents() <= 0 => {
                violations.push("'price' should be greater than 0")
            }
            Some(None) => violations.push("'price' is out of range"),
            Some(Some(_)) => {}
        }
        let title = present(input.title);
        if title.is_none() {
            violations.push("'title' is required");
        }
        let author = present(input.author);
        if author.is_none() {
            violations.push("'author' is required");
        }
        if input.genres.is_none() {
            violations.push("'genres' is required");
        }

        match (input.price, title, author, input.genres) {
            (Some(price), Some(title), Some(author), Some(genres)) if violations.is_empty() => {
                Ok(CreateBookDto {
                    title,
                    author,
                    description: input.description,
                    cover_image: input.cover_image,
                    price,
                    genres,
                })
            }
            _ => Err(ErrorStatus::bad_request(violations.join(","))),
        }
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use super::{CreateRequest, GetAllRequest, Transformer};
    use crate::controller::TryIntake;

    fn query(raw: &str) -> GetAllRequest {
        serde_json::from_str(raw).expect("valid request")
    }

    #[test]
    fn listing_defaults() {
        let dto = TryIntake::emit(&Transformer, GetAllRequest::default()).expect("valid");
        assert_eq!(dto.page, 1);
        assert!(!dto.desc);
        assert!(dto.genres.is_empty());
    }

    #[test]
    fn listing_splits_genres() {
        let dto = TryIntake::emit(
            &Transformer,
            query(r#"{"genres": " horror, ,drama ", "desc": "true", "page": "3"}"#),
        )
        .expect("valid");
        assert_eq!(dto.genres, vec!["horror".to_string(), "drama".to_string()]);
        assert!(dto.desc);
        assert_eq!(dto.page, 3);
    }

    #[test]
    fn listing_rejects_bad_values() {
        let err = TryIntake::emit(&Transformer, query(r#"{"page": "two"}"#))
            .expect_err("page is not a number");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(TryIntake::emit(&Transformer, query(r#"{"desc": "maybe"}"#)).is_err());
    }

    #[test]
    fn create_requires_fields() {
        let request: CreateRequest = serde_json::from_str(r#"{"price": 0}"#).expect("valid json");
        let err = TryIntake::emit(&Transformer, request).expect_err("missing fields");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let request: CreateRequest = serde_json::from_str(
            r#"{"title": "T", "author": "A", "genres": [], "price": 69.99}"#,
        )
        .expect("valid json");
        let dto = TryIntake::emit(&Transformer, request).expect("valid");
        assert_eq!(dto.price, 69.99);
        assert!(dto.genres.is_empty());
        assert_eq!(dto.description, "");
    }
}
