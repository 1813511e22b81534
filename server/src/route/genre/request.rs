use serde::Deserialize;

use application::transfer::{CreateGenreDto, DeleteGenreDto};

use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    name: Option<String>,
}

#[derive(Debug)]
pub struct DeleteRequest {
    id: String,
}

impl DeleteRequest {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl TryIntake<CreateRequest> for Transformer {
    type To = CreateGenreDto;
    type Error = ErrorStatus;
    fn emit(&self, input: CreateRequest) -> Result<Self::To, Self::Error> {
        match input.name.filter(|name| !name.is_empty()) {
            Some(name) => Ok(CreateGenreDto { name }),
            None => Err(ErrorStatus::bad_request("'name' is required")),
        }
    }
}

impl Intake<DeleteRequest> for Transformer {
    type To = DeleteGenreDto;
    fn emit(&self, input: DeleteRequest) -> Self::To {
        DeleteGenreDto { id: input.id }
    }
}
