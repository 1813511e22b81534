use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::controller::Exhaust;

pub struct Presenter;

impl Exhaust<Vec<String>> for Presenter {
    type To = Json<Vec<String>>;
    fn emit(&self, input: Vec<String>) -> Self::To {
        Json(input)
    }
}

impl Exhaust<Uuid> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: Uuid) -> Self::To {
        StatusCode::CREATED
    }
}

impl Exhaust<()> for Presenter {
    type To = StatusCode;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT
    }
}
