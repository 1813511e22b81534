use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use application::service::CatalogService;
use kernel::KernelError;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::{
    request::{
        CreateRequest as CreateBookRequest, GetAllRequest as GetAllBookRequest,
        GetRequest as GetBookRequest, Transformer as BookTransformer,
    },
    response::Presenter as BookPresenter,
};

mod request;
mod response;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl<D: CatalogService> BookRouter for Router<AppModule<D>> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(module): State<AppModule<D>>,
                 WithRejection(Query(req), _): WithRejection<
                    Query<GetAllBookRequest>,
                    ErrorStatus,
                >| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(req)?
                        .handle(|dto| async move { module.database().get_all_books(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/book/:id",
            get(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(dto).await })
                        .await
                        .map_err(|e| {
                            ErrorStatus::from(e).when(
                                KernelError::NotFound,
                                StatusCode::NOT_FOUND,
                                "book not found",
                            )
                        })
                },
            ),
        )
        .route(
            "/book",
            post(
                |State(module): State<AppModule<D>>,
                 WithRejection(Json(req), _): WithRejection<
                    Json<CreateBookRequest>,
                    ErrorStatus,
                >| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(req)?
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map(|book| (StatusCode::CREATED, book))
                        .map_err(|e| {
                            ErrorStatus::from(e).when(
                                KernelError::NotFound,
                                StatusCode::BAD_REQUEST,
                                "invalid genre",
                            )
                        })
                },
            ),
        )
    }
}
