use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use application::service::CatalogService;
use kernel::KernelError;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::{
    request::{
        CreateRequest as CreateGenreRequest, DeleteRequest as DeleteGenreRequest,
        Transformer as GenreTransformer,
    },
    response::Presenter as GenrePresenter,
};

mod request;
mod response;

pub trait GenreRouter {
    fn route_genre(self) -> Self;
}

impl<D: CatalogService> GenreRouter for Router<AppModule<D>> {
    fn route_genre(self) -> Self {
        self.route(
            "/genres",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::new((), GenrePresenter)
                    .bypass(|| async move { module.database().get_genres().await })
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/genre",
            post(
                |State(module): State<AppModule<D>>,
                 WithRejection(Json(req), _): WithRejection<
                    Json<CreateGenreRequest>,
                    ErrorStatus,
                >| async move {
                    let controller = Controller::new(GenreTransformer, GenrePresenter);
                    let transformed = controller.try_intake(req)?;
                    let message = format!("genre '{}' already exists", transformed.input().name);
                    transformed
                        .handle(|dto| async move { module.database().create_genre(dto).await })
                        .await
                        .map_err(|e| {
                            ErrorStatus::from(e).when(
                                KernelError::AlreadyExists,
                                StatusCode::BAD_REQUEST,
                                message,
                            )
                        })
                },
            ),
        )
        .route(
            "/genre/:id",
            delete(
                |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                    Controller::new(GenreTransformer, GenrePresenter)
                        .intake(DeleteGenreRequest::new(id))
                        .handle(|dto| async move { module.database().delete_genre(dto).await })
                        .await
                        .map_err(|e| {
                            ErrorStatus::from(e)
                                .when(KernelError::NotFound, StatusCode::NOT_FOUND, "genre not found")
                                .when(
                                    KernelError::Referenced,
                                    StatusCode::CONFLICT,
                                    "genre is still assigned to books",
                                )
                        })
                },
            ),
        )
    }
}
