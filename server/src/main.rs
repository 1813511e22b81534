use std::net::SocketAddr;

use axum::Router;
use error_stack::ResultExt;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use application::service::CatalogService;
use kernel::KernelError;

use crate::error::StackTrace;
use crate::handler::AppModule;
use crate::route::{BookRouter, GenreRouter, HealthRouter};

mod controller;
mod error;
mod handler;
mod route;

static BIND_ADDR: &str = "BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

pub fn router<D: CatalogService>(module: AppModule<D>) -> Router {
    Router::<AppModule<D>>::new()
        .route_health()
        .route_book()
        .route_genre()
        .layer(CorsLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(module)
}

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "driver=debug,application=debug,bookstore=debug,tower_http=debug,sqlx=info"
                            .into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let app = AppModule::new().await?;

    let bind = std::env::var(BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    let bind = bind
        .parse::<SocketAddr>()
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("{BIND_ADDR} is not a socket address: {bind}"))?;
    let tcp = TcpListener::bind(bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "Failed to listen tcp")?;
    tracing::info!("listening on {}", bind);

    axum::serve(tcp, router(app).into_make_service())
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    Ok(())
}
