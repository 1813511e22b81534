use axum::routing::get;
use axum::Router;

pub trait HealthRouter {
    fn route_health(self) -> Self;
}

impl<S: Clone + Send + Sync + 'static> HealthRouter for Router<S> {
    fn route_health(self) -> Self {
        self.route("/health", get(|| async { "ok" }))
    }
}
