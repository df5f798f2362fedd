use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod billing_routes;
pub mod overview_routes;
pub mod page_routes;
pub mod patient_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", patient_routes::router())
        .nest("/api", appointment_routes::router())
        .nest("/api", billing_routes::router())
        .nest("/api", overview_routes::router())
        .merge(page_routes::router())
        .with_state(state)
}
