mod handlers;
mod model;
mod routes;

pub use model::*;

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().merge(routes::router(state))
}
