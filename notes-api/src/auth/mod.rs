mod handlers;
mod model;
pub mod password;
mod routes;
pub mod token;

pub use model::*;
pub use token::TokenSigner;

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().merge(routes::router(state))
}
