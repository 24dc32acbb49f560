use axum::extract::FromRef;

use crate::{auth::TokenSigner, db::DB};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub signer: TokenSigner,
}
