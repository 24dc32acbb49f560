use axum::{
    http::{header, HeaderValue, Method},
    middleware::{self},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config;

use serde_json::json;

use crate::{
    auth::TokenSigner,
    db::{self, DB},
    errors::{self, not_found, on_error},
    state::AppState,
};

pub struct AppParams<Router>
where
    Router: FnOnce(AppState) -> axum::Router,
{
    pub db: DB,
    pub signer: TokenSigner,
    pub router: Router,
}

pub async fn create<R>(AppParams { db, signer, router }: AppParams<R>) -> errors::Result<Router>
where
    R: FnOnce(AppState) -> Router,
{
    let state = AppState {
        conn: db.clone(),
        signer: signer.clone(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/__version__", get(version))
        .route("/__heartbeat__", get(heartbeat))
        .route("/__lbheartbeat__", get(lbheartbeat))
        .merge(router(state))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config().cors_allowed_origins))
                .layer(Extension(db))
                .layer(Extension(signer))
                .layer(middleware::from_fn(on_error)),
        );

    Ok(app)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect::<Vec<_>>();

    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn version() -> impl IntoResponse {
    let config = &config();
    Json(json!({
        "source" : config.source,
        "version": config.version,
        "commit" : config.git_commit,
        "build"  : config.pipeline_id
    }))
}

async fn heartbeat(Extension(db): Extension<DB>) -> errors::Result<impl IntoResponse> {
    db::ping(&db).await?;

    Ok(Json(json!({ "status" : "ok" })))
}

async fn lbheartbeat() -> impl IntoResponse {
    ""
}
