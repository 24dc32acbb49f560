mod config;

mod app;
mod auth;
mod ctx;
mod db;
mod errors;
mod extract;
mod notes;
mod shared;
mod state;
mod users;

use std::net::SocketAddr;

use app::AppParams;
use auth::TokenSigner;
pub use config::config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config::init(config::Config::from_env().map_err(|e| Error::App(e.into()))?);

    shared::tracing::setup_tracing(config.log_json);

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set, signing tokens with the development secret");
    }

    let conn = init_db(&config.database_url).await?;
    let signer = TokenSigner::new(config.jwt_secret.as_bytes(), config.token_ttl_secs);

    let app = app::create(AppParams {
        db: conn,
        signer,
        router: |state| {
            axum::Router::new()
                .merge(auth::router(state.clone()))
                .merge(notes::router(state))
        },
    })
    .await?;

    let app = shared::tracing::add_tracing_layer(app);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|e| Error::App(e.into()))?;

    tracing::info!("listening on http://{}", listener.local_addr().map_err(|e| Error::App(e.into()))?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::App(e.into()))?;

    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}

#[cfg(test)]
pub mod tests {
    use crate::{
        app::{create, AppParams},
        auth::{LoginResponse, TokenSigner},
        errors::Result,
        state::AppState,
        DB,
    };
    use axum::http::HeaderValue;
    use axum_test::TestServer;
    use serde_json::json;

    pub async fn test_server<R>(db: DB, router: R) -> Result<TestServer>
    where
        R: FnOnce(AppState) -> axum::Router,
    {
        let signer = TokenSigner::new(b"test-secret", 3600);
        let app = create(AppParams { db, signer, router }).await?;

        Ok(TestServer::new(app).unwrap())
    }

    /// Registers `name` and returns its token as an `Authorization` value.
    pub async fn register_and_login(server: &TestServer, name: &str) -> HeaderValue {
        let email = format!("{name}@test.com");

        let response = server
            .post("/register")
            .form(&json!({ "name": name, "email": email, "password": "test" }))
            .await;
        assert_eq!(response.status_code(), 200);

        let response = server
            .post("/login")
            .form(&json!({ "email": email, "password": "test" }))
            .await;
        assert_eq!(response.status_code(), 200);

        HeaderValue::from_str(&response.json::<LoginResponse>().token).unwrap()
    }

    /// register -> login -> create -> get -> delete -> get
    #[tokio::test]
    async fn notes_scenario() -> Result<()> {
        let server = test_server(crate::db::init_test_db().await?, |state| {
            axum::Router::new()
                .merge(crate::auth::router(state.clone()))
                .merge(crate::notes::router(state))
        })
        .await?;

        let response = server.get("/health").await;
        assert_eq!(response.status_code(), 200);

        let token = register_and_login(&server, "u1").await;

        let response = server
            .post("/notes")
            .add_header(axum::http::header::AUTHORIZATION, token.clone())
            .form(&json!({ "title": "T", "content": "C" }))
            .await;
        assert_eq!(response.status_code(), 200);
        let id = response.json::<serde_json::Value>()["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = server
            .get(&format!("/notes/{id}"))
            .add_header(axum::http::header::AUTHORIZATION, token.clone())
            .await;
        assert_eq!(
            response.json::<serde_json::Value>()["data"],
            json!({
                "id": id,
                "title": "T",
                "content": "C",
                "created_at": response.json::<serde_json::Value>()["data"]["created_at"],
                "updated_at": null
            })
        );

        let response = server
            .delete(&format!("/notes/{id}"))
            .add_header(axum::http::header::AUTHORIZATION, token.clone())
            .await;
        assert_eq!(response.status_code(), 200);

        let response = server
            .get(&format!("/notes/{id}"))
            .add_header(axum::http::header::AUTHORIZATION, token)
            .await;
        assert_eq!(response.status_code(), 404);

        Ok(())
    }
}
