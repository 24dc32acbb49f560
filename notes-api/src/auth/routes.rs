use axum::{extract::State, routing::post, Json, Router};

use crate::{db::DB, extract::Payload, state::AppState, Result};

use super::{handlers, LoginResponse, LoginUser, RegisterResponse, RegisterUser, TokenSigner};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

async fn register(State(db): State<DB>, Payload(args): Payload<RegisterUser>) -> Result<Json<RegisterResponse>> {
    let user = handlers::register(args, db).await?;

    Ok(Json(RegisterResponse {
        success: true,
        data: user,
    }))
}

async fn login(
    State(db): State<DB>,
    State(signer): State<TokenSigner>,
    Payload(args): Payload<LoginUser>,
) -> Result<Json<LoginResponse>> {
    let token = handlers::login(args, db, &signer).await?;

    Ok(Json(LoginResponse { success: true, token }))
}

#[cfg(test)]
mod tests {
    use crate::{
        auth::{LoginResponse, RegisterResponse},
        db::{init_test_db, DB},
        errors::Result,
    };
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn user() -> Value {
        json!({
            "name": "test_user",
            "email": "test_user@test.com",
            "password": "test"
        })
    }

    #[tokio::test]
    async fn register_success() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        let response = server.post("/register").form(&user()).await;

        assert_eq!(response.status_code(), 200);
        let body = response.json::<RegisterResponse>();
        assert!(body.success);
        assert_eq!(body.data.email, "test_user@test.com");

        let raw = response.json::<Value>();
        assert!(raw["data"].get("password").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn register_accepts_json() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        let response = server.post("/register").json(&user()).await;

        assert_eq!(response.status_code(), 200);
        assert!(response.json::<RegisterResponse>().success);
        Ok(())
    }

    #[tokio::test]
    async fn register_duplicate_user() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        server.post("/register").form(&user()).await;
        let response = server.post("/register").form(&user()).await;

        assert_eq!(response.status_code(), 409);
        assert_eq!(response.json::<Value>()["error"], "conflict");
        Ok(())
    }

    #[tokio::test]
    async fn register_invalid_data() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        let response = server
            .post("/register")
            .form(&json!({
                "name": "",
                "password": "test",
                "email": "invalid-email"
            }))
            .await;

        assert_eq!(response.status_code(), 400);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "validation");
        assert!(body["details"].get("name").is_some());
        assert!(body["details"].get("email").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn register_empty_password() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        let response = server
            .post("/register")
            .form(&json!({
                "name": "test_user",
                "password": "",
                "email": "test_user@test.com"
            }))
            .await;

        assert_eq!(response.status_code(), 400);
        let body = response.json::<Value>();
        assert_eq!(body["error"], "validation");
        assert!(body["details"].get("password").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn register_missing_required_fields() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        for field in ["name", "password", "email"] {
            let mut data = user();
            data.as_object_mut().unwrap().remove(field);

            let response = server.post("/register").form(&data).await;
            assert_eq!(response.status_code(), 400, "missing {field}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn login_success() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        server.post("/register").form(&user()).await;

        let response = server
            .post("/login")
            .form(&json!({
                "email": "test_user@test.com",
                "password": "test"
            }))
            .await;

        assert_eq!(response.status_code(), 200);
        let token = response.json::<LoginResponse>().token;
        let pattern = regex::Regex::new(r"^[A-Za-z0-9\-_=]+\.[A-Za-z0-9\-_=]+\.[A-Za-z0-9\-_.+/=]+$").unwrap();
        assert!(pattern.is_match(&token));
        Ok(())
    }

    #[tokio::test]
    async fn login_invalid_credentials() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;
        server.post("/register").form(&user()).await;

        let unknown = server
            .post("/login")
            .form(&json!({ "email": "nonexistent@test.com", "password": "wrongpassword" }))
            .await;
        assert_eq!(unknown.status_code(), 401);

        let wrong_password = server
            .post("/login")
            .form(&json!({ "email": "test_user@test.com", "password": "wrongpassword" }))
            .await;
        assert_eq!(wrong_password.status_code(), 401);
        Ok(())
    }

    #[tokio::test]
    async fn login_missing_fields() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        let response = server.post("/login").form(&json!({ "password": "test" })).await;
        assert_eq!(response.status_code(), 400);

        let response = server.post("/login").form(&json!({ "email": "test@test.com" })).await;
        assert_eq!(response.status_code(), 400);
        Ok(())
    }

    #[tokio::test]
    async fn login_empty_fields() -> Result<()> {
        let server = test_server(init_test_db().await?).await?;

        let response = server.post("/login").form(&json!({ "email": "", "password": "" })).await;

        assert_eq!(response.status_code(), 400);
        Ok(())
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, super::router).await
    }
}
