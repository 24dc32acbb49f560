use crate::{
    db::{self, DB},
    users::{
        store::{self, CreateUserParameters, GetUserByEmailParameters},
        User,
    },
    Error, Result,
};

use super::{
    password::{hash_password, verify_password},
    token::TokenSigner,
    LoginUser, RegisterUser,
};

fn invalid_credentials() -> Error {
    Error::Unauthorized("Invalid email or password".into())
}

pub async fn register(RegisterUser { name, email, password }: RegisterUser, db: DB) -> Result<User> {
    let password_hash = hash_password(password).await?;

    let user = store::create(
        db,
        CreateUserParameters {
            name,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "{} registered", user.email);

    Ok(user)
}

/// Checks the credentials and issues a token for the matching user.
pub async fn login(LoginUser { email, password }: LoginUser, db: DB, signer: &TokenSigner) -> Result<String> {
    let user = match store::find_one_by_email(
        db,
        GetUserByEmailParameters {
            user_email: email.clone(),
        },
    )
    .await
    {
        Ok(user) => user,
        Err(db::Error::NotFound(_)) => {
            tracing::info!("login failed for {email}: unknown email");
            return Err(invalid_credentials());
        }
        Err(error) => return Err(error.into()),
    };

    let hash = user.password.clone().ok_or_else(invalid_credentials)?;
    if !verify_password(password, hash).await? {
        tracing::info!(user_id = %user.id, "login failed for {email}: wrong password");
        return Err(invalid_credentials());
    }

    let token = signer.issue(user.id)?;

    tracing::info!(user_id = %user.id, "{email} logged in");

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_test_db;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret", 3600)
    }

    fn registration() -> RegisterUser {
        RegisterUser {
            name: "u1".into(),
            email: "u1@test.com".into(),
            password: "p".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() -> Result<()> {
        let db = init_test_db().await?;
        let user = register(registration(), db.clone()).await?;

        let token = login(
            LoginUser {
                email: "u1@test.com".into(),
                password: "p".into(),
            },
            db,
            &signer(),
        )
        .await?;

        assert_eq!(signer().verify(&token)?.sub, user.id);
        Ok(())
    }

    #[tokio::test]
    async fn register_stores_a_hash() -> Result<()> {
        let db = init_test_db().await?;
        register(registration(), db.clone()).await?;

        let stored = store::find_one_by_email(
            db,
            GetUserByEmailParameters {
                user_email: "u1@test.com".into(),
            },
        )
        .await?;

        let hash = stored.password.unwrap();
        assert_ne!(hash, "p");
        assert!(hash.starts_with("$argon2id$"));
        Ok(())
    }

    #[tokio::test]
    async fn register_twice_conflicts() -> Result<()> {
        let db = init_test_db().await?;
        register(registration(), db.clone()).await?;

        let second = register(registration(), db).await;
        assert!(matches!(second, Err(Error::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() -> Result<()> {
        let db = init_test_db().await?;
        register(registration(), db.clone()).await?;

        let wrong_password = login(
            LoginUser {
                email: "u1@test.com".into(),
                password: "nope".into(),
            },
            db.clone(),
            &signer(),
        )
        .await;
        assert!(matches!(wrong_password, Err(Error::Unauthorized(_))));

        let unknown_email = login(
            LoginUser {
                email: "ghost@test.com".into(),
                password: "p".into(),
            },
            db,
            &signer(),
        )
        .await;
        assert!(matches!(unknown_email, Err(Error::Unauthorized(_))));
        Ok(())
    }
}
