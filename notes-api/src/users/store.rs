use rusqlite::named_params;
use serde::Deserialize;

use crate::db::{self, DB};

use super::*;

#[derive(Debug, Clone)]
pub struct CreateUserParameters {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByEmailParameters {
    pub user_email: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByIdParameters {
    pub user_id: UserId,
}

pub async fn create(db: DB, args: CreateUserParameters) -> db::Result<User> {
    let user = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO users (name, email, password) VALUES (:name, :email, :password)
                    RETURNING id, name, email, created_at"#,
                named_params! {
                    ":name": args.name,
                    ":email": args.email,
                    ":password": args.password_hash,
                },
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.conflict_message("User with this name or email already exists"))?;

    Ok(user)
}

pub async fn find_one_by_id(db: DB, args: GetUserByIdParameters) -> db::Result<User> {
    let user_id = args.user_id;
    let user = db
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?",
                [args.user_id],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", user_id)))?;

    Ok(user)
}

/// Looks a user up by login email, including the stored password hash.
pub async fn find_one_by_email(db: DB, args: GetUserByEmailParameters) -> db::Result<User> {
    let user_email = args.user_email.to_owned();
    let user = db
        .call(|conn| {
            conn.query_row(
                "SELECT id, name, email, created_at, password FROM users WHERE email = ?",
                [args.user_email],
                |r| {
                    let mut user = User::try_from(r)?;
                    user.password = Some(r.get(4)?);
                    Ok(user)
                },
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", user_email)))?;

    Ok(user)
}
