use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    auth::{token::token_from_header, TokenSigner},
    db::{self, DB},
    users::{
        store::{find_one_by_id, GetUserByIdParameters},
        User, UserId,
    },
    Error,
};

#[derive(Clone, Debug, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

/// The authenticated caller. Extracting it fails with 401 unless the request
/// carries a valid token for an existing user.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub user: User,
}

impl Ctx {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let signer = parts
            .extensions
            .get::<TokenSigner>()
            .cloned()
            .ok_or_else(|| Error::Unexpected("TokenSigner extension missing".into()))?;
        let db = parts
            .extensions
            .get::<DB>()
            .cloned()
            .ok_or_else(|| Error::Unexpected("DB extension missing".into()))?;

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(token_from_header)
            .map(str::to_owned)
            .ok_or_else(|| Error::Unauthorized("Missing authorization token".into()))?;

        let claims = signer.verify(&token)?;

        let user = find_one_by_id(db, GetUserByIdParameters { user_id: claims.sub })
            .await
            .map_err(|e| match e {
                db::Error::NotFound(_) => Error::Unauthorized("Token subject no longer exists".into()),
                e => Error::from(e),
            })?;

        Ok(Self { user })
    }
}
