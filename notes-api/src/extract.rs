use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use axum_macros::FromRequestParts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::Error;

/// Request body accepted either as `application/json` or as an urlencoded form,
/// validated before it reaches a handler.
#[derive(Debug)]
pub struct Payload<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let essence = value.split(';').next().unwrap_or_default().trim();
            essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if is_json(&req) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            value
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            value
        };

        value.validate()?;

        Ok(Self(value))
    }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(crate::Error))]
pub struct Path<T>(pub T);
