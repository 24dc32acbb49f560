use std::sync::{Arc, OnceLock};

use crate::error_responses;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, PathRejection},
        Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

pub use response::ErrorResponse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not_found")]
    NotFound(String),
    #[error("conflict")]
    Conflict(String),

    // auth
    #[error("unauthorized")]
    Unauthorized(String),

    // validation
    #[error("validation")]
    Validation(#[from] validator::ValidationErrors),
    #[error("validation")]
    JsonValidation(#[from] JsonRejection),
    #[error("validation")]
    FormValidation(#[from] FormRejection),
    #[error("validation")]
    PathValidation(#[from] PathRejection),

    #[error(transparent)]
    DB(crate::db::Error),

    // other
    #[error(transparent)]
    /// An application-specific error.
    App(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("unexpected")]
    Unexpected(String),
}

impl From<crate::db::Error> for Error {
    fn from(error: crate::db::Error) -> Self {
        match error {
            crate::db::Error::NotFound(msg) => Self::NotFound(msg),
            crate::db::Error::Conflict(msg) => Self::Conflict(msg),
            error => Self::DB(error),
        }
    }
}

/// crate::Error <--> tokio_rusqlite::Error
/// ```rust
/// impl From<tokio_rusqlite::Error> for Error { }
/// impl From<Error> for tokio_rusqlite::Error { }
/// ```
pub mod db_mappers {
    use super::*;
    use crate::db::{self, tokio_rusqlite};

    impl From<tokio_rusqlite::Error> for Error {
        fn from(error: tokio_rusqlite::Error) -> Self {
            match error {
                tokio_rusqlite::Error::Other(err) => match err.downcast::<Error>() {
                    Ok(err) => *err,
                    Err(err) => Error::DB(db::Error::from(tokio_rusqlite::Error::Other(err))),
                },
                error => Error::from(db::Error::from(error)),
            }
        }
    }

    impl From<Error> for tokio_rusqlite::Error {
        fn from(error: Error) -> Self {
            tokio_rusqlite::Error::Other(error.into())
        }
    }
}

// Response

error_responses! {
    not_found: 404,
    conflict: 409,
    validation: 400,
    unauthorized: 401,
    unexpected: 500
}

fn validation_details(errors: &validator::ValidationErrors) -> Map<String, Value> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let codes = errors.iter().map(|e| Value::from(e.code.to_string())).collect();
            (field.to_string(), Value::Array(codes))
        })
        .collect()
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let errors = errors();
        match error {
            Error::NotFound(message) => errors.not_found.with_message(message),
            Error::Conflict(message) => errors.conflict.with_message(message),
            Error::Unauthorized(message) => errors.unauthorized.with_message(message),
            Error::Validation(validation) => errors
                .validation
                .with_message("Request validation error")
                .with_details(validation_details(validation)),
            Error::JsonValidation(error) => errors.validation.with_message(error.body_text()),
            Error::FormValidation(error) => errors.validation.with_message(error.body_text()),
            Error::PathValidation(error) => errors.validation.with_message(error.body_text()),
            _ => errors.unexpected.with_message("Unexpected"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let error = Arc::new(self);

        let error_res = ErrorResponse::from(error.as_ref());
        let status = error_res.status;

        let mut res = axum::Json(error_res).into_response();
        res.extensions_mut().insert(error);

        *res.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        res
    }
}

pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let error = response.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    if let Some(error) = error {
        if response.status().is_server_error() {
            tracing::error!("{:?}", error);
        } else {
            tracing::debug!("{:?}", error);
        }
    }

    response
}

pub async fn not_found() -> Error {
    Error::NotFound("Route not found".into())
}

mod response {
    use super::*;

    #[derive(Debug, Serialize, Clone, Default)]
    pub struct ErrorResponse {
        pub error: String,
        pub message: Option<String>,
        pub status: u16,
        pub details: Option<Map<String, Value>>,
    }

    impl ErrorResponse {
        pub fn new(error: impl Into<String>, status: u16) -> Self {
            Self {
                error: error.into(),
                status,
                ..Default::default()
            }
        }

        pub fn with_message(&self, message: impl Into<String>) -> Self {
            let mut res = self.clone();
            res.message = Some(message.into());
            res
        }

        pub fn with_details(mut self, details: Map<String, Value>) -> Self {
            self.details = Some(details);
            self
        }
    }

    /// Typed responses
    /// ```rust
    /// error_responses! {
    ///     not_found: 404,
    ///     unexpected: 500
    /// }
    ///
    /// impl From<&Error> for ErrorResponse {
    ///     fn from(error: &Error) -> Self {
    ///     let errors = errors(); // <- from macro
    ///     match error {
    ///         Error::NotFound(message) => errors.not_found.with_message(message),
    ///         Error::Unexpected(message) => errors.unexpected.with_message(message),
    ///     }
    /// }
    /// ```
    #[macro_export]
    macro_rules! error_responses {
        (
            $($name:ident: $code:expr),* $(,)?
        ) => {
            #[derive(Debug, Clone, Serialize)]
            struct Responses {
                $(
                    $name: ErrorResponse,
                )*
            }

            static ERRORS: OnceLock<Responses> = OnceLock::new();

            fn errors() -> &'static Responses {
                ERRORS.get_or_init(|| Responses {
                    $(
                        $name: ErrorResponse::new(stringify!($name), $code),
                    )*
                })
            }
        };
    }
}
