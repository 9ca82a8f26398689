use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::res;

pub type AppResult<T> = Result<T, AppError>;

/// Everything a handler can fail with. `Forbidden` and form validation are
/// handled inline (redirect / redisplay) and never reach this type.
#[derive(Debug)]
pub enum AppError {
    /// Referenced group/author/post does not exist.
    NotFound,
    /// Action needs a signed-in viewer; carries the path to come back to.
    LoginRequired(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Html(res::not_found_body())).into_response()
            }
            AppError::LoginRequired(return_url) => {
                Redirect::to(&format!("/login?return_url={return_url}")).into_response()
            }
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{}\n\n{}", err, err.backtrace()),
            )
                .into_response(),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
