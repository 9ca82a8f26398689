//! Minimal username sign-in standing in for the external identity
//! collaborator. The session flow (return_url stashing, redirect after
//! sign-in) is the part that matters to the rest of the app.

use axum::{
    Form, Router, debug_handler,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, db, include_res,
    session::{RETURN_URL, USER_ID},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    pub(crate) username: String,
}

#[debug_handler]
pub(crate) async fn login_page(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    session: Session,
) -> AppResult<Response> {
    if let Some(return_url) = return_url {
        session.insert(RETURN_URL, return_url).await?;
    }
    Ok(Html(include_res!(str, "/pages/login.html")).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(LoginForm { username }): Form<LoginForm>,
) -> AppResult<Response> {
    let username = username.trim();
    if username.is_empty() {
        return Ok(Redirect::to("/login").into_response());
    }

    let author = db::get_or_create_author(&db_pool, username).await?;
    session.insert(USER_ID, author.id.to_string()).await?;
    tracing::info!(username, "signed in");

    let return_url: Option<String> = session.remove(RETURN_URL).await?;
    Ok(Redirect::to(return_url.as_deref().unwrap_or("/")).into_response())
}

#[debug_handler]
pub(crate) async fn logout(session: Session) -> Redirect {
    session.clear().await;
    Redirect::to("/")
}
