use axum::{
    Form, debug_handler,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState, db, session};

const COMMENT_MAX_LEN: usize = 400;

#[derive(Deserialize)]
pub(crate) struct CommentForm {
    body: String,
}

/// An invalid comment (empty or over length) is dropped without complaint;
/// either way the viewer lands back on the post.
#[debug_handler(state = AppState)]
pub(crate) async fn add_comment(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(CommentForm { body }): Form<CommentForm>,
) -> AppResult<Redirect> {
    let Some(viewer) = session::current_author(&session).await? else {
        return Err(AppError::LoginRequired(format!("/posts/{id}")));
    };
    if db::post_by_id(&db_pool, id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let body = body.trim();
    if !body.is_empty() && body.chars().count() <= COMMENT_MAX_LEN {
        db::create_comment(&db_pool, id, viewer, body).await?;
    }

    Ok(Redirect::to(&format!("/posts/{id}")))
}
