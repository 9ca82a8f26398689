//! Create and edit share one form. Editing is author-only: anyone else is
//! bounced back to the post's detail page without touching it.

use axum::{
    Form, debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState, db, session};

use super::render;

#[derive(Deserialize)]
pub(crate) struct PostForm {
    body: String,
    #[serde(default)]
    group: String,
    #[serde(default)]
    image: String,
}

#[debug_handler]
pub(crate) async fn create_page(session: Session) -> AppResult<Response> {
    if session::current_author(&session).await?.is_none() {
        return Err(AppError::LoginRequired("/create".to_owned()));
    }
    Ok(Html(render::compose_form("/create", "New post", "", "", "", "")).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let Some(viewer) = session::current_author(&session).await? else {
        return Err(AppError::LoginRequired("/create".to_owned()));
    };

    let (body, group_id, image) = match validate(&db_pool, &form).await? {
        Ok(fields) => fields,
        Err(error) => return Ok(redisplay("/create", "New post", &form, error)),
    };

    let post_id = db::create_post(&db_pool, viewer, group_id, body, image).await?;
    tracing::info!(%post_id, "post created");

    let author = db::author_by_id(&db_pool, viewer)
        .await?
        .ok_or_else(|| anyhow::anyhow!("signed-in author missing from store"))?;
    Ok(Redirect::to(&format!("/profile/{}", author.username)).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit_page(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(viewer) = session::current_author(&session).await? else {
        return Err(AppError::LoginRequired(format!("/posts/{id}/edit")));
    };
    let Some(post) = db::post_by_id(&db_pool, id).await? else {
        return Err(AppError::NotFound);
    };
    if post.author_id != viewer {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    Ok(Html(render::compose_form(
        &format!("/posts/{id}/edit"),
        "Edit post",
        &post.body,
        post.group_slug.as_deref().unwrap_or(""),
        post.image.as_deref().unwrap_or(""),
        "",
    ))
    .into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let Some(viewer) = session::current_author(&session).await? else {
        return Err(AppError::LoginRequired(format!("/posts/{id}/edit")));
    };
    let Some(post) = db::post_by_id(&db_pool, id).await? else {
        return Err(AppError::NotFound);
    };
    if post.author_id != viewer {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    let action = format!("/posts/{id}/edit");
    let (body, group_id, image) = match validate(&db_pool, &form).await? {
        Ok(fields) => fields,
        Err(error) => return Ok(redisplay(&action, "Edit post", &form, error)),
    };

    db::update_post(&db_pool, id, group_id, body, image).await?;
    Ok(Redirect::to(&format!("/posts/{id}")).into_response())
}

/// Field checks; a failure means no write happened. Returns the trimmed
/// body, the resolved group and the optional image reference.
async fn validate<'f>(
    db_pool: &SqlitePool,
    form: &'f PostForm,
) -> AppResult<Result<(&'f str, Option<Uuid>, Option<&'f str>), &'static str>> {
    let body = form.body.trim();
    if body.is_empty() {
        return Ok(Err("a post needs some text"));
    }

    let group_id = match form.group.trim() {
        "" => None,
        slug => match db::group_by_slug(db_pool, slug).await? {
            Some(group) => Some(group.id),
            None => return Ok(Err("no group with that slug")),
        },
    };

    let image = match form.image.trim() {
        "" => None,
        url => Some(url),
    };

    Ok(Ok((body, group_id, image)))
}

fn redisplay(action: &str, heading: &str, form: &PostForm, error: &str) -> Response {
    Html(render::compose_form(
        action,
        heading,
        &form.body,
        &form.group,
        &form.image,
        error,
    ))
    .into_response()
}
