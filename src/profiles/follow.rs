use axum::{
    debug_handler,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::pager::{POSTS_ON_PAGE, paginate};
use crate::posts::{PageQuery, render};
use crate::{AppError, AppResult, AppState, db, include_res, session};

#[debug_handler(state = AppState)]
pub(crate) async fn follow(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(viewer) = session::current_author(&session).await? else {
        return Err(AppError::LoginRequired(format!(
            "/profile/{username}/follow"
        )));
    };
    let Some(target) = db::author_by_username(&db_pool, &username).await? else {
        return Err(AppError::NotFound);
    };

    db::follow(&db_pool, viewer, target.id).await?;
    tracing::info!(%viewer, target = %target.id, "follow");

    Ok(Redirect::to(&format!("/profile/{username}")).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn unfollow(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(viewer) = session::current_author(&session).await? else {
        return Err(AppError::LoginRequired(format!(
            "/profile/{username}/unfollow"
        )));
    };
    let Some(target) = db::author_by_username(&db_pool, &username).await? else {
        return Err(AppError::NotFound);
    };

    db::unfollow(&db_pool, viewer, target.id).await?;

    Ok(Redirect::to(&format!("/profile/{username}")).into_response())
}

/// The global timeline filtered down to followed authors. Following nobody
/// is an empty page, not an error.
#[debug_handler(state = AppState)]
pub(crate) async fn follow_index(
    Query(PageQuery { page }): Query<PageQuery>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(viewer) = session::current_author(&session).await? else {
        return Err(AppError::LoginRequired("/follow".to_owned()));
    };

    let followed = db::followed_authors(&db_pool, viewer).await?;
    let posts = db::posts_by_authors(&db_pool, &followed).await?;
    let page_obj = paginate(posts, POSTS_ON_PAGE, page);

    let body = include_res!(str, "/pages/follow.html")
        .replace("{posts}", &render::feed(&page_obj))
        .replace("{pager}", &render::pager_nav("/follow", &page_obj));

    Ok(Html(body).into_response())
}
