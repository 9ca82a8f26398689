use axum::{
    debug_handler,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::pager::{POSTS_ON_PAGE, paginate};
use crate::posts::{PageQuery, render};
use crate::{AppError, AppResult, AppState, db, include_res, session};

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    Path(username): Path<String>,
    Query(PageQuery { page }): Query<PageQuery>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Response> {
    let Some(author) = db::author_by_username(&db_pool, &username).await? else {
        return Err(AppError::NotFound);
    };

    let posts = db::posts_by_author(&db_pool, author.id).await?;
    let total_posts = posts.len();

    // false for anonymous viewers, including the author looking at herself
    let following = match session::current_author(&session).await? {
        Some(viewer) => db::is_following(&db_pool, viewer, author.id).await?,
        None => false,
    };

    let follow_link = if following {
        format!("<a href=\"/profile/{username}/unfollow\">unfollow</a>")
    } else {
        format!("<a href=\"/profile/{username}/follow\">follow</a>")
    };

    let page_obj = paginate(posts, POSTS_ON_PAGE, page);
    let body = include_res!(str, "/pages/profile.html")
        .replace("{username}", &author.username)
        .replace("{total_posts}", &total_posts.to_string())
        .replace("{follow_link}", &follow_link)
        .replace("{posts}", &render::feed(&page_obj))
        .replace(
            "{pager}",
            &render::pager_nav(&format!("/profile/{username}"), &page_obj),
        );

    Ok(Html(body).into_response())
}
