use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState, db, include_res};

use super::render;

#[debug_handler(state = AppState)]
pub(crate) async fn post_detail(
    Path(id): Path<Uuid>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(post) = db::post_by_id(&db_pool, id).await? else {
        return Err(AppError::NotFound);
    };

    let total_posts = db::count_posts_by_author(&db_pool, post.author_id).await?;
    let comments = db::comments_for_post(&db_pool, id).await?;
    let comment_items: String = comments.iter().map(render::comment_item).collect();

    let body = include_res!(str, "/pages/post_detail.html")
        .replace("{post}", &render::post_item(&post))
        .replace("{author}", &post.author)
        .replace("{total_posts}", &total_posts.to_string())
        .replace("{comments}", &comment_items)
        .replace("{id}", &id.to_string());

    Ok(Html(body).into_response())
}
