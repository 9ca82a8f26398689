use axum::{
    debug_handler,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::pager::{POSTS_ON_PAGE, paginate};
use crate::{AppError, AppResult, AppState, db, include_res};

use super::{PageQuery, render};

#[debug_handler(state = AppState)]
pub(crate) async fn group_feed(
    Path(slug): Path<String>,
    Query(PageQuery { page }): Query<PageQuery>,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(group) = db::group_by_slug(&db_pool, &slug).await? else {
        return Err(AppError::NotFound);
    };

    let posts = db::posts_by_group(&db_pool, group.id).await?;
    let page_obj = paginate(posts, POSTS_ON_PAGE, page);

    let body = include_res!(str, "/pages/group.html")
        .replace("{title}", &group.title)
        .replace("{description}", &group.description)
        .replace("{posts}", &render::feed(&page_obj))
        .replace(
            "{pager}",
            &render::pager_nav(&format!("/group/{}", group.slug), &page_obj),
        );

    Ok(Html(body).into_response())
}
