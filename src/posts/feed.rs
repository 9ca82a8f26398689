use axum::{
    debug_handler,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::cache::FeedCache;
use crate::pager::{POSTS_ON_PAGE, paginate};
use crate::{AppResult, AppState, db, include_res};

use super::{PageQuery, render};

/// Global timeline. The rendered page is served from the feed cache, keyed
/// by the raw page parameter; writes inside the TTL stay invisible until
/// the entry expires.
#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(db_pool): State<SqlitePool>,
    State(feed_cache): State<FeedCache>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> AppResult<Response> {
    let key = format!(
        "index:page={}",
        page.map(|p| p.to_string()).unwrap_or_default()
    );
    if let Some(body) = feed_cache.get(&key) {
        return Ok(Html(body).into_response());
    }

    let posts = db::all_posts(&db_pool).await?;
    let page_obj = paginate(posts, POSTS_ON_PAGE, page);

    let body = include_res!(str, "/pages/index.html")
        .replace("{posts}", &render::feed(&page_obj))
        .replace("{pager}", &render::pager_nav("/", &page_obj));
    feed_cache.put(&key, body.clone());

    Ok(Html(body).into_response())
}
