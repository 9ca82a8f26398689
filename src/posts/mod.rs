mod comment;
mod compose;
mod detail;
mod feed;
mod group;
pub(crate) mod render;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed::index))
        .route("/create", get(compose::create_page).post(compose::create))
        .route("/group/{slug}", get(group::group_feed))
        .route("/posts/{id}", get(detail::post_detail))
        .route("/posts/{id}/edit", get(compose::edit_page).post(compose::edit))
        .route("/posts/{id}/comment", post(comment::add_comment))
}

#[derive(Deserialize)]
pub(crate) struct PageQuery {
    pub(crate) page: Option<i64>,
}
