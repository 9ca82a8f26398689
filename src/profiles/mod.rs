mod follow;
mod page;

use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{username}", get(page::profile))
        .route("/profile/{username}/follow", get(follow::follow))
        .route("/profile/{username}/unfollow", get(follow::unfollow))
        .route("/follow", get(follow::follow_index))
}
