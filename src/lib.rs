pub mod appresult;
pub mod auth;
pub mod cache;
pub mod db;
pub mod pager;
pub mod posts;
pub mod profiles;
pub mod res;
pub mod session;

pub use appresult::{AppError, AppResult};

use axum::{Router, extract::FromRef};
use sqlx::SqlitePool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

use crate::cache::FeedCache;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub feed_cache: FeedCache,
}

/// The full application router, session layer included, so tests can drive
/// it the same way `main` serves it.
pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(2)));

    Router::new()
        .merge(auth::router())
        .merge(posts::router())
        .merge(profiles::router())
        .fallback(res::not_found)
        .with_state(state)
        .layer(session_layer)
}
