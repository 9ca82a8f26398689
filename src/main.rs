use quietpress::{AppState, cache::FeedCache, db};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quietpress=info,tower_http=info")),
        )
        .init();

    let db_pool = db::connect(dotenv::var("DATABASE_URL").unwrap().as_str(), 16)
        .await
        .unwrap();

    let app_state = AppState {
        db_pool,
        feed_cache: FeedCache::new(quietpress::cache::INDEX_CACHE_TTL),
    };

    let app = quietpress::app(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
    tracing::info!("listening on 0.0.0.0:8080");
    axum::serve(listener, app).await.unwrap();
}
