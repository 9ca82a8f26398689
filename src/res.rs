use axum::{
    debug_handler,
    http::StatusCode,
    response::{Html, IntoResponse},
};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub(crate) fn not_found_body() -> &'static str {
    include_res!(str, "/pages/not_found.html")
}

#[debug_handler]
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(not_found_body()))
}
