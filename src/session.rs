use tower_sessions::Session;
use uuid::Uuid;

use crate::AppResult;

pub const USER_ID: &str = "user_id";
pub const RETURN_URL: &str = "return_url";

/// The signed-in author, if any.
pub async fn current_author(session: &Session) -> AppResult<Option<Uuid>> {
    let Some(raw) = session.get::<String>(USER_ID).await? else {
        return Ok(None);
    };
    Ok(Some(Uuid::parse_str(&raw)?))
}
