pub mod api;
pub mod health;
pub mod pages;

use crate::app::AppState;
use crate::db::{self, Url};
use crate::error::AppError;

/// Look up a url by its path segment.
/// Non-numeric ids are reported the same way as unknown ones.
async fn find_url(state: &AppState, id: &str) -> Result<Url, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::NotFound("URL".to_string()))?;
    db::find_url_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("URL".to_string()))
}
