use chrono::Utc;

use crate::analyzer::{client, normalize::normalize_url, seo::extract_seo};
use crate::app::AppState;
use crate::db::{self, NewUrlCheck, Url, UrlCheck};
use crate::error::AppError;

#[derive(Debug)]
pub enum Registration {
    Created(Url),
    Existing(Url),
}

impl Registration {
    pub fn url(&self) -> &Url {
        match self {
            Registration::Created(url) | Registration::Existing(url) => url,
        }
    }
}

/// Normalise `input` and add it to the registry unless it is already there.
pub async fn register_url(state: &AppState, input: &str) -> Result<Registration, AppError> {
    let name = normalize_url(input)?;

    if let Some(existing) = db::find_url_by_name(&state.db, &name).await? {
        tracing::info!(url = %name, id = existing.id, "url already registered");
        return Ok(Registration::Existing(existing));
    }

    insert_or_existing(state, &name).await
}

/// Insert `name`, falling back to the stored row when a concurrent insert got there first.
async fn insert_or_existing(state: &AppState, name: &str) -> Result<Registration, AppError> {
    match db::insert_url(&state.db, name, Utc::now()).await {
        Ok(url) => {
            tracing::info!(url = %url.name, id = url.id, "url registered");
            Ok(Registration::Created(url))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::info!(url = %name, "url registered concurrently");
            let existing = db::find_url_by_name(&state.db, name)
                .await?
                .ok_or_else(|| AppError::NotFound("URL".to_string()))?;
            Ok(Registration::Existing(existing))
        }
        Err(e) => Err(e.into()),
    }
}

/// Fetch the url's page and store the outcome.
///
/// A page that cannot be fetched still produces a check, with status `0`.
pub async fn run_check(state: &AppState, url: &Url) -> Result<UrlCheck, AppError> {
    let new_check =
        match client::fetch_page(&state.client, &url.name, state.config.check_timeout).await {
            Ok(page) => {
                let seo = extract_seo(&page.body);
                NewUrlCheck {
                    url_id: url.id,
                    status_code: i32::from(page.status.as_u16()),
                    title: seo.title,
                    h1: seo.h1,
                    description: seo.description,
                    created_at: Utc::now(),
                }
            }
            Err(e) => {
                tracing::warn!(url = %url.name, error = %e, "page check failed");
                NewUrlCheck::failed(url.id, Utc::now())
            }
        };

    let check = db::insert_check(&state.db, &new_check).await?;
    tracing::info!(
        url = %url.name,
        check_id = check.id,
        status_code = check.status_code,
        "page checked"
    );

    Ok(check)
}
