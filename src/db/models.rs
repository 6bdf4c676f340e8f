use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Url {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Url {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Url {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UrlCheck {
    pub id: i64,
    pub url_id: i64,
    /// HTTP status of the checked page, `0` when the page could not be fetched.
    pub status_code: i32,
    pub title: Option<String>,
    pub h1: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UrlCheck {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(UrlCheck {
            id: row.try_get("id")?,
            url_id: row.try_get("url_id")?,
            status_code: row.try_get("status_code")?,
            title: row.try_get("title")?,
            h1: row.try_get("h1")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub fn is_failed(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Clone)]
pub struct NewUrlCheck {
    pub url_id: i64,
    pub status_code: i32,
    pub title: Option<String>,
    pub h1: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewUrlCheck {
    pub fn failed(url_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            url_id,
            status_code: 0,
            title: None,
            h1: None,
            description: None,
            created_at,
        }
    }
}

/// A url together with its most recent check, as shown on the list page.
#[derive(Debug, Clone, Serialize)]
pub struct UrlSummary {
    pub url: Url,
    pub last_check: Option<UrlCheck>,
}

pub async fn init_db(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema = include_str!("schema.sql");
    sqlx::raw_sql(schema).execute(pool).await?;
    Ok(())
}

pub async fn insert_url(
    pool: &SqlitePool,
    name: &str,
    created_at: DateTime<Utc>,
) -> Result<Url, sqlx::Error> {
    let result = sqlx::query("INSERT INTO urls (name, created_at) VALUES (?, ?)")
        .bind(name)
        .bind(created_at)
        .execute(pool)
        .await?;

    Ok(Url {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        created_at,
    })
}

pub async fn find_url_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Url>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, created_at FROM urls WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(Url::from_row).transpose()
}

pub async fn find_url_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Url>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, created_at FROM urls WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(Url::from_row).transpose()
}

pub async fn list_url_summaries(pool: &SqlitePool) -> Result<Vec<UrlSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            u.id,
            u.name,
            u.created_at,
            c.id AS check_id,
            c.status_code,
            c.title,
            c.h1,
            c.description,
            c.created_at AS check_created_at
        FROM urls u
        LEFT JOIN url_checks c ON c.id = (
            SELECT id FROM url_checks
            WHERE url_id = u.id
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        )
        ORDER BY u.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let url = Url::from_row(&row)?;
        let check_id: Option<i64> = row.try_get("check_id")?;
        let last_check = match check_id {
            Some(id) => Some(UrlCheck {
                id,
                url_id: url.id,
                status_code: row.try_get("status_code")?,
                title: row.try_get("title")?,
                h1: row.try_get("h1")?,
                description: row.try_get("description")?,
                created_at: row.try_get("check_created_at")?,
            }),
            None => None,
        };
        summaries.push(UrlSummary { url, last_check });
    }

    Ok(summaries)
}

pub async fn insert_check(pool: &SqlitePool, check: &NewUrlCheck) -> Result<UrlCheck, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO url_checks (
            url_id, status_code, title, h1, description, created_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(check.url_id)
    .bind(check.status_code)
    .bind(&check.title)
    .bind(&check.h1)
    .bind(&check.description)
    .bind(check.created_at)
    .execute(pool)
    .await?;

    Ok(UrlCheck {
        id: result.last_insert_rowid(),
        url_id: check.url_id,
        status_code: check.status_code,
        title: check.title.clone(),
        h1: check.h1.clone(),
        description: check.description.clone(),
        created_at: check.created_at,
    })
}

pub async fn find_checks_by_url(
    pool: &SqlitePool,
    url_id: i64,
) -> Result<Vec<UrlCheck>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, url_id, status_code, title, h1, description, created_at
        FROM url_checks
        WHERE url_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(url_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(UrlCheck::from_row).collect()
}
