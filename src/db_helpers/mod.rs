use std::{collections::HashSet, future::Future, time::Duration};

use sqlx::{Sqlite, Transaction};

use crate::{errors::RequestError, slug::with_suffix};

mod image_helpers;
mod portfolio_helpers;
mod post_helpers;

pub use image_helpers::*;
pub use portfolio_helpers::*;
pub use post_helpers::*;

// ----------------- Helper Functions -----------------

/// Slugs shadowed by fixed routes under `/api/blog/`.
const RESERVED_SLUGS: &[&str] = &["posts"];

const SLUG_WRITE_ATTEMPTS: u64 = 10;

/// SQLite extended result codes for a lost race on the slug column:
/// `SQLITE_BUSY`, `SQLITE_BUSY_SNAPSHOT`, `SQLITE_CONSTRAINT_UNIQUE`.
fn is_slug_write_conflict(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(e) => match e.code().as_deref() {
            Some("5") | Some("517") => true,
            Some("2067") => e.message().contains("blog_posts.slug"),
            _ => false,
        },
        _ => false,
    }
}

/// Run a slug-picking write again when a concurrent writer got there first.
async fn retry_slug_conflicts<T, F, Fut>(mut write: F) -> Result<T, RequestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RequestError>>,
{
    let mut attempt = 1;
    loop {
        match write().await {
            Err(RequestError::DatabaseError(e))
                if attempt < SLUG_WRITE_ATTEMPTS && is_slug_write_conflict(&e) =>
            {
                tracing::debug!(attempt, error = %e, "slug write conflict, retrying");
                tokio::time::sleep(Duration::from_millis(5 * attempt)).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// First free slug derived from `base`, ignoring the post `exclude_id`.
async fn available_slug(
    tx: &mut Transaction<'_, Sqlite>,
    base: &str,
    exclude_id: Option<&str>,
) -> Result<String, RequestError> {
    let taken: HashSet<String> = sqlx::query_scalar::<Sqlite, String>(
        r#"
        SELECT slug FROM blog_posts
        WHERE (slug = $1 OR slug LIKE $2) AND ($3 IS NULL OR id != $3)
        "#,
    )
    .bind(base)
    .bind(format!("{base}-%"))
    .bind(exclude_id)
    .fetch_all(&mut *tx)
    .await?
    .into_iter()
    .collect();

    Ok(with_suffix(base, |candidate| {
        taken.contains(candidate) || RESERVED_SLUGS.contains(&candidate)
    }))
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
