use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::PortfolioItem};

use super::new_id;

#[derive(Debug)]
pub struct NewPortfolioItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub display_order: i64,
}

pub async fn list_portfolio_items_in_db(
    pool: &SqlitePool,
) -> Result<Vec<PortfolioItem>, RequestError> {
    let items = sqlx::query_as::<Sqlite, PortfolioItem>(
        r#"
        SELECT id, title, subtitle, image_url, display_order, created_at, updated_at
        FROM   portfolio_items
        ORDER  BY display_order ASC, created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn create_portfolio_item_in_db(
    pool: &SqlitePool,
    NewPortfolioItem {
        title,
        subtitle,
        image_url,
        display_order,
    }: NewPortfolioItem,
) -> Result<String, RequestError> {
    let id = new_id();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO portfolio_items
            (id, title, subtitle, image_url, display_order, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&id)
    .bind(title)
    .bind(subtitle)
    .bind(image_url)
    .bind(display_order)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Returns the number of deleted rows; deleting an unknown id is not an error.
pub async fn delete_portfolio_item_in_db(pool: &SqlitePool, id: &str) -> Result<u64, RequestError> {
    let result = sqlx::query("DELETE FROM portfolio_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
