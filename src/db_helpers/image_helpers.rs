use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::{errors::RequestError, models::UploadedImage};

use super::new_id;

/// Metadata rows written after an image upload.
#[derive(Debug)]
pub struct UploadRecord<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub size: i64,
    pub image_url: &'a str,
    pub post_id: Option<&'a str>,
    pub caption: &'a str,
}

/// Writes the `uploaded_images` row and, when the upload belongs to a post,
/// the `blog_images` row, in one transaction.
pub async fn record_upload_in_db(
    pool: &SqlitePool,
    record: &UploadRecord<'_>,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO uploaded_images (filename, content_type, size, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(record.filename)
    .bind(record.content_type)
    .bind(record.size)
    .bind(now)
    .execute(&mut tx)
    .await?;

    if let Some(post_id) = record.post_id {
        sqlx::query(
            r#"
            INSERT INTO blog_images (id, post_id, image_url, caption, display_order, created_at)
            SELECT $1, $2, $3, $4, COALESCE(MAX(display_order) + 1, 0), $5
            FROM   blog_images
            WHERE  post_id = $2
            "#,
        )
        .bind(new_id())
        .bind(post_id)
        .bind(record.image_url)
        .bind(record.caption)
        .bind(now)
        .execute(&mut tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn list_uploaded_images_in_db(
    pool: &SqlitePool,
) -> Result<Vec<UploadedImage>, RequestError> {
    let images = sqlx::query_as::<Sqlite, UploadedImage>(
        r#"
        SELECT filename, content_type, size, created_at
        FROM   uploaded_images
        ORDER  BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(images)
}

/// Removes the upload row and every post image whose URL mentions `filename`.
/// Returns the number of rows removed.
pub async fn delete_image_records_in_db(
    pool: &SqlitePool,
    filename: &str,
) -> Result<u64, RequestError> {
    let mut tx = pool.begin().await?;

    let uploads = sqlx::query("DELETE FROM uploaded_images WHERE filename = $1")
        .bind(filename)
        .execute(&mut tx)
        .await?
        .rows_affected();

    let post_images = sqlx::query("DELETE FROM blog_images WHERE instr(image_url, $1) > 0")
        .bind(filename)
        .execute(&mut tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(uploads + post_images)
}
