use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::data_formats::{PostRef, PostRequest};
use crate::errors::RequestError;
use crate::models::{BlogImage, BlogPost, BlogPostRow};
use crate::slugify;

use super::{available_slug, new_id, retry_slug_conflicts};

const LIST_ALL_POSTS_QUERY: &str = r#"
        SELECT id, title, slug, content, excerpt, featured_image, category, tags,
               published, created_at, updated_at
        FROM   blog_posts
        ORDER  BY created_at DESC
"#;

const LIST_PUBLISHED_POSTS_QUERY: &str = r#"
        SELECT id, title, slug, content, excerpt, featured_image, category, tags,
               published, created_at, updated_at
        FROM   blog_posts
        WHERE  published = 1
        ORDER  BY created_at DESC
"#;

const SINGLE_POST_QUERY: &str = r#"
        SELECT id, title, slug, content, excerpt, featured_image, category, tags,
               published, created_at, updated_at
        FROM   blog_posts
        WHERE  slug = $1
"#;

/// Column values shared by insert and full-replace update.
struct PostFields {
    title: String,
    content: String,
    excerpt: String,
    featured_image: Option<String>,
    category: &'static str,
    tags: String,
    published: bool,
}

impl PostFields {
    fn from_request(
        PostRequest {
            title,
            content,
            excerpt,
            featured_image,
            category,
            tags,
            published,
        }: PostRequest,
    ) -> Result<(Self, String), RequestError> {
        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(RequestError::BadRequest(
                "Title must contain at least one letter or digit",
            ));
        }
        let tags = serde_json::to_string(&tags.unwrap_or_default())
            .map_err(|_| RequestError::ServerError)?;
        let fields = PostFields {
            title,
            content: content.unwrap_or_default(),
            excerpt: excerpt.unwrap_or_default(),
            featured_image: featured_image.filter(|url| !url.is_empty()),
            category: category.as_str(),
            tags,
            published: published.unwrap_or(false),
        };
        Ok((fields, slug))
    }
}

pub async fn list_posts_in_db(
    pool: &SqlitePool,
    include_drafts: bool,
) -> Result<Vec<BlogPost>, RequestError> {
    let query = if include_drafts {
        LIST_ALL_POSTS_QUERY
    } else {
        LIST_PUBLISHED_POSTS_QUERY
    };
    let rows = sqlx::query_as::<Sqlite, BlogPostRow>(query)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(BlogPost::from).collect())
}

pub async fn get_post_by_slug_in_db(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<BlogPost>, RequestError> {
    let row = sqlx::query_as::<Sqlite, BlogPostRow>(SINGLE_POST_QUERY)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(BlogPost::from))
}

pub async fn get_post_images_in_db(
    pool: &SqlitePool,
    post_id: &str,
) -> Result<Vec<BlogImage>, RequestError> {
    let images = sqlx::query_as::<Sqlite, BlogImage>(
        r#"
        SELECT id, post_id, image_url, caption, display_order, created_at
        FROM   blog_images
        WHERE  post_id = $1
        ORDER  BY display_order, created_at
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}

pub async fn post_exists_in_db(pool: &SqlitePool, id: &str) -> Result<bool, RequestError> {
    let found = sqlx::query_scalar::<Sqlite, i64>("SELECT 1 FROM blog_posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn create_post_in_db(
    pool: &SqlitePool,
    request: PostRequest,
) -> Result<PostRef, RequestError> {
    let (fields, base_slug) = PostFields::from_request(request)?;
    retry_slug_conflicts(|| insert_post(pool, &fields, &base_slug)).await
}

async fn insert_post(
    pool: &SqlitePool,
    fields: &PostFields,
    base_slug: &str,
) -> Result<PostRef, RequestError> {
    let mut tx = pool.begin().await?;

    let slug = available_slug(&mut tx, base_slug, None).await?;
    let id = new_id();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO blog_posts
            (id, title, slug, content, excerpt, featured_image, category, tags,
             published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(&id)
    .bind(&fields.title)
    .bind(&slug)
    .bind(&fields.content)
    .bind(&fields.excerpt)
    .bind(&fields.featured_image)
    .bind(fields.category)
    .bind(&fields.tags)
    .bind(fields.published)
    .bind(now)
    .bind(now)
    .execute(&mut tx)
    .await?;

    tx.commit().await?;

    Ok(PostRef { id: Some(id), slug })
}

/// Replace every field of the post at `slug`; returns the regenerated slug.
pub async fn update_post_in_db(
    pool: &SqlitePool,
    slug: &str,
    request: PostRequest,
) -> Result<PostRef, RequestError> {
    let (fields, base_slug) = PostFields::from_request(request)?;
    retry_slug_conflicts(|| replace_post(pool, slug, &fields, &base_slug)).await
}

async fn replace_post(
    pool: &SqlitePool,
    slug: &str,
    fields: &PostFields,
    base_slug: &str,
) -> Result<PostRef, RequestError> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<Sqlite, String>("SELECT id FROM blog_posts WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&mut tx)
        .await?;
    let id = match id {
        Some(id) => id,
        None => return Err(RequestError::NotFound("Post not found")),
    };

    let new_slug = available_slug(&mut tx, base_slug, Some(&id)).await?;

    sqlx::query(
        r#"
        UPDATE blog_posts
        SET    title = $1, slug = $2, content = $3, excerpt = $4,
               featured_image = $5, category = $6, tags = $7,
               published = $8, updated_at = $9
        WHERE  id = $10
        "#,
    )
    .bind(&fields.title)
    .bind(&new_slug)
    .bind(&fields.content)
    .bind(&fields.excerpt)
    .bind(&fields.featured_image)
    .bind(fields.category)
    .bind(&fields.tags)
    .bind(fields.published)
    .bind(Utc::now())
    .bind(&id)
    .execute(&mut tx)
    .await?;

    tx.commit().await?;

    Ok(PostRef {
        id: None,
        slug: new_slug,
    })
}

/// Delete the post at `slug`; its images go with it through the cascade.
pub async fn delete_post_in_db(pool: &SqlitePool, slug: &str) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE slug = $1")
        .bind(slug)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Post not found"));
    }
    Ok(())
}
