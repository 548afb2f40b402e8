use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::AdminAuth,
    content::{parse_blocks, to_html},
    data_formats::{
        JsonBody, ListPostsQuery, PostContentWrapper, PostRequest, PostWithImagesWrapper,
        PostsWrapper, SavedPostWrapper, SuccessWrapper,
    },
    db_helpers::{
        create_post_in_db, delete_post_in_db, get_post_by_slug_in_db, get_post_images_in_db,
        list_posts_in_db, update_post_in_db,
    },
    errors::RequestError,
    models::BlogPost,
    JsonResponse,
};

use super::JsonResult;

async fn find_post(pool: &SqlitePool, slug: &str) -> Result<BlogPost, RequestError> {
    match get_post_by_slug_in_db(pool, slug).await? {
        Some(post) => Ok(post),
        None => Err(RequestError::NotFound("Post not found")),
    }
}

// ----------------- Blog Handlers -----------------
pub async fn list_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Query(params): Query<ListPostsQuery>,
) -> JsonResult<PostsWrapper> {
    let posts = list_posts_in_db(&pool, params.include_drafts()).await?;
    Ok(Json(PostsWrapper { posts }))
}

pub async fn create_post(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    JsonBody(request): JsonBody<PostRequest>,
) -> Result<JsonResponse<SavedPostWrapper>, RequestError> {
    let post = create_post_in_db(&pool, request).await?;
    tracing::info!(id = ?post.id, slug = %post.slug, "created blog post");
    Ok((
        StatusCode::CREATED,
        Json(SavedPostWrapper::wrap_with_post_ref(post)),
    ))
}

pub async fn get_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<PostWithImagesWrapper> {
    let post = find_post(&pool, &slug).await?;
    let images = get_post_images_in_db(&pool, &post.id).await?;
    Ok(Json(PostWithImagesWrapper { post, images }))
}

pub async fn get_post_content(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<PostContentWrapper> {
    let post = find_post(&pool, &slug).await?;
    let blocks = parse_blocks(&post.content);
    let html = to_html(&blocks);
    Ok(Json(PostContentWrapper {
        slug: post.slug,
        blocks,
        html,
    }))
}

pub async fn update_post(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
    JsonBody(request): JsonBody<PostRequest>,
) -> JsonResult<SavedPostWrapper> {
    let post = update_post_in_db(&pool, &slug, request).await?;
    if post.slug != slug {
        tracing::info!(old = %slug, new = %post.slug, "blog post slug changed");
    }
    Ok(Json(SavedPostWrapper::wrap_with_post_ref(post)))
}

pub async fn delete_post(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Path(slug): Path<String>,
) -> JsonResult<SuccessWrapper> {
    delete_post_in_db(&pool, &slug).await?;
    tracing::info!(%slug, "deleted blog post");
    Ok(Json(SuccessWrapper::ok()))
}
