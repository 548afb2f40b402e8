use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::AdminAuth,
    data_formats::{
        CreatePortfolioItemRequest, DeletePortfolioItemRequest, JsonBody, PortfolioItemsWrapper,
        SavedItemWrapper, SuccessWrapper,
    },
    db_helpers::{
        create_portfolio_item_in_db, delete_portfolio_item_in_db, list_portfolio_items_in_db,
        NewPortfolioItem,
    },
    errors::RequestError,
    JsonResponse,
};

use super::JsonResult;

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

// ----------------- Portfolio Handlers -----------------
pub async fn list_portfolio_items(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<PortfolioItemsWrapper> {
    let items = list_portfolio_items_in_db(&pool).await?;
    Ok(Json(PortfolioItemsWrapper { items }))
}

pub async fn create_portfolio_item(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    JsonBody(CreatePortfolioItemRequest {
        title,
        subtitle,
        image_url,
        display_order,
    }): JsonBody<CreatePortfolioItemRequest>,
) -> Result<JsonResponse<SavedItemWrapper>, RequestError> {
    let (title, image_url) = match (non_empty(title), non_empty(image_url)) {
        (Some(title), Some(image_url)) => (title, image_url),
        _ => return Err(RequestError::BadRequest("Title and image_url are required")),
    };

    let id = create_portfolio_item_in_db(
        &pool,
        NewPortfolioItem {
            title,
            subtitle: non_empty(subtitle),
            image_url,
            display_order: display_order.unwrap_or(0),
        },
    )
    .await?;
    tracing::info!(%id, "created portfolio item");

    Ok((
        StatusCode::CREATED,
        Json(SavedItemWrapper::wrap_with_item_ref(id)),
    ))
}

pub async fn delete_portfolio_item(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    JsonBody(DeletePortfolioItemRequest { id }): JsonBody<DeletePortfolioItemRequest>,
) -> JsonResult<SuccessWrapper> {
    let id = match non_empty(id) {
        Some(id) => id,
        None => return Err(RequestError::BadRequest("ID is required")),
    };
    let removed = delete_portfolio_item_in_db(&pool, &id).await?;
    tracing::info!(%id, removed, "deleted portfolio item");
    Ok(Json(SuccessWrapper::ok()))
}
