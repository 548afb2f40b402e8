use axum::{
    http::{StatusCode, Uri},
    Json,
};

use crate::{data_formats::MessageResponse, errors::RequestError};

mod auth_handlers;
mod image_handlers;
mod portfolio_handlers;
mod post_handlers;

pub use auth_handlers::*;
pub use image_handlers::*;
pub use portfolio_handlers::*;
pub use post_handlers::*;

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn functions_check() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Functions are working!".to_string(),
    })
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}
