use std::sync::Arc;

use axum::{
    extract::{Multipart, Path},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::AdminAuth,
    blob_store::{image_key, is_safe_filename, BlobStore},
    config::Config,
    data_formats::{
        AlignRequest, AlignResponse, Dimensions, ImageInfo, ImageLocation, ImagesWrapper,
        JsonBody, SuccessWrapper, UploadResponse,
    },
    db_helpers::{
        delete_image_records_in_db, list_uploaded_images_in_db, post_exists_in_db,
        record_upload_in_db, UploadRecord,
    },
    errors::RequestError,
    JsonResponse,
};

use super::JsonResult;

/// Size ceiling the admin upload widget checks before sending a file.
pub const CLIENT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const SERVE_PATH: &str = "/api/images/serve/";
const FORWARDED_PROTO: &str = "x-forwarded-proto";
const CACHE_FOREVER: &str = "public, max-age=31536000";
const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";
const DEFAULT_DIMENSIONS: Dimensions = Dimensions {
    width: 1200,
    height: 800,
};

/// Where clients fetch an uploaded image from.
pub fn public_image_url(config: &Config, filename: &str) -> String {
    match &config.public_blob_base_url {
        Some(base) => format!("{base}/{}", image_key(filename)),
        None => format!("{SERVE_PATH}{filename}"),
    }
}

/// Extension of the uploaded file, or `bin` when it has none usable.
fn file_extension(original_name: &str) -> String {
    let extension = match original_name.rsplit_once('.') {
        Some((_, extension)) => extension,
        None => "",
    };
    let extension: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if extension.is_empty() {
        "bin".to_string()
    } else {
        extension
    }
}

/// `scheme://host` the client used, honouring `X-Forwarded-Proto` from a
/// TLS-terminating proxy. Empty when the request carries no `Host`.
fn request_origin(headers: &HeaderMap) -> String {
    let host = match headers.get(header::HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => host,
        None => return String::new(),
    };
    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|proto| proto.to_str().ok())
        .and_then(|proto| proto.split(',').next())
        .map(|proto| proto.trim().to_ascii_lowercase())
        .filter(|proto| proto == "http" || proto == "https")
        .unwrap_or_else(|| "http".to_string());
    format!("{scheme}://{host}")
}

struct UploadedFile {
    original_name: String,
    content_type: String,
    bytes: axum::body::Bytes,
}

#[derive(Default)]
struct UploadForm {
    image: Option<UploadedFile>,
    post_id: Option<String>,
    caption: Option<String>,
}

async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, RequestError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        tracing::debug!(error = %e, "invalid multipart upload");
        RequestError::BadRequest("Invalid multipart data")
    };

    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(invalid)?;
                form.image = Some(UploadedFile {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            Some("postId") => {
                form.post_id = Some(field.text().await.map_err(invalid)?);
            }
            Some("caption") => {
                form.caption = Some(field.text().await.map_err(invalid)?);
            }
            _ => {}
        }
    }
    Ok(form)
}

// ----------------- Image Handlers -----------------
pub async fn list_images(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(config): Extension<Arc<Config>>,
) -> JsonResult<ImagesWrapper> {
    let images = list_uploaded_images_in_db(&pool)
        .await?
        .into_iter()
        .map(|image| {
            let url = public_image_url(&config, &image.filename);
            ImageInfo::new(image, url)
        })
        .collect();
    Ok(Json(ImagesWrapper { images }))
}

pub async fn upload_image(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(blobs): Extension<Arc<dyn BlobStore>>,
    Extension(config): Extension<Arc<Config>>,
    mut multipart: Multipart,
) -> Result<JsonResponse<UploadResponse>, RequestError> {
    let UploadForm {
        image,
        post_id,
        caption,
    } = read_upload_form(&mut multipart).await?;

    let image = match image {
        Some(image) => image,
        None => return Err(RequestError::BadRequest("No image provided")),
    };
    let post_id = post_id.filter(|id| !id.trim().is_empty());
    if let Some(post_id) = &post_id {
        if !post_exists_in_db(&pool, post_id).await? {
            return Err(RequestError::NotFound("Post not found"));
        }
    }

    let file_name = format!(
        "{}.{}",
        uuid::Uuid::new_v4(),
        file_extension(&image.original_name)
    );
    let key = image_key(&file_name);
    let image_url = public_image_url(&config, &file_name);
    let size = image.bytes.len() as i64;
    if image.bytes.len() > CLIENT_MAX_IMAGE_BYTES {
        tracing::warn!(size, "image is larger than the admin widget allows");
    }

    blobs.put(&key, image.bytes, &image.content_type).await?;

    let record = UploadRecord {
        filename: &file_name,
        content_type: &image.content_type,
        size,
        image_url: &image_url,
        post_id: post_id.as_deref(),
        caption: caption.as_deref().unwrap_or(""),
    };
    if let Err(e) = record_upload_in_db(&pool, &record).await {
        // The blob is orphaned without its rows; take it back out.
        if let Err(cleanup) = blobs.delete(&key).await {
            tracing::error!(%key, error = %cleanup, "could not remove blob after failed upload");
        }
        return Err(e);
    }

    tracing::info!(%file_name, %image_url, size, "uploaded image");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            image_url,
            file_name,
        }),
    ))
}

pub async fn serve_image(
    Extension(blobs): Extension<Arc<dyn BlobStore>>,
    Path(filename): Path<String>,
) -> Response {
    if !is_safe_filename(&filename) {
        return (StatusCode::NOT_FOUND, "Image not found").into_response();
    }
    match blobs.get(&image_key(&filename)).await {
        Ok(Some(blob)) => {
            let content_type = blob
                .content_type
                .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());
            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, CACHE_FOREVER.to_string()),
                ],
                blob.bytes,
            )
                .into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "Image not found").into_response(),
        Err(e) => {
            tracing::error!(%filename, error = %e, "could not load image");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading image").into_response()
        }
    }
}

pub async fn delete_image(
    _auth: AdminAuth,
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(blobs): Extension<Arc<dyn BlobStore>>,
    Path(filename): Path<String>,
) -> JsonResult<SuccessWrapper> {
    if !is_safe_filename(&filename) {
        return Err(RequestError::BadRequest("Invalid filename"));
    }
    blobs.delete(&image_key(&filename)).await?;
    let removed = delete_image_records_in_db(&pool, &filename).await?;
    tracing::info!(%filename, removed, "deleted image");
    Ok(Json(SuccessWrapper::ok()))
}

pub async fn align_images(
    _auth: AdminAuth,
    Extension(blobs): Extension<Arc<dyn BlobStore>>,
    headers: HeaderMap,
    JsonBody(AlignRequest {
        before_image_name,
        after_image_name,
        width,
        height,
    }): JsonBody<AlignRequest>,
) -> JsonResult<AlignResponse> {
    let names = (
        before_image_name.filter(|name| !name.is_empty()),
        after_image_name.filter(|name| !name.is_empty()),
    );
    let (before, after) = match names {
        (Some(before), Some(after)) => (before, after),
        _ => return Err(RequestError::BadRequest("Both image names are required")),
    };

    for name in [&before, &after] {
        if !is_safe_filename(name) || !blobs.exists(&image_key(name)).await? {
            return Err(RequestError::NotFound(
                "One or both images not found in storage",
            ));
        }
    }

    let base_url = request_origin(&headers);
    let location = |filename: String| ImageLocation {
        url: format!("{base_url}{SERVE_PATH}{filename}"),
        filename,
    };
    let dimensions = Dimensions {
        width: width.unwrap_or(DEFAULT_DIMENSIONS.width),
        height: height.unwrap_or(DEFAULT_DIMENSIONS.height),
    };

    tracing::info!(%before, %after, ?dimensions, "returning image urls for manual alignment");
    Ok(Json(AlignResponse::new(
        location(before),
        location(after),
        dimensions,
    )))
}
