use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::{blob_store::BlobError, JsonResponse};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("bad request: {0}")]
    BadRequest(&'static str),
    #[error("not authorized: {0}")]
    NotAuthorized(&'static str),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("internal server error")]
    ServerError,
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RequestErrorJson {
    pub error: String,
}

impl RequestErrorJson {
    pub fn new(error: &str) -> RequestErrorJson {
        RequestErrorJson {
            error: error.to_string(),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RequestError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::ServerError
            | RequestError::DatabaseError(_)
            | RequestError::Blob(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let json = match self {
            RequestError::BadRequest(message)
            | RequestError::NotAuthorized(message)
            | RequestError::NotFound(message) => RequestErrorJson::new(message),
            RequestError::ServerError => RequestErrorJson::new("Internal Server Error"),
            RequestError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                RequestErrorJson::new("Internal Server Error")
            }
            RequestError::Blob(e) => {
                tracing::error!(error = %e, "blob store error");
                RequestErrorJson::new("Internal Server Error")
            }
        };
        (self.status_code(), Json(json))
    }
}
