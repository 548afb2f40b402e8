use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest},
    http::Request,
    Json,
};

use crate::errors::RequestError;

/// `Json` whose rejections surface as `400 {"error": "Bad request"}`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for JsonBody<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = RequestError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "rejected json body");
                Err(RequestError::BadRequest("Bad request"))
            }
        }
    }
}
