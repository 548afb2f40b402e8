pub mod authentication;
pub mod blob_store;
pub mod config;
pub mod content;
mod data_formats;
mod db_helpers;
pub mod errors;
mod handlers;
pub mod logging;
pub mod models;
mod slug;

use anyhow::Context;
pub use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{routing::*, Extension, Json, Router};
use blob_store::{BlobStore, FsBlobStore};
use config::Config;
pub use data_formats::*;
use handlers::*;
pub use slug::slugify;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{net::TcpListener, str::FromStr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Connect to the configured database, start serving, and block until the
/// server stops.
pub async fn run_app(config: Config) -> Result<()> {
    let db = init_db(&config.database_url).await?;
    let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(&config.blob_dir));
    let listener = TcpListener::bind(config.address)
        .with_context(|| format!("Failed to bind {}", config.address))?;
    tracing::info!(
        address = %config.address,
        auth_mode = ?config.auth_mode,
        blob_dir = %config.blob_dir.display(),
        "server started"
    );
    let app = build_app(Arc::new(config), db, blobs);
    serve(app, listener).await
}

pub async fn serve(app: Router, listener: TcpListener) -> Result<()> {
    listener.set_nonblocking(true)?;
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(%db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    }
    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("Invalid DATABASE_URL {db_url}"))?
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;
    tracing::debug!("running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("database ready");
    Ok(pool)
}

/// Bind an OS-assigned port on localhost.
pub fn get_random_free_port() -> Result<TcpListener> {
    TcpListener::bind("127.0.0.1:0").context("Could not get a free port")
}

pub fn configure_cors(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// The router with its shared resources attached.
pub fn build_app(config: Arc<Config>, db: SqlitePool, blobs: Arc<dyn BlobStore>) -> Router {
    make_router(config.max_upload_bytes)
        .layer(Extension(Arc::new(db)))
        .layer(Extension(blobs))
        .layer(Extension(config.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors(&config))
}

pub fn make_router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/api/test", get(functions_check))
        .route("/api/auth/login", post(login))
        .route("/api/blog/posts", get(list_posts).post(create_post))
        .route(
            "/api/blog/:slug",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/blog/:slug/content", get(get_post_content))
        .route("/api/images/list", get(list_images))
        .route(
            "/api/images/upload",
            post(upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/images/serve/:filename", get(serve_image))
        .route("/api/images/delete/:filename", delete(delete_image))
        .route("/api/images/align", post(align_images))
        .route(
            "/api/portfolio/items",
            get(list_portfolio_items)
                .post(create_portfolio_item)
                .delete(delete_portfolio_item),
        )
        .fallback(not_found)
}
