use greenline::{config::Config, logging, run_app};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Invalid configuration: {error:#}");
            std::process::exit(1);
        }
    };
    if let Err(error) = run_app(config).await {
        tracing::error!("Error: {error:#}");
        std::process::exit(1);
    }
}
