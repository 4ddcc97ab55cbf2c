use pdfrag::infrastructure::{AppConfig, AppContainer};
use pdfrag::presentation::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        backend = ?config.vector_store_backend,
        embedding_model = %config.embedding_model,
        chat_model = %config.chat_model,
        "Starting pdfrag"
    );

    let container = AppContainer::new(&config).await?;
    HttpServer::new(&container, &config).run().await
}
