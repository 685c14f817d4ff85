use dotenvy::dotenv;
use tracing::info;

mod config;
mod infrastructure;
mod modules;
mod state;
mod workers;

use crate::config::settings::AppConfig;
use crate::infrastructure::queue::sqs::QueueService;
use crate::infrastructure::storage::s3::StorageService;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting image normalizer...");

    let config = AppConfig::new().expect("Missing required environment variables");

    let storage = StorageService::new(
        &config.s3_endpoint,
        &config.aws_region,
        &config.aws_access_key,
        &config.aws_secret_key,
    )
    .await;

    let queue = QueueService::new(
        &config.aws_region,
        &config.aws_access_key,
        &config.aws_secret_key,
        &config.events_queue_url,
    )
    .await;

    let state = AppState::new(config, storage, queue);

    workers::normalizer::start_normalizer_worker(state).await;
}
