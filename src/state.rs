use crate::config::settings::AppConfig;
use crate::infrastructure::queue::sqs::QueueService;
use crate::infrastructure::storage::s3::StorageService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: StorageService,
    pub queue: QueueService,
}

impl AppState {
    pub fn new(config: AppConfig, storage: StorageService, queue: QueueService) -> Self {
        Self {
            config,
            storage,
            queue,
        }
    }
}
