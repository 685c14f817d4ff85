use async_trait::async_trait;
use aws_sdk_sqs::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_sqs::types::Message;
use aws_sdk_sqs::Client;
use tracing::info;

use crate::modules::normalize::ports::{Notifier, NotifyError};

#[derive(Clone)]
pub struct QueueService {
    pub client: Client,
    pub events_queue_url: String,
}

impl QueueService {
    pub async fn new(
        region: &str,
        access_key: &str,
        secret_key: &str,
        events_queue_url: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .build();

        let client = Client::from_conf(config);

        info!("✅ Connected to SQS");

        Self {
            client,
            events_queue_url: events_queue_url.to_string(),
        }
    }

    /// Long-polls the events queue for the next batch of notifications.
    pub async fn receive(&self) -> Result<Vec<Message>, aws_sdk_sqs::Error> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.events_queue_url)
            .max_number_of_messages(10)
            .wait_time_seconds(20)
            .send()
            .await?;

        Ok(output.messages.unwrap_or_default())
    }

    /// Deletes a processed message so it is not redelivered.
    pub async fn delete(&self, receipt_handle: &str) -> Result<(), aws_sdk_sqs::Error> {
        self.client
            .delete_message()
            .queue_url(&self.events_queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for QueueService {
    async fn send(&self, queue_url: &str, body: &str) -> Result<(), NotifyError> {
        self.client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        Ok(())
    }
}
