use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::infrastructure::imaging::engine::ImagingEngine;
use crate::modules::normalize::event::{ObjectRef, S3Event};
use crate::modules::normalize::ports::{ImageEngine, Notifier, ObjectStore};
use crate::modules::normalize::service::{NormalizeService, Outcome};
use crate::state::AppState;

pub async fn start_normalizer_worker(state: AppState) {
    info!("🖼️ Starting Normalizer Worker...");

    let service = NormalizeService::new(
        state.storage.clone(),
        ImagingEngine,
        state.queue.clone(),
        state.config.public_base_url.clone(),
    );

    info!(
        "🖼️ Normalizer Worker listening on '{}'",
        state.config.events_queue_url
    );

    loop {
        let messages = match state.queue.receive().await {
            Ok(messages) => messages,
            Err(e) => {
                error!("Failed to receive messages: {e}");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for message in messages {
            let receipt = message.receipt_handle().unwrap_or_default().to_string();

            let event = match serde_json::from_str::<S3Event>(message.body().unwrap_or_default()) {
                Ok(event) => event,
                Err(e) => {
                    // Malformed payloads would loop forever on redelivery.
                    error!("❌ Failed to parse event notification: {e}");
                    ack(&state, &receipt).await;
                    continue;
                }
            };

            let Some((object, total_records)) = event.into_object_ref() else {
                warn!("Event notification carried no records");
                ack(&state, &receipt).await;
                continue;
            };
            if total_records > 1 {
                warn!(
                    "Event notification carried {total_records} records, only the first is processed"
                );
            }

            let source_id = format!("{}/{}", object.bucket, object.key);
            info!("📦 Received object event for {source_id}");

            let timestamp = Utc::now().timestamp_millis();
            match process_object(&service, object, timestamp).await {
                Ok(Outcome::Skipped(reason)) => {
                    info!("✅ {source_id} completed with nothing to do ({reason:?})");
                    ack(&state, &receipt).await;
                }
                Ok(Outcome::Completed {
                    dst_key,
                    width,
                    height,
                    notified,
                }) => {
                    info!(
                        "✅ {source_id} normalized -> {dst_key} ({width}x{height}, notified: {notified})"
                    );
                    ack(&state, &receipt).await;
                }
                Err(e) => {
                    // Left on the queue; redelivery is the caller's retry
                    // policy.
                    error!("❌ {e}");
                }
            }
        }
    }
}

/// Runs one invocation. Failures come back keyed by the source
/// bucket/key pair with the underlying stage error attached.
async fn process_object<S, E, N>(
    service: &NormalizeService<S, E, N>,
    object: ObjectRef,
    timestamp: i64,
) -> anyhow::Result<Outcome>
where
    S: ObjectStore,
    E: ImageEngine,
    N: Notifier,
{
    let source_id = format!("{}/{}", object.bucket, object.key);
    service
        .run(object, timestamp)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to process {source_id}: {e}"))
}

async fn ack(state: &AppState, receipt: &str) {
    if let Err(e) = state.queue.delete(receipt).await {
        error!("Failed to delete message: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::modules::normalize::ports::{
        EngineError, FetchedObject, NotifyError, Orientation, StorageError,
    };

    struct UnreachableStore;

    #[async_trait]
    impl ObjectStore for UnreachableStore {
        async fn fetch(&self, _bucket: &str, _key: &str) -> Result<FetchedObject, StorageError> {
            Err(StorageError::Transport("connection refused".to_string()))
        }

        async fn put(
            &self,
            _bucket: &str,
            _key: &str,
            _body: Bytes,
            _content_type: Option<&str>,
            _acl: Option<&str>,
            _metadata: &HashMap<String, String>,
        ) -> Result<(), StorageError> {
            unreachable!("put is never reached when the fetch fails")
        }
    }

    struct NoopEngine;

    impl ImageEngine for NoopEngine {
        fn orientation(&self, _bytes: &[u8]) -> Result<Option<Orientation>, EngineError> {
            Ok(None)
        }

        fn auto_orient(
            &self,
            _bytes: &[u8],
            _kind: crate::modules::normalize::model::ImageKind,
        ) -> Result<Vec<u8>, EngineError> {
            Ok(Vec::new())
        }

        fn crop_resize(
            &self,
            _bytes: &[u8],
            _width: u32,
            _height: u32,
            _kind: crate::modules::normalize::model::ImageKind,
        ) -> Result<Vec<u8>, EngineError> {
            Ok(Vec::new())
        }

        fn dimensions(&self, _bytes: &[u8]) -> Result<(u32, u32), EngineError> {
            Ok((0, 0))
        }
    }

    struct NoopNotifier;

    #[async_trait]
    impl Notifier for NoopNotifier {
        async fn send(&self, _queue_url: &str, _body: &str) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failure_report_is_keyed_by_bucket_and_key() {
        let service = NormalizeService::new(
            UnreachableStore,
            NoopEngine,
            NoopNotifier,
            "https://s3.amazonaws.com".to_string(),
        );
        let object = ObjectRef {
            bucket: "media".to_string(),
            key: "uploads/me.jpg".to_string(),
        };

        let err = process_object(&service, object, 1_700_000_000_000)
            .await
            .unwrap_err();

        let report = err.to_string();
        assert!(report.contains("media/uploads/me.jpg"));
        assert!(report.contains("connection refused"));
    }
}
