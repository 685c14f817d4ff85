use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::modules::normalize::model::TransformJob;

pub const DEFAULT_QUEUE_EVENT: &str = "s3_object_version_added";

/// Message sent to the per-object queue after a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueueMessage {
    pub event: String,
    pub payload: QueuePayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueuePayload {
    pub height: u32,
    pub width: u32,
    pub original_key: String,
    pub version_key: String,
    pub url: String,
    pub metadata: HashMap<String, String>,
}

/// A message is sent only when a queue endpoint was captured from the
/// object's metadata, and either the key was renamed or an explicit event
/// override was present. Anything else is a silent skip.
pub fn should_notify(job: &TransformJob) -> bool {
    job.queue_url.is_some() && (job.renamed() || job.queue_event.is_some())
}

/// Builds the message for the (already uploaded) destination object.
/// Width/height are resolved by this point.
pub fn build_message(job: &TransformJob, public_base_url: &str) -> QueueMessage {
    QueueMessage {
        event: job
            .queue_event
            .clone()
            .unwrap_or_else(|| DEFAULT_QUEUE_EVENT.to_string()),
        payload: QueuePayload {
            height: job.height.unwrap_or(0),
            width: job.width.unwrap_or(0),
            original_key: job.src_key.clone(),
            version_key: job.dst_key.clone(),
            url: format!(
                "{}/{}/{}",
                public_base_url.trim_end_matches('/'),
                job.dst_bucket,
                job.dst_key
            ),
            metadata: job.metadata.clone(),
        },
    }
}
