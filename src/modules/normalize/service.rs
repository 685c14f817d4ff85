use bytes::Bytes;
use tracing::info;

use super::decision::{decide, Decision, Markers, SkipReason};
use super::event::ObjectRef;
use super::model::{square_key, ImageKind, TransformJob, MARKER_CROP, MARKER_ORIENT, SQUARE_EDGE};
use super::notification::{build_message, should_notify};
use super::ports::{ImageEngine, Notifier, ObjectStore, PipelineError};

/// How a single invocation ended. Every variant is a terminal success;
/// failures surface as `PipelineError`.
#[derive(Debug)]
pub enum Outcome {
    /// Ended early with no upload and no notification.
    Skipped(SkipReason),
    /// Transform ran, the object was written back, notification sent or
    /// silently skipped.
    Completed {
        dst_key: String,
        width: u32,
        height: u32,
        notified: bool,
    },
}

/// The pipeline controller: download, transform decision, dimension
/// measurement, upload, notification — strictly in that order, each stage
/// handing an updated job to the next.
pub struct NormalizeService<S, E, N> {
    store: S,
    engine: E,
    notifier: N,
    public_base_url: String,
}

impl<S, E, N> NormalizeService<S, E, N>
where
    S: ObjectStore,
    E: ImageEngine,
    N: Notifier,
{
    pub fn new(store: S, engine: E, notifier: N, public_base_url: String) -> Self {
        Self {
            store,
            engine,
            notifier,
            public_base_url,
        }
    }

    /// Runs one invocation for `source`. `timestamp` (epoch millis) becomes
    /// the value of whichever marker this run persists.
    pub async fn run(&self, source: ObjectRef, timestamp: i64) -> Result<Outcome, PipelineError> {
        // Extension gate: the only synchronous guard. Unrecognized keys are
        // a soft skip, not an error.
        let Some(kind) = ImageKind::from_key(&source.key) else {
            info!(key = %source.key, "skipping object without a recognized image extension");
            return Ok(Outcome::Skipped(SkipReason::UnsupportedExtension));
        };

        // Download and marker inspection.
        let fetched = self.store.fetch(&source.bucket, &source.key).await?;
        let job = TransformJob::new(source, kind, timestamp, &fetched);
        if job.fully_processed() {
            info!(key = %job.src_key, "object already oriented and cropped, nothing to do");
            return Ok(Outcome::Skipped(SkipReason::AlreadyProcessed));
        }

        // Transform decision.
        let orientation = self.engine.orientation(&fetched.body)?;
        let markers = Markers {
            oriented: job.has_marker(MARKER_ORIENT),
            cropped: job.has_marker(MARKER_CROP),
        };
        let decision = decide(orientation.is_some(), markers, job.tags.as_deref());

        let (body, mut job) = match decision {
            Decision::Skip(reason) => {
                info!(key = %job.src_key, ?reason, "no transform to apply");
                return Ok(Outcome::Skipped(reason));
            }
            Decision::Orient => {
                info!(key = %job.src_key, ?orientation, "auto orienting image");
                let out = self.engine.auto_orient(&fetched.body, kind)?;
                let mut job = job;
                job.marker = Some(MARKER_ORIENT);
                (Bytes::from(out), job)
            }
            Decision::CropSquare => {
                let out = self
                    .engine
                    .crop_resize(&fetched.body, SQUARE_EDGE, SQUARE_EDGE, kind)?;
                let mut job = job;
                job.marker = Some(MARKER_CROP);
                job.dst_key = square_key(&job.dst_key);
                info!(key = %job.src_key, dst_key = %job.dst_key, "cropped profile image variant");
                (Bytes::from(out), job)
            }
        };

        // Dimension measurement on the transformed bytes.
        let (width, height) = self.engine.dimensions(&body)?;
        job.width = Some(width);
        job.height = Some(height);
        info!(key = %job.dst_key, width, height, "resolved image dimensions");

        // Upload to the (possibly renamed) destination key.
        job.finalize_metadata();
        self.store
            .put(
                &job.dst_bucket,
                &job.dst_key,
                body,
                job.content_type.as_deref(),
                job.acl.as_deref(),
                &job.metadata,
            )
            .await?;

        // Notification, only under its conditions; absence is silent.
        let notified = if should_notify(&job) {
            let queue_url = job.queue_url.as_deref().unwrap_or_default();
            let message = build_message(&job, &self.public_base_url);
            let json = serde_json::to_string(&message)
                .map_err(|e| super::ports::NotifyError::Delivery(e.to_string()))?;
            info!(queue_url = %queue_url, "sending queue message: {json}");
            self.notifier.send(queue_url, &json).await?;
            true
        } else {
            info!(key = %job.dst_key, "queue message skipped");
            false
        };

        Ok(Outcome::Completed {
            dst_key: job.dst_key,
            width,
            height,
            notified,
        })
    }
}
