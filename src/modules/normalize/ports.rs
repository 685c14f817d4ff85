use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::modules::normalize::model::ImageKind;

/// Object fetched from storage, with whatever optional attributes the
/// backend reported.
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub acl: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("access denied: {bucket}/{key}")]
    AccessDenied { bucket: String, key: String },

    #[error("storage transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("image decode failed: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("queue delivery failed: {0}")]
    Delivery(String),
}

/// Any stage failure; aborts the remaining stages and surfaces as an
/// invocation failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// EXIF orientation values. `Normal` still counts as orientation metadata
/// being present; only a missing tag skips the transform branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    pub fn from_exif(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::Normal),
            2 => Some(Self::FlipHorizontal),
            3 => Some(Self::Rotate180),
            4 => Some(Self::FlipVertical),
            5 => Some(Self::Transpose),
            6 => Some(Self::Rotate90),
            7 => Some(Self::Transverse),
            8 => Some(Self::Rotate270),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<FetchedObject, StorageError>;

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
        acl: Option<&str>,
        metadata: &HashMap<String, String>,
    ) -> Result<(), StorageError>;
}

/// Decode/transform/measure capabilities. CPU-bound and synchronous.
pub trait ImageEngine {
    /// Reports the embedded EXIF orientation, or `None` when the image
    /// carries no orientation tag.
    fn orientation(&self, bytes: &[u8]) -> Result<Option<Orientation>, EngineError>;

    /// Applies the rotation/flip implied by the embedded orientation and
    /// re-encodes in the same format.
    fn auto_orient(&self, bytes: &[u8], kind: ImageKind) -> Result<Vec<u8>, EngineError>;

    /// Resizes to fully cover `width`x`height` preserving aspect ratio,
    /// then center-crops the excess.
    fn crop_resize(
        &self,
        bytes: &[u8],
        width: u32,
        height: u32,
        kind: ImageKind,
    ) -> Result<Vec<u8>, EngineError>;

    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), EngineError>;
}

#[async_trait]
pub trait Notifier {
    async fn send(&self, queue_url: &str, body: &str) -> Result<(), NotifyError>;
}
