use std::collections::HashMap;

use crate::modules::normalize::event::ObjectRef;
use crate::modules::normalize::ports::FetchedObject;

/// Metadata marker set after the auto-orient pass has run.
pub const MARKER_ORIENT: &str = "autoorient-timestamp";
/// Metadata marker set after the crop/resize pass has run.
pub const MARKER_CROP: &str = "autocrop-timestamp";

pub const META_QUEUE_EVENT: &str = "sqs-queue-event";
pub const META_QUEUE_URL: &str = "sqs-queue-url";
pub const META_TAGS: &str = "tags";
pub const META_WIDTH: &str = "width";
pub const META_HEIGHT: &str = "height";

/// Tag marking an object as eligible for the square profile variant.
pub const PROFILE_IMAGE_TAG: &str = "profile_image";

/// Edge length of the square profile variant.
pub const SQUARE_EDGE: u32 = 300;

/// The two recognized image types, inferred from the key's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpg,
    Png,
}

impl ImageKind {
    /// Infers the image type from the extension after the last `.` in the
    /// key, case-insensitively. Anything else (including keys without an
    /// extension) is unrecognized.
    pub fn from_key(key: &str) -> Option<Self> {
        let (_, ext) = key.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" => Some(ImageKind::Jpg),
            "png" => Some(ImageKind::Png),
            _ => None,
        }
    }
}

/// Per-invocation job state, built from the trigger event plus the fetched
/// object, and handed by value from stage to stage.
#[derive(Debug, Clone)]
pub struct TransformJob {
    pub src_bucket: String,
    pub src_key: String,
    pub dst_bucket: String,
    pub dst_key: String,
    pub kind: ImageKind,
    /// Invocation timestamp (epoch millis), reused as the marker value.
    pub timestamp: i64,
    pub content_type: Option<String>,
    pub acl: Option<String>,
    pub metadata: HashMap<String, String>,
    pub tags: Option<String>,
    pub queue_event: Option<String>,
    pub queue_url: Option<String>,
    /// Marker key chosen for this invocation, set at most once and only
    /// when a transform actually produced output.
    pub marker: Option<&'static str>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl TransformJob {
    /// Destination bucket/key start equal to the source; only the crop
    /// branch may later rename the destination key.
    pub fn new(source: ObjectRef, kind: ImageKind, timestamp: i64, fetched: &FetchedObject) -> Self {
        let metadata = fetched.metadata.clone();
        let tags = metadata.get(META_TAGS).cloned();
        let queue_event = metadata.get(META_QUEUE_EVENT).cloned();
        let queue_url = metadata.get(META_QUEUE_URL).cloned();

        Self {
            dst_bucket: source.bucket.clone(),
            dst_key: source.key.clone(),
            src_bucket: source.bucket,
            src_key: source.key,
            kind,
            timestamp,
            content_type: fetched.content_type.clone(),
            acl: fetched.acl.clone(),
            metadata,
            tags,
            queue_event,
            queue_url,
            marker: None,
            width: None,
            height: None,
        }
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.metadata.contains_key(marker)
    }

    /// Both markers present: the object has already been oriented and
    /// cropped, nothing left to do on any path.
    pub fn fully_processed(&self) -> bool {
        self.has_marker(MARKER_ORIENT) && self.has_marker(MARKER_CROP)
    }

    pub fn renamed(&self) -> bool {
        self.dst_key != self.src_key
    }

    /// Folds the resolved dimensions, the chosen marker, and the tags back
    /// into the metadata mapping before upload. Pre-existing entries carry
    /// forward untouched.
    pub fn finalize_metadata(&mut self) {
        if let Some(width) = self.width {
            self.metadata.insert(META_WIDTH.to_string(), width.to_string());
        }
        if let Some(height) = self.height {
            self.metadata.insert(META_HEIGHT.to_string(), height.to_string());
        }
        if let Some(marker) = self.marker {
            self.metadata.insert(marker.to_string(), self.timestamp.to_string());
        }
        if let Some(tags) = &self.tags {
            self.metadata.insert(META_TAGS.to_string(), tags.clone());
        }
    }
}

/// Inserts `-square` before the extension: `photos/me.jpg` becomes
/// `photos/me-square.jpg`. Keys without a `.` are returned unchanged.
pub fn square_key(key: &str) -> String {
    match key.rfind('.') {
        Some(idx) => format!("{}-square{}", &key[..idx], &key[idx..]),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_kind_recognizes_jpg_and_png_case_insensitively() {
        assert_eq!(ImageKind::from_key("a/b/photo.jpg"), Some(ImageKind::Jpg));
        assert_eq!(ImageKind::from_key("a/b/photo.JPG"), Some(ImageKind::Jpg));
        assert_eq!(ImageKind::from_key("shot.PnG"), Some(ImageKind::Png));
    }

    #[test]
    fn image_kind_rejects_other_extensions_and_bare_keys() {
        assert_eq!(ImageKind::from_key("archive.gif"), None);
        assert_eq!(ImageKind::from_key("document.jpeg"), None);
        assert_eq!(ImageKind::from_key("no-extension"), None);
    }

    #[test]
    fn square_key_inserts_suffix_before_extension() {
        assert_eq!(square_key("photos/me.jpg"), "photos/me-square.jpg");
        assert_eq!(square_key("a.b/c.png"), "a.b/c-square.png");
        assert_eq!(square_key("plain"), "plain");
    }

    #[test]
    fn finalize_metadata_writes_dimensions_marker_and_tags() {
        let fetched = FetchedObject {
            body: bytes::Bytes::new(),
            content_type: Some("image/jpeg".to_string()),
            acl: None,
            metadata: HashMap::from([
                ("tags".to_string(), "profile_image".to_string()),
                ("owner".to_string(), "u-42".to_string()),
            ]),
        };
        let source = ObjectRef {
            bucket: "media".to_string(),
            key: "me.jpg".to_string(),
        };
        let mut job = TransformJob::new(source, ImageKind::Jpg, 1_700_000_000_000, &fetched);
        job.width = Some(300);
        job.height = Some(300);
        job.marker = Some(MARKER_CROP);
        job.finalize_metadata();

        assert_eq!(job.metadata.get("width").map(String::as_str), Some("300"));
        assert_eq!(job.metadata.get("height").map(String::as_str), Some("300"));
        assert_eq!(
            job.metadata.get(MARKER_CROP).map(String::as_str),
            Some("1700000000000")
        );
        assert_eq!(job.metadata.get("tags").map(String::as_str), Some("profile_image"));
        assert_eq!(job.metadata.get("owner").map(String::as_str), Some("u-42"));
    }
}
