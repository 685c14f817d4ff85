use serde::Deserialize;

/// S3 event notification payload, as delivered to the events queue.
/// Only the fields the pipeline consumes are modeled.
#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct S3Object {
    pub key: String,
}

/// The source object a single invocation operates on.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl S3Event {
    /// Consumes the first record only. Batched payloads are not iterated;
    /// the caller logs and drops the rest.
    pub fn into_object_ref(self) -> Option<(ObjectRef, usize)> {
        let total = self.records.len();
        let record = self.records.into_iter().next()?;
        Some((
            ObjectRef {
                bucket: record.s3.bucket.name,
                key: record.s3.object.key,
            },
            total,
        ))
    }
}
