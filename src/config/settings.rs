use crate::config::env::{self, EnvKey};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub s3_endpoint: String,
    pub aws_region: String,
    pub aws_access_key: String,
    pub aws_secret_key: String,
    pub events_queue_url: String,
    pub public_base_url: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            s3_endpoint: env::get(EnvKey::S3Endpoint)?,
            aws_region: env::get_or(EnvKey::AwsRegion, "us-east-1"),
            aws_access_key: env::get(EnvKey::AwsAccessKey)?,
            aws_secret_key: env::get(EnvKey::AwsSecretKey)?,
            events_queue_url: env::get(EnvKey::EventsQueueUrl)?,
            public_base_url: env::get_or(EnvKey::PublicBaseUrl, "https://s3.amazonaws.com"),
        })
    }
}
