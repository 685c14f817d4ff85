use std::env;

pub enum EnvKey {
    S3Endpoint,
    AwsRegion,
    AwsAccessKey,
    AwsSecretKey,
    EventsQueueUrl,
    PublicBaseUrl,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::AwsRegion => "AWS_REGION",
            EnvKey::AwsAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::AwsSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::EventsQueueUrl => "EVENTS_QUEUE_URL",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}
