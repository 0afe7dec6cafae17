//! Alibaba Cloud OSS fetcher
//!
//! OSS exposes an S3-compatible API, so this rides the same SDK as the S3
//! fetcher pointed at the OSS endpoint, with path-style addressing and
//! static credentials when supplied.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};

use crate::config::OssBackendConfig;
use crate::document::RawState;
use crate::error::StateResult;
use crate::fetch::{StateFetcher, fetch_with_retry};

use super::s3::get_object;

/// Fetcher for state stored in OSS
pub struct OssFetcher {
    client: Client,
    bucket: String,
    key: String,
    origin: String,
}

impl OssFetcher {
    /// Create a new OssFetcher from configuration
    pub async fn from_config(config: &OssBackendConfig) -> StateResult<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint(&config.region));

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(endpoint);

        if let (Some(access_key_id), Some(access_key_secret)) =
            (&config.access_key_id, &config.access_key_secret)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                access_key_secret.expose(),
                None,
                None,
                "vela-oss-static",
            ));
        }

        let aws_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            key: config.object_key(),
            origin: config.origin(),
        })
    }
}

#[async_trait]
impl StateFetcher for OssFetcher {
    async fn fetch(&self) -> StateResult<RawState> {
        fetch_with_retry(&self.origin, || {
            get_object(&self.client, &self.bucket, &self.key, &self.origin)
        })
        .await
    }
}

/// S3-compatible endpoint for an OSS region
fn default_endpoint(region: &str) -> String {
    format!("https://s3.oss-{}.aliyuncs.com", region)
}
