//! S3 fetcher
//!
//! Builds a client from the standard AWS credentials pipeline, layered with
//! whatever the configuration overrides (region, endpoint, profile, static
//! keys, assumed role), then GETs the state object with bounded retry on
//! transient failures.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;

use crate::config::S3BackendConfig;
use crate::document::RawState;
use crate::error::{StateError, StateResult};
use crate::fetch::{StateFetcher, fetch_with_retry};

/// Fetcher for state stored in S3
pub struct S3Fetcher {
    client: Client,
    bucket: String,
    key: String,
    origin: String,
}

impl S3Fetcher {
    /// Create a new S3Fetcher from configuration
    pub async fn from_config(config: &S3BackendConfig) -> StateResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key.expose(),
                None,
                None,
                "vela-static",
            ));
        }
        if let Some(role_arn) = &config.role_arn {
            let provider = aws_config::sts::AssumeRoleProvider::builder(role_arn)
                .session_name("vela-state")
                .build()
                .await;
            loader = loader.credentials_provider(provider);
        }

        let aws_config = loader.load().await;

        Ok(Self {
            client: Client::new(&aws_config),
            bucket: config.bucket.clone(),
            key: config.key.clone(),
            origin: config.origin(),
        })
    }
}

#[async_trait]
impl StateFetcher for S3Fetcher {
    async fn fetch(&self) -> StateResult<RawState> {
        fetch_with_retry(&self.origin, || {
            get_object(&self.client, &self.bucket, &self.key, &self.origin)
        })
        .await
    }
}

/// GET one object and collect its body
///
/// Shared with the OSS fetcher, which talks to the same API shape.
pub(super) async fn get_object(
    client: &Client,
    bucket: &str,
    key: &str,
    origin: &str,
) -> StateResult<RawState> {
    let result = client.get_object().bucket(bucket).key(key).send().await;

    match result {
        Ok(output) => {
            let body = output
                .body
                .collect()
                .await
                .map_err(|e| StateError::Io(format!("{}: {}", origin, e)))?;
            Ok(RawState::new(body.into_bytes().to_vec(), origin))
        }
        Err(err) => Err(classify_get_error(err, origin)),
    }
}

/// Map an SDK error onto the state error taxonomy
///
/// 404/NoSuchKey means the object is absent, 401/403 means the credentials
/// were rejected; everything else is treated as a transport failure and is
/// eligible for retry.
fn classify_get_error(err: SdkError<GetObjectError>, origin: &str) -> StateError {
    if err
        .as_service_error()
        .is_some_and(|service| service.is_no_such_key())
    {
        return StateError::NotFound(origin.to_string());
    }

    if let Some(raw) = err.raw_response() {
        return match raw.status().as_u16() {
            404 => StateError::NotFound(origin.to_string()),
            401 | 403 => StateError::Auth(format!("access denied for {}", origin)),
            _ => StateError::Network(format!("{}: {}", origin, err)),
        };
    }

    StateError::Network(format!("{}: {}", origin, err))
}
