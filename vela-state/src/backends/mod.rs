//! Fetcher implementations for the supported state backends

mod local;
mod oss;
mod remote;
mod s3;

pub use local::LocalFetcher;
pub use oss::OssFetcher;
pub use remote::RemoteFetcher;
pub use s3::S3Fetcher;

use crate::config::BackendConfig;
use crate::error::StateResult;
use crate::fetch::StateFetcher;

/// Create a fetcher for a backend configuration
///
/// Dispatches to the implementation matching the active variant. Building
/// the S3/OSS fetchers resolves the AWS credentials pipeline, hence async.
pub async fn create_fetcher(config: &BackendConfig) -> StateResult<Box<dyn StateFetcher>> {
    match config {
        BackendConfig::Local(local) => Ok(Box::new(LocalFetcher::new(local.clone()))),
        BackendConfig::S3(s3) => Ok(Box::new(S3Fetcher::from_config(s3).await?)),
        BackendConfig::Oss(oss) => Ok(Box::new(OssFetcher::from_config(oss).await?)),
        BackendConfig::Remote(remote) => Ok(Box::new(RemoteFetcher::new(remote)?)),
    }
}
