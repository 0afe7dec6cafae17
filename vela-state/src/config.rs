//! Backend configuration for locating a state document

use std::path::PathBuf;

use crate::error::{StateError, StateResult};
use crate::secret::Secret;

/// Where a state document lives and how to reach it
///
/// Exactly one variant is active; each variant validates its required
/// fields at construction time, so a `BackendConfig` in hand is always
/// well-formed.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    Local(LocalBackendConfig),
    S3(S3BackendConfig),
    Oss(OssBackendConfig),
    Remote(RemoteBackendConfig),
}

impl BackendConfig {
    /// Backend kind as a short identifier ("local", "s3", "oss", "remote")
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::S3(_) => "s3",
            Self::Oss(_) => "oss",
            Self::Remote(_) => "remote",
        }
    }

    /// Human-readable locator used in errors and logs
    pub fn origin(&self) -> String {
        match self {
            Self::Local(config) => config.origin(),
            Self::S3(config) => config.origin(),
            Self::Oss(config) => config.origin(),
            Self::Remote(config) => config.origin(),
        }
    }
}

/// State stored as a file on the local filesystem
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBackendConfig {
    pub path: PathBuf,
}

impl LocalBackendConfig {
    /// Default state file name, matching Terraform's local backend
    pub const DEFAULT_STATE_FILE: &'static str = "terraform.tfstate";

    /// Configuration pointing at `terraform.tfstate` in the current directory
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(Self::DEFAULT_STATE_FILE),
        }
    }

    /// Configuration pointing at a specific state file
    pub fn with_path(path: impl Into<PathBuf>) -> StateResult<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(StateError::config("local backend requires a state path"));
        }
        Ok(Self { path })
    }

    pub fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// State stored in an S3 bucket
///
/// Region, endpoint, profile and credentials are optional; anything unset is
/// sourced from the standard AWS credentials pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct S3BackendConfig {
    pub bucket: String,
    pub key: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub profile: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<Secret>,
    pub role_arn: Option<String>,
}

impl S3BackendConfig {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> StateResult<Self> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.is_empty() || key.is_empty() {
            return Err(StateError::config(
                "s3 backend requires a bucket and a key",
            ));
        }
        Ok(Self {
            bucket,
            key,
            region: None,
            endpoint: None,
            profile: None,
            access_key: None,
            secret_key: None,
            role_arn: None,
        })
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Use a custom S3 API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Use a named profile from the shared credentials file
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Use a static access key pair instead of the credentials pipeline
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<Secret>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Assume an IAM role before reading the state object
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    pub fn origin(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// State stored in an Alibaba Cloud OSS bucket
#[derive(Debug, Clone, PartialEq)]
pub struct OssBackendConfig {
    pub bucket: String,
    pub region: String,
    pub key: String,
    pub prefix: Option<String>,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<Secret>,
}

impl OssBackendConfig {
    /// Default state object name, matching Terraform's oss backend
    pub const DEFAULT_KEY: &'static str = "terraform.tfstate";

    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> StateResult<Self> {
        let bucket = bucket.into();
        let region = region.into();
        if bucket.is_empty() || region.is_empty() {
            return Err(StateError::config(
                "oss backend requires a bucket and a region",
            ));
        }
        Ok(Self {
            bucket,
            region,
            key: Self::DEFAULT_KEY.to_string(),
            prefix: None,
            endpoint: None,
            access_key_id: None,
            access_key_secret: None,
        })
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Path directory the state object is stored under
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Use a custom OSS API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<Secret>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.access_key_secret = Some(access_key_secret.into());
        self
    }

    /// Full object key, joining the optional prefix and the key
    pub fn object_key(&self) -> String {
        match self.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => {
                format!("{}/{}", prefix, self.key.trim_start_matches('/'))
            }
            _ => self.key.trim_start_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> String {
        format!("oss://{}/{}", self.bucket, self.object_key())
    }
}

/// State held by a Terraform Cloud/Enterprise workspace
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteBackendConfig {
    /// Backend hostname; `https` is assumed when no scheme is given
    pub hostname: String,
    pub organization: String,
    pub workspace: String,
    pub token: Secret,
}

impl RemoteBackendConfig {
    /// Default remote backend hostname
    pub const DEFAULT_HOSTNAME: &'static str = "app.terraform.io";

    pub fn new(
        organization: impl Into<String>,
        workspace: impl Into<String>,
        token: impl Into<Secret>,
    ) -> StateResult<Self> {
        let organization = organization.into();
        let workspace = workspace.into();
        let token = token.into();
        if organization.is_empty() || workspace.is_empty() {
            return Err(StateError::config(
                "remote backend requires an organization and a workspace name",
            ));
        }
        if token.is_empty() {
            return Err(StateError::config("remote backend requires an API token"));
        }
        Ok(Self {
            hostname: Self::DEFAULT_HOSTNAME.to_string(),
            organization,
            workspace,
            token,
        })
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn origin(&self) -> String {
        format!(
            "remote://{}/{}@{}",
            self.organization, self.workspace, self.hostname
        )
    }
}
