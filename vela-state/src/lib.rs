//! Vela State Access
//!
//! This crate provides read-only access to Terraform state documents stored
//! in various backends (local files, S3, Alibaba OSS, Terraform
//! Cloud/Enterprise workspaces), exposing their outputs as typed values.
//!
//! # Overview
//!
//! The state access layer consists of:
//!
//! - **BackendConfig**: Where a state document lives (one variant per
//!   backend, validated at construction)
//! - **StateFetcher**: A trait for retrieving raw state bytes from a backend
//! - **StateDocument**: The parsed, version-checked document with its
//!   outputs section normalized into [`OutputValue`] trees
//! - **StateReference**: The facade composing fetch and parse behind
//!   `get_output`/`outputs`, with a one-time load per reference
//!
//! # Example
//!
//! ```ignore
//! use vela_state::{BackendConfig, S3BackendConfig, StateReference};
//!
//! let config = BackendConfig::S3(
//!     S3BackendConfig::new("my-state-bucket", "infra/prod/terraform.tfstate")?
//!         .with_region("ap-northeast-1"),
//! );
//!
//! let reference = StateReference::open(config).await?;
//!
//! // No further I/O happens after open; reads are lookups into the
//! // parsed document.
//! let vpc_id = reference.get_output("vpc_id").await?;
//! for (name, output) in reference.outputs().await? {
//!     println!("{name}: sensitive={}", output.sensitive);
//! }
//! ```

pub mod backends;
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod reference;
pub mod secret;
pub mod value;

// Re-export main types for convenience
pub use backends::create_fetcher;
pub use config::{
    BackendConfig, LocalBackendConfig, OssBackendConfig, RemoteBackendConfig, S3BackendConfig,
};
pub use document::{RawState, StateDocument, SUPPORTED_VERSIONS};
pub use error::{StateError, StateResult};
pub use fetch::StateFetcher;
pub use reference::StateReference;
pub use secret::Secret;
pub use value::{OutputValue, StateOutput};
