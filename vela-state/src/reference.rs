//! State reference facade
//!
//! Composes fetch and parse behind a single handle. The document is loaded
//! exactly once per reference: concurrent first readers block on the same
//! fetch, and a failed load is terminal; every later read re-surfaces the
//! stored error instead of retrying.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::backends::create_fetcher;
use crate::config::BackendConfig;
use crate::document::StateDocument;
use crate::error::{StateError, StateResult};
use crate::value::StateOutput;

/// Read-only handle onto one state document
#[derive(Debug)]
pub struct StateReference {
    config: BackendConfig,
    timeout: Option<Duration>,
    cell: OnceCell<Result<StateDocument, StateError>>,
}

impl StateReference {
    /// Create a reference without fetching anything yet
    ///
    /// The first read (or an explicit [`StateReference::load`]) performs the
    /// one-time fetch and parse.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            timeout: None,
            cell: OnceCell::new(),
        }
    }

    /// Bound the fetch; when exceeded the load fails with
    /// [`StateError::Timeout`]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Create a reference and eagerly fetch and parse its state
    ///
    /// Fetcher and parser errors propagate unmodified. This is the normal
    /// entry point; `new` exists for callers that share the reference before
    /// the first read.
    pub async fn open(config: BackendConfig) -> StateResult<Self> {
        let reference = Self::new(config);
        reference.load().await?;
        Ok(reference)
    }

    /// The backend configuration this reference reads from
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Drive the one-time fetch and parse without reading an output
    pub async fn load(&self) -> StateResult<()> {
        self.document().await.map(|_| ())
    }

    /// Look up a single output by name (case-sensitive, exact match)
    ///
    /// Never performs I/O beyond the reference's one-time load.
    pub async fn get_output(&self, name: &str) -> StateResult<StateOutput> {
        Ok(self.document().await?.output(name)?.clone())
    }

    /// Snapshot of the full outputs mapping
    pub async fn outputs(&self) -> StateResult<BTreeMap<String, StateOutput>> {
        Ok(self.document().await?.outputs().clone())
    }

    /// The parsed document, loading it on first access
    pub async fn document(&self) -> StateResult<&StateDocument> {
        match self.cell.get_or_init(|| self.load_document()).await {
            Ok(document) => Ok(document),
            Err(error) => Err(error.clone()),
        }
    }

    async fn load_document(&self) -> Result<StateDocument, StateError> {
        tracing::debug!(
            backend = self.config.kind(),
            origin = %self.config.origin(),
            "fetching state"
        );

        let fetcher = create_fetcher(&self.config).await?;
        let raw = match self.timeout {
            Some(bound) => tokio::time::timeout(bound, fetcher.fetch())
                .await
                .map_err(|_| StateError::Timeout(bound))??,
            None => fetcher.fetch().await?,
        };

        let document = StateDocument::parse(&raw)?;
        tracing::debug!(
            version = document.version,
            outputs = document.outputs().len(),
            "state document loaded"
        );
        Ok(document)
    }
}
