//! Parsed representation of a Terraform state document

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{StateError, StateResult};
use crate::value::{OutputValue, StateOutput};

/// State file format versions this crate can read
///
/// Version 4 is everything from Terraform 0.12 onward; version 3 covers the
/// older root-module layout. Anything else fails fast with
/// [`StateError::UnsupportedVersion`].
pub const SUPPORTED_VERSIONS: &[u64] = &[3, 4];

/// Raw state bytes as fetched from a backend, before parsing
///
/// `origin` is a human-readable locator (`s3://bucket/key`, a file path)
/// carried into parse errors; the value is discarded once parsed.
#[derive(Debug, Clone)]
pub struct RawState {
    pub bytes: Vec<u8>,
    pub origin: String,
}

impl RawState {
    pub fn new(bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        Self {
            bytes,
            origin: origin.into(),
        }
    }
}

/// One output entry as it appears in the document (`{value, type, sensitive}`)
#[derive(Debug, Deserialize)]
struct RawOutputEntry {
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    sensitive: bool,
}

/// A parsed, normalized state document
///
/// Only the metadata and the outputs section are modeled; resources are
/// deliberately ignored, this crate is a read-only output reader.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDocument {
    /// State file format version
    pub version: u64,
    /// Version of Terraform that last wrote this state, when recorded
    pub terraform_version: Option<String>,
    /// Monotonically increasing write counter
    pub serial: u64,
    /// Unique identifier of this state's lineage
    pub lineage: String,
    outputs: BTreeMap<String, StateOutput>,
}

impl StateDocument {
    /// Parse raw state bytes into a normalized document
    ///
    /// Pure and deterministic: identical bytes always produce an identical
    /// document or the identical error.
    pub fn parse(raw: &RawState) -> StateResult<Self> {
        let root: serde_json::Value = serde_json::from_slice(&raw.bytes)
            .map_err(|e| StateError::Format(format!("{}: {}", raw.origin, e)))?;

        let version = root
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| {
                StateError::Format(format!(
                    "{}: missing or non-integer \"version\" field",
                    raw.origin
                ))
            })?;

        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(StateError::unsupported_version(version));
        }

        let outputs_section = match version {
            3 => root_module_outputs(&root),
            _ => root.get("outputs").cloned(),
        };

        let outputs = match outputs_section {
            Some(serde_json::Value::Object(entries)) => entries
                .into_iter()
                .map(|(name, entry)| (name, convert_output_entry(entry)))
                .collect(),
            Some(other) if !other.is_null() => {
                return Err(StateError::Format(format!(
                    "{}: \"outputs\" section is not an object",
                    raw.origin
                )));
            }
            _ => BTreeMap::new(),
        };

        Ok(Self {
            version,
            terraform_version: root
                .get("terraform_version")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            serial: root
                .get("serial")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(0),
            lineage: root
                .get("lineage")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string(),
            outputs,
        })
    }

    /// Look up a single output by name (case-sensitive, exact match)
    pub fn output(&self, name: &str) -> StateResult<&StateOutput> {
        self.outputs
            .get(name)
            .ok_or_else(|| StateError::OutputNotFound(name.to_string()))
    }

    /// The full outputs mapping
    pub fn outputs(&self) -> &BTreeMap<String, StateOutput> {
        &self.outputs
    }
}

/// Extract the outputs object of the root module from a version 3 document
fn root_module_outputs(root: &serde_json::Value) -> Option<serde_json::Value> {
    let modules = root.get("modules")?.as_array()?;
    let root_module = modules
        .iter()
        .find(|module| {
            matches!(module.get("path"),
                Some(serde_json::Value::Array(path)) if path.len() == 1 && path[0] == "root")
        })
        .or_else(|| modules.first())?;
    root_module.get("outputs").cloned()
}

/// Normalize one output entry, keeping the sensitive marker
///
/// Version 2 and older documents store outputs as bare values; those are
/// accepted as non-sensitive.
fn convert_output_entry(entry: serde_json::Value) -> StateOutput {
    if entry.is_object() && entry.get("value").is_some() {
        match serde_json::from_value::<RawOutputEntry>(entry) {
            Ok(raw) => return StateOutput::new(OutputValue::from(raw.value), raw.sensitive),
            Err(_) => return StateOutput::new(OutputValue::Null, false),
        }
    }
    StateOutput::new(OutputValue::from(entry), false)
}
