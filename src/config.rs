// Per-batch behaviour switches
use crate::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};

/// Options controlling how a batch validates and updates its state.
///
/// The defaults reproduce plain array semantics: directions are never
/// renormalised and construction accepts any float. A driver can load the
/// options from JSON with [`Config::from_json_str`] and attach them with
/// `with_config`; batches built by `select` inherit the options of their
/// source batch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rescale deflected directions to unit length after every `rotate`.
    pub renormalize_on_rotate: bool,
    /// Reject NaN and infinite values when a batch is constructed and when
    /// rows are merged in by `add` or `replace`.
    pub require_finite: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object, e.g. `{"renormalize_on_rotate": true}`.
    /// Missing keys take their default value; unknown keys are an error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ErrorKind::InvalidConfig(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ErrorKind::InvalidConfig(e.to_string()))
    }
}
