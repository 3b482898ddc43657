//! Synthesis configuration.

use serde::{Deserialize, Serialize};

use crate::cnot_patel::CnotPatelParams;
use crate::error::{SynthError, SynthResult};
use crate::linear_synth::LinearSynthParams;
use crate::tbs::TbsParams;

/// Parameters for every synthesis engine, keyed by engine name.
///
/// Missing sections and fields take their defaults, so `{}` is a valid
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Transformation-based synthesis.
    pub tbs: TbsParams,
    /// CNOT-Patel linear synthesis; also used for the residual map of
    /// Gray-synth.
    pub cnot_patel: CnotPatelParams,
    /// Staircase phase synthesis.
    pub linear_synth: LinearSynthParams,
}

impl SynthConfig {
    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for malformed JSON, unknown sections
    /// or values of the wrong type.
    pub fn from_json_str(json: &str) -> SynthResult<Self> {
        serde_json::from_str(json).map_err(|e| SynthError::InvalidConfiguration(e.to_string()))
    }

    /// Read a configuration from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`SynthConfig::from_json_str`].
    pub fn from_json_value(value: serde_json::Value) -> SynthResult<Self> {
        serde_json::from_value(value).map_err(|e| SynthError::InvalidConfiguration(e.to_string()))
    }

    /// Serialize to a JSON value.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "tbs": self.tbs,
            "cnot_patel": self.cnot_patel,
            "linear_synth": self.linear_synth,
        })
    }
}
