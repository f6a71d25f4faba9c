//! Fallback Options
//!
//! Options are read once when the transform is built and never change
//! afterwards. They can be given directly or loaded from a JSON object
//! using the camelCase keys `addOverlayFallback`, `addClipFallback` and
//! `operateOnDoubleValues`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys that earlier releases accepted and that now fail the run
pub const REMOVED_OPTIONS: [&str; 2] = ["add", "upgradeHiddenToClip"];

/// Configuration for the fallback pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FallbackOptions {
    /// Insert `auto` before `overlay`
    pub add_overlay_fallback: bool,
    /// Insert `hidden` before `clip`
    pub add_clip_fallback: bool,
    /// Handle the two-keyword `overflow` syntax
    pub operate_on_double_values: bool,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self {
            add_overlay_fallback: true,
            add_clip_fallback: true,
            operate_on_double_values: true,
        }
    }
}

impl FallbackOptions {
    /// Load options from a JSON object. `null` yields the defaults.
    pub fn from_json_value(value: Value) -> Result<Self, ConfigError> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => return Err(ConfigError::NotAnObject(json_type_name(&other))),
        };

        if REMOVED_OPTIONS.iter().any(|key| object.contains_key(*key)) {
            return Err(ConfigError::RemovedOptions);
        }

        Ok(serde_json::from_value(Value::Object(object))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::from_json_value(serde_json::from_str(json)?)
    }

    /// True when neither fallback family is enabled
    pub fn is_noop(&self) -> bool {
        !self.add_overlay_fallback && !self.add_clip_fallback
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Option loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "the `add` and `upgradeHiddenToClip` options are removed. Use the `postcss-overflow-clip` plugin instead."
    )]
    RemovedOptions,

    #[error("options must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid options: {0}")]
    Invalid(#[from] serde_json::Error),
}
