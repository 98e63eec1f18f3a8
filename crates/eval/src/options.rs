//! Engine configuration.
//!
//! ```json
//! { "production": true, "max_depth": 64 }
//! ```
//!
//! Every field is optional. The same settings can come from the
//! environment as `VIGIL_PRODUCTION` and `VIGIL_MAX_DEPTH`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 256;

pub const ENV_PRODUCTION: &str = "VIGIL_PRODUCTION";
pub const ENV_MAX_DEPTH: &str = "VIGIL_MAX_DEPTH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Skip report channel and rule shape validation. Malformed rules then
    /// fail without a precise diagnostic.
    pub production: bool,
    /// Deepest rule nesting evaluated before failing with a diagnostic.
    pub max_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            production: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid engine options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} should be true, false, 1 or 0 but instead is '{value}'")]
    InvalidFlag { name: &'static str, value: String },
    #[error("{name} should be a positive integer but instead is '{value}'")]
    InvalidDepth { name: &'static str, value: String },
}

impl EngineOptions {
    pub fn production() -> Self {
        EngineOptions {
            production: true,
            ..EngineOptions::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: EngineOptions = serde_json::from_str(json)?;
        check_depth("max_depth", options.max_depth)?;
        Ok(options)
    }

    /// Defaults overridden by whatever `VIGIL_*` variables are set.
    pub fn from_env() -> Result<Self, OptionsError> {
        EngineOptions::from_vars(std::env::vars())
    }

    /// Like [`EngineOptions::from_env`], reading from the given pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = EngineOptions::default();
        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ENV_PRODUCTION => options.production = parse_flag(ENV_PRODUCTION, value)?,
                ENV_MAX_DEPTH => {
                    let depth = value.parse::<usize>().map_err(|_| OptionsError::InvalidDepth {
                        name: ENV_MAX_DEPTH,
                        value: value.to_string(),
                    })?;
                    options.max_depth = check_depth(ENV_MAX_DEPTH, depth)?;
                }
                _ => {}
            }
        }
        Ok(options)
    }
}

/// Zero would fail every rule nested below the top level.
fn check_depth(name: &'static str, depth: usize) -> Result<usize, OptionsError> {
    if depth == 0 {
        return Err(OptionsError::InvalidDepth {
            name,
            value: depth.to_string(),
        });
    }
    Ok(depth)
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, OptionsError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(OptionsError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
