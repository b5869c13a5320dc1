use std::{
  env::{self, VarError},
  fmt,
  str::FromStr,
};
use thiserror::Error;

pub const WARN_ON_INVALID_TAG_ENV: &str = "CSI_WARN_ON_INVALID_TAG";

/// What to do when a single tag directive cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagPolicyMode {
  /// Reject the whole operation.
  FailFast,
  /// Drop the offending tag, log a warning and carry on.
  WarnAndSkip,
}

impl Default for TagPolicyMode {
  #[inline]
  fn default() -> Self {
    TagPolicyMode::FailFast
  }
}

impl fmt::Display for TagPolicyMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      TagPolicyMode::FailFast => "fail-fast",
      TagPolicyMode::WarnAndSkip => "warn-and-skip",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("Unknown tag policy mode {0:?}")]
  UnknownMode(String),
  #[error("Invalid value {value:?} for {name}: expected a boolean")]
  InvalidBool { name: &'static str, value: String },
}

impl FromStr for TagPolicyMode {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "fail-fast" | "failfast" | "fail" => Ok(TagPolicyMode::FailFast),
      "warn-and-skip" | "warnandskip" | "warn" => Ok(TagPolicyMode::WarnAndSkip),
      _ => Err(ConfigError::UnknownMode(s.to_owned())),
    }
  }
}

/// Process level settings of the tag policy engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagPolicyConfig {
  mode: TagPolicyMode,
}

impl TagPolicyConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reads [WARN_ON_INVALID_TAG_ENV]. Unset means fail fast; a value that is
  /// not a boolean, or not valid Unicode, is an error.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mode = match env::var(WARN_ON_INVALID_TAG_ENV) {
      Ok(value) => {
        if parse_bool(WARN_ON_INVALID_TAG_ENV, &value)? {
          TagPolicyMode::WarnAndSkip
        } else {
          TagPolicyMode::FailFast
        }
      }
      Err(VarError::NotPresent) => TagPolicyMode::FailFast,
      Err(VarError::NotUnicode(value)) => {
        return Err(ConfigError::InvalidBool {
          name: WARN_ON_INVALID_TAG_ENV,
          value: value.to_string_lossy().into_owned(),
        })
      }
    };

    Ok(TagPolicyConfig { mode })
  }

  pub fn with_mode(mut self, mode: TagPolicyMode) -> Self {
    self.mode = mode;
    self
  }

  #[inline]
  pub fn mode(&self) -> TagPolicyMode {
    self.mode
  }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "" | "0" | "false" | "no" | "off" => Ok(false),
    _ => Err(ConfigError::InvalidBool {
      name,
      value: value.to_owned(),
    }),
  }
}
