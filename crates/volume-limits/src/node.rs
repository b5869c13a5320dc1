use crate::{accountant::compute_capacity, Result};
use std::{
  convert::TryFrom,
  env::{self, VarError},
  str::FromStr,
};
use thiserror::Error;
use tracing::{debug, instrument};

pub const VOLUME_ATTACH_LIMIT_ENV: &str = "CSI_VOLUME_ATTACH_LIMIT";
pub const RESERVED_VOLUME_ATTACHMENTS_ENV: &str = "CSI_RESERVED_VOLUME_ATTACHMENTS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value {value:?} for {name}: expected a non-negative integer")]
pub struct ConfigError {
  name: &'static str,
  value: String,
}

/// Operator knobs for the limit a node advertises to the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeLimitOptions {
  volume_attach_limit: Option<u32>,
  reserved_volume_attachments: Option<u32>,
  block_device_mappings: u32,
}

impl NodeLimitOptions {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reads the operator overrides from the environment. Unset or empty
  /// variables leave the option unset; anything that is not a non-negative
  /// integer, including a value that is not valid Unicode, is an error.
  pub fn from_env() -> std::result::Result<Self, ConfigError> {
    Ok(NodeLimitOptions {
      volume_attach_limit: read_env(VOLUME_ATTACH_LIMIT_ENV)?,
      reserved_volume_attachments: read_env(RESERVED_VOLUME_ATTACHMENTS_ENV)?,
      block_device_mappings: 0,
    })
  }

  /// Advertise this figure verbatim, skipping all computation.
  pub fn with_volume_attach_limit(mut self, limit: u32) -> Self {
    self.volume_attach_limit = Some(limit);
    self
  }

  /// Attachments already taken by the root device and other non-CSI volumes.
  pub fn with_reserved_volume_attachments(mut self, reserved: u32) -> Self {
    self.reserved_volume_attachments = Some(reserved);
    self
  }

  /// Block device mappings reported by instance metadata, excluding the root
  /// device. Only used when reserved attachments are not set explicitly.
  pub fn with_block_device_mappings(mut self, mappings: u32) -> Self {
    self.block_device_mappings = mappings;
    self
  }

  #[inline]
  pub fn volume_attach_limit(&self) -> Option<u32> {
    self.volume_attach_limit
  }

  #[inline]
  pub fn reserved_volume_attachments(&self) -> u32 {
    self
      .reserved_volume_attachments
      .unwrap_or_else(|| self.block_device_mappings.saturating_add(1))
  }
}

fn read_env(name: &'static str) -> std::result::Result<Option<u32>, ConfigError> {
  match env::var(name) {
    Ok(value) if value.trim().is_empty() => Ok(None),
    Ok(value) => u32::from_str(value.trim()).map(Some).map_err(|_| ConfigError {
      name,
      value,
    }),
    Err(VarError::NotPresent) => Ok(None),
    Err(VarError::NotUnicode(value)) => Err(ConfigError {
      name,
      value: value.to_string_lossy().into_owned(),
    }),
  }
}

/// Number of volumes a node of the given type reports it can hold.
#[instrument(level = "debug")]
pub fn max_volumes_per_node(instance_type: &str, options: &NodeLimitOptions) -> Result<u32> {
  if let Some(limit) = options.volume_attach_limit() {
    debug!("Using configured volume attach limit {}", limit);
    return Ok(limit);
  }

  let capacity = compute_capacity(instance_type, 0)?.capacity();
  let available = capacity - i64::from(options.reserved_volume_attachments());

  Ok(u32::try_from(available.max(0)).unwrap_or(u32::MAX))
}
