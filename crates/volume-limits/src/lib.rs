//! Attachment capacity accounting for EBS-backed nodes.
//!
//! Every attach request is checked against the ceiling of the node's instance
//! type before the controller asks the cloud to attach anything. The tables
//! are process wide and immutable, so all entry points are safe to call from
//! any number of concurrent requests. Serializing "check, then reserve" for a
//! single node is left to the caller.

mod accountant;
mod catalog;
mod node;

pub use accountant::{
  capacity_of, compute_capacity, AttachmentDecision, CapacitySource, NodeAttachmentState,
};
pub use catalog::{
  generic_ceiling, InstanceType, InstanceTypeCatalog, InstanceTypeDescriptor,
  BARE_METAL_MAX_VOLUMES, HIGH_MEMORY_METAL_MAX_VOLUMES, HIGH_MEMORY_VIRTUAL_MAX_VOLUMES,
  NITRO_MAX_ATTACHMENTS, NON_NITRO_MAX_ATTACHMENTS,
};
pub use node::{
  max_volumes_per_node, ConfigError, NodeLimitOptions, RESERVED_VOLUME_ATTACHMENTS_ENV,
  VOLUME_ATTACH_LIMIT_ENV,
};

use static_assertions::assert_impl_all;
use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, LimitsError>;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitsError {
  /// The instance type does not have the `family.size` shape. This is a bug
  /// in whatever produced the string, not an operational failure.
  #[error("Cannot determine family of instance type {0:?}")]
  InvalidInstanceType(String),

  /// The node has no room for another volume.
  #[error("Node of type {instance_type} already has {attached} volumes attached (capacity: {capacity})")]
  CapacityExceeded {
    instance_type: String,
    attached: u32,
    capacity: i64,
  },
}

impl LimitsError {
  /// Capacity failures may only be retried against a different node; retrying
  /// on the same node verbatim will fail the same way.
  #[inline]
  pub fn is_retryable_on_same_node(&self) -> bool {
    false
  }

  /// Whether this is a caller bug rather than an operational failure.
  #[inline]
  pub fn is_contract_violation(&self) -> bool {
    matches!(self, LimitsError::InvalidInstanceType(_))
  }
}

assert_impl_all!(InstanceTypeCatalog: Send, Sync);
assert_impl_all!(InstanceTypeDescriptor: Send, Sync);
assert_impl_all!(NodeAttachmentState: Send, Sync);
assert_impl_all!(LimitsError: Send, Sync, std::error::Error);
