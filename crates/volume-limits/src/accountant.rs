use crate::{
  catalog::{InstanceTypeCatalog, InstanceTypeDescriptor},
  LimitsError, Result,
};
use std::convert::TryFrom;
use tracing::{debug, error, instrument};

/// Which rule produced the capacity of an instance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapacitySource {
  HardOverride,
  Dedicated,
  ShapeLimit,
  Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentDecision {
  allowed: bool,
  capacity: i64,
  source: CapacitySource,
}

impl AttachmentDecision {
  /// Whether one more volume may be attached.
  #[inline]
  pub fn allowed(&self) -> bool {
    self.allowed
  }

  /// Number of volumes the node can hold. May be zero or negative, in which
  /// case every attach is rejected.
  #[inline]
  pub fn capacity(&self) -> i64 {
    self.capacity
  }

  #[inline]
  pub fn source(&self) -> CapacitySource {
    self.source
  }
}

/// Volume capacity of a classified instance type. The first three rules are
/// measured per model and already account for local devices; only the generic
/// fallback subtracts reserved slots.
pub fn capacity_of(descriptor: &InstanceTypeDescriptor) -> (i64, CapacitySource) {
  if let Some(limit) = descriptor.hard_override_limit() {
    (i64::from(limit), CapacitySource::HardOverride)
  } else if let Some(limit) = descriptor.dedicated_limit() {
    (i64::from(limit), CapacitySource::Dedicated)
  } else if let Some(limit) = descriptor.ebs_only_shape_limit() {
    (i64::from(limit), CapacitySource::ShapeLimit)
  } else {
    (
      i64::from(descriptor.generic_ceiling()) - i64::from(descriptor.reserved_slots()),
      CapacitySource::Generic,
    )
  }
}

/// Decides whether attaching another volume to a node of the given type would
/// exceed its attachment ceiling.
///
/// `currently_attached` must be a fresh count, and the caller must serialize
/// the check and the reservation that follows it per node.
#[instrument(level = "debug")]
pub fn compute_capacity(instance_type: &str, currently_attached: u32) -> Result<AttachmentDecision> {
  let descriptor = InstanceTypeCatalog::get()
    .classify(instance_type)
    .map_err(|e| {
      error!("{}", e);
      e
    })?;
  let (capacity, source) = capacity_of(&descriptor);
  let allowed = i64::from(currently_attached) < capacity;

  debug!(
    capacity,
    ?source,
    allowed,
    "Computed attachment capacity for {}",
    instance_type
  );

  Ok(AttachmentDecision {
    allowed,
    capacity,
    source,
  })
}

/// Snapshot of a node's attachments, as handed over by the attach/detach
/// orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAttachmentState {
  instance_type: String,
  currently_attached: u32,
}

impl NodeAttachmentState {
  pub fn new(instance_type: impl Into<String>, currently_attached: u32) -> Self {
    NodeAttachmentState {
      instance_type: instance_type.into(),
      currently_attached,
    }
  }

  #[inline]
  pub fn instance_type(&self) -> &str {
    &self.instance_type
  }

  #[inline]
  pub fn currently_attached(&self) -> u32 {
    self.currently_attached
  }

  /// Admits one more attachment or fails with [LimitsError::CapacityExceeded].
  pub fn admit(&self) -> Result<AttachmentDecision> {
    let decision = compute_capacity(&self.instance_type, self.currently_attached)?;
    if decision.allowed() {
      Ok(decision)
    } else {
      Err(LimitsError::CapacityExceeded {
        instance_type: self.instance_type.clone(),
        attached: self.currently_attached,
        capacity: decision.capacity(),
      })
    }
  }

  /// Attachments left before the ceiling is reached.
  pub fn remaining(&self) -> Result<u32> {
    let decision = compute_capacity(&self.instance_type, self.currently_attached)?;
    let remaining = decision.capacity() - i64::from(self.currently_attached);
    Ok(u32::try_from(remaining.max(0)).unwrap_or(u32::MAX))
  }
}
