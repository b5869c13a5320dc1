mod dedicated;
mod tables;

use crate::{LimitsError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
  collections::{HashMap, HashSet},
  fmt,
};

pub use tables::{
  BARE_METAL_MAX_VOLUMES, HIGH_MEMORY_METAL_MAX_VOLUMES, HIGH_MEMORY_VIRTUAL_MAX_VOLUMES,
  NITRO_MAX_ATTACHMENTS, NON_NITRO_MAX_ATTACHMENTS,
};

/// An instance type split into its family and size, e.g. `m5d.large`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceType<'a> {
  raw: &'a str,
  family: &'a str,
  size: &'a str,
}

impl<'a> InstanceType<'a> {
  /// Splits on the single `.` separator. Anything else is a caller bug and is
  /// reported as [LimitsError::InvalidInstanceType].
  pub fn parse(raw: &'a str) -> Result<Self> {
    let mut parts = raw.split('.');
    match (parts.next(), parts.next(), parts.next()) {
      (Some(family), Some(size), None) if !family.is_empty() && !size.is_empty() => {
        Ok(InstanceType { raw, family, size })
      }
      _ => Err(LimitsError::InvalidInstanceType(raw.to_owned())),
    }
  }

  #[inline]
  pub fn as_str(&self) -> &'a str {
    self.raw
  }

  #[inline]
  pub fn family(&self) -> &'a str {
    self.family
  }

  #[inline]
  pub fn size(&self) -> &'a str {
    self.size
  }
}

impl fmt::Display for InstanceType<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.raw)
  }
}

/// Everything the catalog knows about one instance type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceTypeDescriptor {
  family: String,
  size: String,
  nitro: bool,
  generic_ceiling: u32,
  hard_override_limit: Option<u32>,
  dedicated_limit: Option<u32>,
  ebs_only_shape_limit: Option<u32>,
  reserved_instance_store_slots: u32,
  reserved_accelerator_slots: u32,
}

impl InstanceTypeDescriptor {
  #[inline]
  pub fn family(&self) -> &str {
    &self.family
  }

  #[inline]
  pub fn size(&self) -> &str {
    &self.size
  }

  /// Whether the instance runs on the Nitro system, which has a single
  /// attachment budget shared between EBS volumes and other devices.
  #[inline]
  pub fn is_nitro(&self) -> bool {
    self.nitro
  }

  #[inline]
  pub fn generic_ceiling(&self) -> u32 {
    self.generic_ceiling
  }

  /// Literal ceiling of a physically constrained model.
  #[inline]
  pub fn hard_override_limit(&self) -> Option<u32> {
    self.hard_override_limit
  }

  /// EBS-only ceiling of a dedicated-limit family. Already accounts for the
  /// local devices of that size.
  #[inline]
  pub fn dedicated_limit(&self) -> Option<u32> {
    self.dedicated_limit
  }

  #[inline]
  pub fn ebs_only_shape_limit(&self) -> Option<u32> {
    self.ebs_only_shape_limit
  }

  #[inline]
  pub fn reserved_instance_store_slots(&self) -> u32 {
    self.reserved_instance_store_slots
  }

  #[inline]
  pub fn reserved_accelerator_slots(&self) -> u32 {
    self.reserved_accelerator_slots
  }

  #[inline]
  pub fn reserved_slots(&self) -> u32 {
    self.reserved_instance_store_slots + self.reserved_accelerator_slots
  }
}

/// Process wide classification tables. Built on first use and never mutated
/// afterwards.
pub struct InstanceTypeCatalog {
  non_nitro_families: HashSet<&'static str>,
  hard_overrides: HashMap<&'static str, u32>,
  dedicated_limits: HashMap<String, u32>,
  instance_store_volumes: HashMap<&'static str, u32>,
  accelerator_devices: HashMap<&'static str, u32>,
  high_memory_metal: Regex,
  high_memory_virtual: Regex,
  bare_metal: Regex,
}

static CATALOG: Lazy<InstanceTypeCatalog> = Lazy::new(InstanceTypeCatalog::new);

impl InstanceTypeCatalog {
  fn new() -> Self {
    InstanceTypeCatalog {
      non_nitro_families: tables::NON_NITRO_FAMILIES.iter().copied().collect(),
      hard_overrides: tables::HARD_OVERRIDE_LIMITS.iter().copied().collect(),
      dedicated_limits: dedicated::build(),
      instance_store_volumes: tables::INSTANCE_STORE_VOLUMES.iter().copied().collect(),
      accelerator_devices: tables::ACCELERATOR_DEVICES.iter().copied().collect(),
      high_memory_metal: shape(r"^u-[a-z0-9]+\.metal$"),
      high_memory_virtual: shape(r"^u-[a-z0-9]+\.[a-z0-9]+"),
      bare_metal: shape(r"[a-z0-9]+\.metal$"),
    }
  }

  /// The shared catalog instance.
  #[inline]
  pub fn get() -> &'static Self {
    &CATALOG
  }

  pub fn classify(&self, instance_type: &str) -> Result<InstanceTypeDescriptor> {
    let it = InstanceType::parse(instance_type)?;
    let nitro = self.is_nitro_family(it.family());

    Ok(InstanceTypeDescriptor {
      family: it.family().to_owned(),
      size: it.size().to_owned(),
      nitro,
      generic_ceiling: generic_ceiling(nitro),
      hard_override_limit: self.hard_override(&it),
      dedicated_limit: self.dedicated_limit(&it),
      ebs_only_shape_limit: self.ebs_only_shape_limit(&it),
      reserved_instance_store_slots: lookup(&self.instance_store_volumes, &it),
      reserved_accelerator_slots: lookup(&self.accelerator_devices, &it),
    })
  }

  /// Unknown families are assumed to be Nitro.
  pub fn is_nitro_family(&self, family: &str) -> bool {
    !self.non_nitro_families.contains(family)
  }

  pub fn is_nitro(&self, instance_type: &str) -> Result<bool> {
    InstanceType::parse(instance_type).map(|it| self.is_nitro_family(it.family()))
  }

  pub fn hard_override(&self, it: &InstanceType<'_>) -> Option<u32> {
    self.hard_overrides.get(it.as_str()).copied()
  }

  pub fn dedicated_limit(&self, it: &InstanceType<'_>) -> Option<u32> {
    self.dedicated_limits.get(it.as_str()).copied()
  }

  pub fn reserved_slots(&self, it: &InstanceType<'_>) -> u32 {
    lookup(&self.instance_store_volumes, it) + lookup(&self.accelerator_devices, it)
  }

  /// Model specific EBS-only ceiling, in priority order: exact override,
  /// high memory bare metal, high memory virtualized, any bare metal.
  pub fn ebs_only_shape_limit(&self, it: &InstanceType<'_>) -> Option<u32> {
    let raw = it.as_str();

    if let Some(limit) = self.hard_override(it) {
      return Some(limit);
    }

    if self.high_memory_metal.is_match(raw) {
      Some(HIGH_MEMORY_METAL_MAX_VOLUMES)
    } else if self.high_memory_virtual.is_match(raw) {
      Some(HIGH_MEMORY_VIRTUAL_MAX_VOLUMES)
    } else if self.bare_metal.is_match(raw) {
      Some(BARE_METAL_MAX_VOLUMES)
    } else {
      None
    }
  }
}

/// Attachment ceiling of a hardware class when nothing more specific is known.
/// Shared with other devices on Nitro, EBS-only otherwise.
#[inline]
pub fn generic_ceiling(nitro: bool) -> u32 {
  if nitro {
    NITRO_MAX_ATTACHMENTS
  } else {
    NON_NITRO_MAX_ATTACHMENTS
  }
}

#[inline]
fn lookup(table: &HashMap<&'static str, u32>, it: &InstanceType<'_>) -> u32 {
  table.get(it.as_str()).copied().unwrap_or(0)
}

fn shape(pattern: &'static str) -> Regex {
  // literal patterns, covered by the tests below
  Regex::new(pattern).expect("invalid instance shape pattern")
}
