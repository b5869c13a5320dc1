use std::collections::{BTreeMap, HashMap};

pub const PVC_NAMESPACE_KEY: &str = "csi.storage.k8s.io/pvc/namespace";
pub const PVC_NAME_KEY: &str = "csi.storage.k8s.io/pvc/name";
pub const PV_NAME_KEY: &str = "csi.storage.k8s.io/pv/name";

pub const VOLUME_SNAPSHOT_NAMESPACE_KEY: &str = "csi.storage.k8s.io/volumesnapshot/namespace";
pub const VOLUME_SNAPSHOT_NAME_KEY: &str = "csi.storage.k8s.io/volumesnapshot/name";
pub const VOLUME_SNAPSHOT_CONTENT_NAME_KEY: &str =
  "csi.storage.k8s.io/volumesnapshotcontent/name";

/// The kind of resource a tag set is resolved for. Determines which template
/// fields are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
  Volume,
  Snapshot,
}

impl ResourceKind {
  /// Template field names for namespace, name and parent name, in that order.
  fn field_names(self) -> [&'static str; 3] {
    match self {
      ResourceKind::Volume => ["PVCNamespace", "PVCName", "PVName"],
      ResourceKind::Snapshot => [
        "VolumeSnapshotNamespace",
        "VolumeSnapshotName",
        "VolumeSnapshotContentName",
      ],
    }
  }

  fn parameter_keys(self) -> [&'static str; 3] {
    match self {
      ResourceKind::Volume => [PVC_NAMESPACE_KEY, PVC_NAME_KEY, PV_NAME_KEY],
      ResourceKind::Snapshot => [
        VOLUME_SNAPSHOT_NAMESPACE_KEY,
        VOLUME_SNAPSHOT_NAME_KEY,
        VOLUME_SNAPSHOT_CONTENT_NAME_KEY,
      ],
    }
  }
}

/// Per-request metadata that tag templates may reference.
///
/// The fields are only populated when the orchestrator propagates request
/// metadata; an unset field is an error when referenced, never a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationContext {
  kind: ResourceKind,
  namespace: Option<String>,
  name: Option<String>,
  parent_name: Option<String>,
  extra: BTreeMap<String, String>,
}

impl InterpolationContext {
  pub fn new(kind: ResourceKind) -> Self {
    InterpolationContext {
      kind,
      namespace: None,
      name: None,
      parent_name: None,
      extra: BTreeMap::new(),
    }
  }

  #[inline]
  pub fn volume() -> Self {
    Self::new(ResourceKind::Volume)
  }

  #[inline]
  pub fn snapshot() -> Self {
    Self::new(ResourceKind::Snapshot)
  }

  /// Builds a context from the request parameters injected by the
  /// provisioner or snapshotter sidecars.
  pub fn from_parameters(kind: ResourceKind, parameters: &HashMap<String, String>) -> Self {
    let [namespace, name, parent_name] = kind.parameter_keys();

    InterpolationContext {
      namespace: parameters.get(namespace).cloned(),
      name: parameters.get(name).cloned(),
      parent_name: parameters.get(parent_name).cloned(),
      ..Self::new(kind)
    }
  }

  pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
    self.namespace = Some(namespace.into());
    self
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Name of the produced volume, or of the snapshot content.
  pub fn with_parent_name(mut self, parent_name: impl Into<String>) -> Self {
    self.parent_name = Some(parent_name.into());
    self
  }

  pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.extra.insert(name.into(), value.into());
    self
  }

  #[inline]
  pub fn kind(&self) -> ResourceKind {
    self.kind
  }

  #[inline]
  pub fn namespace(&self) -> Option<&str> {
    self.namespace.as_deref()
  }

  #[inline]
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  #[inline]
  pub fn parent_name(&self) -> Option<&str> {
    self.parent_name.as_deref()
  }

  /// Looks up a template field by name, e.g. `PVCNamespace`.
  pub fn field(&self, field: &str) -> Option<&str> {
    let [namespace, name, parent_name] = self.kind.field_names();

    if field == namespace {
      self.namespace()
    } else if field == name {
      self.name()
    } else if field == parent_name {
      self.parent_name()
    } else {
      self.extra.get(field).map(String::as_str)
    }
  }
}
