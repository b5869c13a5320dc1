//! User-defined tag policy for EBS volumes and snapshots.
//!
//! Storage class and snapshot class parameters carry `tagSpecification_<n>`
//! and `tagDeletion_<n>` entries. This crate turns them into the concrete set
//! of tags to add and keys to delete for a single create/modify operation:
//!
//! 1. [parse_parameters] extracts ordered [TagDirective]s.
//! 2. Every addition's value is rendered by the [template] interpreter
//!    against an [InterpolationContext].
//! 3. Every key and value is checked by [validate].
//! 4. The [TagPolicyEngine] folds the results into a [ResolvedOperation],
//!    failing or skipping per its [TagPolicyMode].
//!
//! Nothing here talks to the cloud; the output is plain data.

mod config;
mod context;
mod directive;
mod policy;
pub mod template;
mod utils;
mod validate;

pub use config::{ConfigError, TagPolicyConfig, TagPolicyMode, WARN_ON_INVALID_TAG_ENV};
pub use context::{
  InterpolationContext, ResourceKind, PVC_NAMESPACE_KEY, PVC_NAME_KEY, PV_NAME_KEY,
  VOLUME_SNAPSHOT_CONTENT_NAME_KEY, VOLUME_SNAPSHOT_NAMESPACE_KEY, VOLUME_SNAPSHOT_NAME_KEY,
};
pub use directive::{
  parse, parse_parameters, DirectiveError, DirectiveKind, TagDirective, TAG_DELETION_PREFIX,
  TAG_SPECIFICATION_PREFIX,
};
pub use policy::{FailureKind, ResolvedOperation, ResolvedTag, TagPolicyEngine, TagPolicyError};
pub use template::{interpolate, Template, TemplateError};
pub use validate::{
  validate, validate_key, validate_tag_count, TagRejection, DRIVER_CLUSTER_TAG_KEY,
  MAX_TAGS_PER_RESOURCE, MAX_TAG_KEY_LENGTH, MAX_TAG_VALUE_LENGTH, RESERVED_TAG_KEYS,
  SNAPSHOT_NAME_TAG_KEY, VOLUME_NAME_TAG_KEY,
};

use static_assertions::assert_impl_all;

assert_impl_all!(TagPolicyEngine: Send, Sync, Copy);
assert_impl_all!(Template: Send, Sync);
assert_impl_all!(InterpolationContext: Send, Sync);
assert_impl_all!(ResolvedOperation: Send, Sync);
assert_impl_all!(TagPolicyError: Send, Sync, std::error::Error);
