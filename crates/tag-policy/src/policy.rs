use crate::{
  config::{TagPolicyConfig, TagPolicyMode},
  context::InterpolationContext,
  directive::{parse_parameters, DirectiveError, DirectiveKind, TagDirective},
  template::{interpolate, TemplateError},
  utils::Record,
  validate::{validate, validate_key, TagRejection},
};
use std::{
  collections::{BTreeMap, BTreeSet, HashMap},
  hash::BuildHasher,
};
use thiserror::Error;
use tracing::{debug, field, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
  MalformedDirective,
  TemplateDisallowed,
  InterpolationFailed,
  TagRejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagPolicyError {
  #[error(transparent)]
  MalformedDirective(#[from] DirectiveError),

  #[error("Tag directive {directive} uses a disabled function: {source}")]
  TemplateDisallowed {
    directive: TagDirective,
    source: TemplateError,
  },

  #[error("Failed to interpolate tag directive {directive}: {source}")]
  InterpolationFailed {
    directive: TagDirective,
    source: TemplateError,
  },

  #[error("Tag directive {directive} rejected: {source}")]
  TagRejected {
    directive: TagDirective,
    source: TagRejection,
  },
}

impl TagPolicyError {
  pub fn kind(&self) -> FailureKind {
    match self {
      TagPolicyError::MalformedDirective(_) => FailureKind::MalformedDirective,
      TagPolicyError::TemplateDisallowed { .. } => FailureKind::TemplateDisallowed,
      TagPolicyError::InterpolationFailed { .. } => FailureKind::InterpolationFailed,
      TagPolicyError::TagRejected { .. } => FailureKind::TagRejected,
    }
  }

  /// The offending directive, if the failure is tied to one.
  pub fn directive(&self) -> Option<&TagDirective> {
    match self {
      TagPolicyError::MalformedDirective(_) => None,
      TagPolicyError::TemplateDisallowed { directive, .. }
      | TagPolicyError::InterpolationFailed { directive, .. }
      | TagPolicyError::TagRejected { directive, .. } => Some(directive),
    }
  }

  /// Failures that abort the operation regardless of [TagPolicyMode].
  pub fn is_always_fatal(&self) -> bool {
    matches!(
      self.kind(),
      FailureKind::MalformedDirective | FailureKind::TemplateDisallowed
    )
  }
}

/// A fully resolved tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedTag {
  pub key: String,
  pub value: String,
}

/// The tag instructions to send to the cloud API for one operation.
///
/// Tag keys are unique and ordered. A key never appears in both the tags to
/// add and the keys to delete: a deletion always wins over an addition of the
/// same key, whichever comes first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOperation {
  add_tags: BTreeMap<String, String>,
  delete_keys: BTreeSet<String>,
  skipped: Vec<TagPolicyError>,
}

impl ResolvedOperation {
  fn add(&mut self, key: String, value: String) {
    if self.delete_keys.contains(&key) {
      debug!("Tag {:?} is also deleted, dropping addition", key);
      return;
    }

    self.add_tags.insert(key, value);
  }

  fn delete(&mut self, key: String) {
    if self.add_tags.remove(&key).is_some() {
      debug!("Tag {:?} is also deleted, dropping earlier addition", key);
    }

    self.delete_keys.insert(key);
  }

  #[inline]
  pub fn add_tags(&self) -> &BTreeMap<String, String> {
    &self.add_tags
  }

  pub fn tags(&self) -> impl Iterator<Item = ResolvedTag> + '_ {
    self.add_tags.iter().map(|(key, value)| ResolvedTag {
      key: key.clone(),
      value: value.clone(),
    })
  }

  #[inline]
  pub fn delete_keys(&self) -> &BTreeSet<String> {
    &self.delete_keys
  }

  /// Directives dropped under [TagPolicyMode::WarnAndSkip]. Always empty in
  /// [TagPolicyMode::FailFast].
  #[inline]
  pub fn skipped(&self) -> &[TagPolicyError] {
    &self.skipped
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.add_tags.is_empty() && self.delete_keys.is_empty()
  }
}

enum Resolution {
  Add(String, String),
  Delete(String),
}

/// Turns tag directives into the set of tags to apply, interpolating and
/// validating each one on the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagPolicyEngine {
  mode: TagPolicyMode,
}

impl TagPolicyEngine {
  pub fn new(mode: TagPolicyMode) -> Self {
    TagPolicyEngine { mode }
  }

  pub fn from_config(config: &TagPolicyConfig) -> Self {
    Self::new(config.mode())
  }

  #[inline]
  pub fn mode(&self) -> TagPolicyMode {
    self.mode
  }

  /// Resolves directives in order. A later addition of a key overwrites an
  /// earlier one, and a deletion of a key wins over every addition of it.
  ///
  /// Malformed directives and disabled template functions always fail the
  /// operation. Other failures fail it in [TagPolicyMode::FailFast] and are
  /// skipped with a warning in [TagPolicyMode::WarnAndSkip].
  #[instrument(
    skip(self, directives, ctx),
    fields(mode = %self.mode, directives = directives.len(), resolved = field::Empty)
  )]
  pub fn resolve(
    &self,
    directives: &[TagDirective],
    ctx: &InterpolationContext,
  ) -> Result<ResolvedOperation, TagPolicyError> {
    let mut operation = ResolvedOperation::default();

    for directive in directives {
      match resolve_one(directive, ctx) {
        Ok(Resolution::Add(key, value)) => operation.add(key, value),
        Ok(Resolution::Delete(key)) => operation.delete(key),
        Err(e) if self.mode == TagPolicyMode::WarnAndSkip && !e.is_always_fatal() => {
          warn!("Skipping tag directive: {}", e);
          operation.skipped.push(e);
        }
        Err(e) => {
          debug!("Rejecting operation: {}", e);
          return Err(e);
        }
      }
    }

    Ok(operation.record_field("resolved"))
  }

  /// Extracts the directives from request parameters and resolves them.
  pub fn resolve_parameters<S>(
    &self,
    parameters: &HashMap<String, String, S>,
    ctx: &InterpolationContext,
  ) -> Result<ResolvedOperation, TagPolicyError>
  where
    S: BuildHasher,
  {
    let directives = parse_parameters(parameters)?;
    self.resolve(&directives, ctx)
  }
}

fn resolve_one(
  directive: &TagDirective,
  ctx: &InterpolationContext,
) -> Result<Resolution, TagPolicyError> {
  let rejected = |source| TagPolicyError::TagRejected {
    directive: directive.clone(),
    source,
  };

  match directive.kind() {
    DirectiveKind::Add => {
      let value = interpolate(directive.template(), ctx).map_err(|source| {
        if source.is_disallowed() {
          TagPolicyError::TemplateDisallowed {
            directive: directive.clone(),
            source,
          }
        } else {
          TagPolicyError::InterpolationFailed {
            directive: directive.clone(),
            source,
          }
        }
      })?;

      validate(directive.key(), &value).map_err(rejected)?;
      Ok(Resolution::Add(directive.key().to_owned(), value))
    }
    DirectiveKind::Delete => {
      validate_key(directive.key()).map_err(rejected)?;
      Ok(Resolution::Delete(directive.key().to_owned()))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{template::EvalError, validate::VOLUME_NAME_TAG_KEY};
  use test_case::test_case;

  fn ctx() -> InterpolationContext {
    InterpolationContext::volume()
      .with_namespace("payments-prod")
      .with_name("ledger-data")
      .with_parent_name("pvc-42")
  }

  fn tags(op: &ResolvedOperation) -> Vec<(&str, &str)> {
    op.add_tags()
      .iter()
      .map(|(k, v)| (k.as_str(), v.as_str()))
      .collect()
  }

  fn deletes(op: &ResolvedOperation) -> Vec<&str> {
    op.delete_keys().iter().map(String::as_str).collect()
  }

  #[test_case(TagPolicyMode::FailFast ; "fail fast")]
  #[test_case(TagPolicyMode::WarnAndSkip ; "warn and skip")]
  fn resolves_valid_directives(mode: TagPolicyMode) {
    let op = TagPolicyEngine::new(mode)
      .resolve(
        &[
          TagDirective::add("team", "{{ .PVCNamespace | field \"-\" 0 }}"),
          TagDirective::add("prod", "{{ .PVCNamespace | contains \"prod\" }}"),
          TagDirective::add("empty", ""),
          TagDirective::delete("legacy"),
        ],
        &ctx(),
      )
      .unwrap();

    assert_eq!(
      tags(&op),
      vec![("empty", ""), ("prod", "true"), ("team", "payments")]
    );
    assert_eq!(deletes(&op), vec!["legacy"]);
    assert!(op.skipped().is_empty());
  }

  #[test]
  fn later_add_overwrites() {
    let op = TagPolicyEngine::default()
      .resolve(
        &[TagDirective::add("team", "a"), TagDirective::add("team", "b")],
        &ctx(),
      )
      .unwrap();

    assert_eq!(tags(&op), vec![("team", "b")]);
  }

  #[test_case(&[TagDirective::add("team", "a"), TagDirective::delete("team")] ; "delete after add")]
  #[test_case(&[TagDirective::delete("team"), TagDirective::add("team", "a")] ; "delete before add")]
  fn delete_dominates(directives: &[TagDirective]) {
    for mode in &[TagPolicyMode::FailFast, TagPolicyMode::WarnAndSkip] {
      let op = TagPolicyEngine::new(*mode).resolve(directives, &ctx()).unwrap();

      assert!(op.add_tags().is_empty());
      assert_eq!(deletes(&op), vec!["team"]);
    }
  }

  #[test]
  fn fail_fast_returns_offending_directive() {
    let bad = TagDirective::add("owner", "{{ .VolumeSnapshotName }}");
    let err = TagPolicyEngine::new(TagPolicyMode::FailFast)
      .resolve(
        &[TagDirective::add("team", "a"), bad.clone(), TagDirective::add("b", "c")],
        &ctx(),
      )
      .unwrap_err();

    assert_eq!(err.kind(), FailureKind::InterpolationFailed);
    assert_eq!(err.directive(), Some(&bad));
    assert_eq!(
      err,
      TagPolicyError::InterpolationFailed {
        directive: bad,
        source: TemplateError::Eval(EvalError::MissingContext("VolumeSnapshotName".to_owned())),
      }
    );
  }

  #[test]
  fn warn_and_skip_keeps_valid_tags() {
    let op = TagPolicyEngine::new(TagPolicyMode::WarnAndSkip)
      .resolve(
        &[
          TagDirective::add("bad*key", "x"),
          TagDirective::add("team", "payments"),
        ],
        &ctx(),
      )
      .unwrap();

    assert_eq!(tags(&op), vec![("team", "payments")]);
    assert_eq!(op.skipped().len(), 1);
    assert_eq!(op.skipped()[0].kind(), FailureKind::TagRejected);
  }

  #[test]
  fn warn_and_skip_may_be_empty() {
    let op = TagPolicyEngine::new(TagPolicyMode::WarnAndSkip)
      .resolve(&[TagDirective::add("team", "{{ .Nope }}")], &ctx())
      .unwrap();

    assert!(op.is_empty());
    assert_eq!(op.skipped()[0].kind(), FailureKind::InterpolationFailed);
  }

  #[test_case(TagPolicyMode::FailFast, "{{ .PVCName | js }}" ; "fail fast")]
  #[test_case(TagPolicyMode::WarnAndSkip, "{{ .PVCName | js }}" ; "warn and skip")]
  #[test_case(TagPolicyMode::FailFast, "{{ .PVCName | js }}{{ $x }}" ; "fail fast with lex error")]
  #[test_case(TagPolicyMode::WarnAndSkip, "{{ .PVCName | js }}{{ $x }}" ; "warn and skip with lex error")]
  #[test_case(TagPolicyMode::WarnAndSkip, "{{ js .PVCName }}{{" ; "warn and skip with unclosed action")]
  fn disallowed_function_is_fatal(mode: TagPolicyMode, template: &str) {
    let directive = TagDirective::add("team", template);
    let err = TagPolicyEngine::new(mode)
      .resolve(&[TagDirective::add("ok", "1"), directive.clone()], &ctx())
      .unwrap_err();

    assert_eq!(
      err,
      TagPolicyError::TemplateDisallowed {
        directive,
        source: TemplateError::Disallowed("js".to_owned()),
      }
    );
  }

  #[test]
  fn escaped_control_characters_are_rejected() {
    let err = TagPolicyEngine::default()
      .resolve(&[TagDirective::add("team", r#"{{ "a\nb" }}"#)], &ctx())
      .unwrap_err();

    assert_eq!(err.kind(), FailureKind::TagRejected);
  }

  #[test]
  fn reserved_key_is_never_applied() {
    let directives = [
      TagDirective::add(VOLUME_NAME_TAG_KEY, "spoofed"),
      TagDirective::delete(VOLUME_NAME_TAG_KEY),
    ];

    for directive in &directives {
      let err = TagPolicyEngine::new(TagPolicyMode::FailFast)
        .resolve(std::slice::from_ref(directive), &ctx())
        .unwrap_err();
      assert_eq!(err.kind(), FailureKind::TagRejected);

      let op = TagPolicyEngine::new(TagPolicyMode::WarnAndSkip)
        .resolve(std::slice::from_ref(directive), &ctx())
        .unwrap();
      assert!(op.is_empty());
      assert_eq!(op.skipped()[0].kind(), FailureKind::TagRejected);
    }
  }

  #[test]
  fn malformed_parameters_fail_in_every_mode() {
    let parameters = vec![("tagSpecification_1".to_owned(), "missing-equals".to_owned())]
      .into_iter()
      .collect::<HashMap<_, _>>();

    for mode in &[TagPolicyMode::FailFast, TagPolicyMode::WarnAndSkip] {
      let err = TagPolicyEngine::new(*mode)
        .resolve_parameters(&parameters, &ctx())
        .unwrap_err();
      assert_eq!(err.kind(), FailureKind::MalformedDirective);
      assert!(err.directive().is_none());
    }
  }
}
