use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MAX_TAG_KEY_LENGTH: usize = 128;
pub const MAX_TAG_VALUE_LENGTH: usize = 256;
pub const MAX_TAGS_PER_RESOURCE: usize = 50;

/// Tag the driver stores the volume name under, used to find volumes again.
pub const VOLUME_NAME_TAG_KEY: &str = "CSIVolumeName";
/// Tag the driver stores the snapshot name under.
pub const SNAPSHOT_NAME_TAG_KEY: &str = "CSIVolumeSnapshotName";
/// Tag identifying resources owned by this driver's cluster.
pub const DRIVER_CLUSTER_TAG_KEY: &str = "ebs.csi.aws.com/cluster";

pub const RESERVED_TAG_KEYS: &[&str] = &[
  VOLUME_NAME_TAG_KEY,
  SNAPSHOT_NAME_TAG_KEY,
  DRIVER_CLUSTER_TAG_KEY,
];

const AWS_TAG_KEY_PREFIX: &str = "aws:";
const KUBERNETES_TAG_KEY_PREFIX: &str = "kubernetes.io";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagRejection {
  #[error("tag key cannot be empty")]
  EmptyKey,
  #[error("tag key too long (actual: {actual}, limit: {limit})")]
  KeyTooLong { actual: usize, limit: usize },
  #[error("tag value too long (actual: {actual}, limit: {limit})")]
  ValueTooLong { actual: usize, limit: usize },
  #[error("tag {part} contains invalid character {found:?}")]
  InvalidCharacter { part: &'static str, found: char },
  #[error("tag key {0:?} is reserved")]
  ReservedKey(String),
  #[error("tag key {key:?} uses reserved prefix {prefix:?}")]
  ReservedPrefix { key: String, prefix: &'static str },
  #[error("too many tags (actual: {actual}, limit: {limit})")]
  TooManyTags { actual: usize, limit: usize },
}

/// Anything outside letters, numbers, separators and `_ . : / = + - @`.
/// Control characters such as `\n` and `\t` are not separators.
static INVALID_CHARACTER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"[^\p{L}\p{N}\p{Z}_.:/=+\-@]").expect("invalid tag character pattern")
});

fn check_characters(part: &'static str, s: &str) -> Result<(), TagRejection> {
  match INVALID_CHARACTER
    .find(s)
    .and_then(|m| m.as_str().chars().next())
  {
    Some(found) => Err(TagRejection::InvalidCharacter { part, found }),
    None => Ok(()),
  }
}

/// Checks a key on its own. Used for deletions, and as the first half of
/// [validate].
pub fn validate_key(key: &str) -> Result<(), TagRejection> {
  let len = key.chars().count();
  if len == 0 {
    return Err(TagRejection::EmptyKey);
  }
  if len > MAX_TAG_KEY_LENGTH {
    return Err(TagRejection::KeyTooLong {
      actual: len,
      limit: MAX_TAG_KEY_LENGTH,
    });
  }

  if RESERVED_TAG_KEYS.contains(&key) {
    return Err(TagRejection::ReservedKey(key.to_owned()));
  }

  // the aws: prefix is matched case-insensitively by the API
  if key
    .get(..AWS_TAG_KEY_PREFIX.len())
    .map_or(false, |p| p.eq_ignore_ascii_case(AWS_TAG_KEY_PREFIX))
  {
    return Err(TagRejection::ReservedPrefix {
      key: key.to_owned(),
      prefix: AWS_TAG_KEY_PREFIX,
    });
  }
  if key.starts_with(KUBERNETES_TAG_KEY_PREFIX) {
    return Err(TagRejection::ReservedPrefix {
      key: key.to_owned(),
      prefix: KUBERNETES_TAG_KEY_PREFIX,
    });
  }

  check_characters("key", key)
}

pub fn validate(key: &str, value: &str) -> Result<(), TagRejection> {
  validate_key(key)?;

  let len = value.chars().count();
  if len > MAX_TAG_VALUE_LENGTH {
    return Err(TagRejection::ValueTooLong {
      actual: len,
      limit: MAX_TAG_VALUE_LENGTH,
    });
  }

  check_characters("value", value)
}

/// Per-resource tag quota. Not part of [validate]; the cloud API enforces
/// the account-level figure on its own.
pub fn validate_tag_count(count: usize) -> Result<(), TagRejection> {
  if count > MAX_TAGS_PER_RESOURCE {
    Err(TagRejection::TooManyTags {
      actual: count,
      limit: MAX_TAGS_PER_RESOURCE,
    })
  } else {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use test_case::test_case;

  #[test_case("team", "payments" => Ok(()) ; "plain")]
  #[test_case("cost-center/id", "a_b.c:d/e=f+g-h@i j" => Ok(()) ; "all allowed symbols")]
  #[test_case("équipe", "données" => Ok(()) ; "unicode letters")]
  #[test_case("team", "" => Ok(()) ; "empty value")]
  #[test_case("", "v" => Err(TagRejection::EmptyKey) ; "empty key")]
  #[test_case("team", "a*b" => Err(TagRejection::InvalidCharacter { part: "value", found: '*' }) ; "bad value char")]
  #[test_case("te#am", "v" => Err(TagRejection::InvalidCharacter { part: "key", found: '#' }) ; "bad key char")]
  #[test_case("CSIVolumeName", "v" => Err(TagRejection::ReservedKey("CSIVolumeName".to_owned())) ; "volume name")]
  #[test_case("CSIVolumeSnapshotName", "v" => Err(TagRejection::ReservedKey("CSIVolumeSnapshotName".to_owned())) ; "snapshot name")]
  #[test_case("ebs.csi.aws.com/cluster", "true" => Err(TagRejection::ReservedKey("ebs.csi.aws.com/cluster".to_owned())) ; "cluster")]
  #[test_case("AWS:createdBy", "v" => Err(TagRejection::ReservedPrefix { key: "AWS:createdBy".to_owned(), prefix: "aws:" }) ; "aws prefix any case")]
  #[test_case("kubernetes.io/cluster/x", "owned" => Err(TagRejection::ReservedPrefix { key: "kubernetes.io/cluster/x".to_owned(), prefix: "kubernetes.io" }) ; "kubernetes prefix")]
  #[test_case("csivolumename", "v" => Ok(()) ; "reserved keys are case sensitive")]
  #[test_case("team", "a\u{a0}b\u{2003}c" => Ok(()) ; "unicode separators")]
  #[test_case("team", "a\nb" => Err(TagRejection::InvalidCharacter { part: "value", found: '\n' }) ; "newline")]
  #[test_case("team", "a\tb" => Err(TagRejection::InvalidCharacter { part: "value", found: '\t' }) ; "tab")]
  #[test_case("te\ram", "v" => Err(TagRejection::InvalidCharacter { part: "key", found: '\r' }) ; "control in key")]
  fn tags(key: &str, value: &str) -> Result<(), TagRejection> {
    validate(key, value)
  }

  #[test]
  fn lengths_count_characters() {
    let key = "é".repeat(MAX_TAG_KEY_LENGTH);
    assert_eq!(validate_key(&key), Ok(()));
    assert_eq!(
      validate_key(&format!("{}x", key)),
      Err(TagRejection::KeyTooLong {
        actual: MAX_TAG_KEY_LENGTH + 1,
        limit: MAX_TAG_KEY_LENGTH
      })
    );

    let value = "v".repeat(MAX_TAG_VALUE_LENGTH);
    assert_eq!(validate("k", &value), Ok(()));
    assert_eq!(
      validate("k", &format!("{}v", value)),
      Err(TagRejection::ValueTooLong {
        actual: MAX_TAG_VALUE_LENGTH + 1,
        limit: MAX_TAG_VALUE_LENGTH
      })
    );
  }

  #[test]
  fn multibyte_key_shorter_than_prefix() {
    assert_eq!(validate_key("é"), Ok(()));
    assert_eq!(validate_key("aé"), Ok(()));
  }

  #[test_case(0 => Ok(()) ; "none")]
  #[test_case(50 => Ok(()) ; "at limit")]
  #[test_case(51 => Err(TagRejection::TooManyTags { actual: 51, limit: 50 }) ; "over")]
  fn tag_count(count: usize) -> Result<(), TagRejection> {
    validate_tag_count(count)
  }
}
