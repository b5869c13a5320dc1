use std::{collections::HashMap, fmt, hash::BuildHasher};
use thiserror::Error;

/// Parameter key prefix for tags to add or overwrite: `tagSpecification_<n>`
/// with value `key=template`.
pub const TAG_SPECIFICATION_PREFIX: &str = "tagSpecification_";

/// Parameter key prefix for tags to remove: `tagDeletion_<n>` with the tag key
/// as value.
pub const TAG_DELETION_PREFIX: &str = "tagDeletion_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectiveKind {
  Add,
  Delete,
}

/// A single add/overwrite or delete instruction for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagDirective {
  kind: DirectiveKind,
  key: String,
  template: String,
}

impl TagDirective {
  pub fn add(key: impl Into<String>, template: impl Into<String>) -> Self {
    TagDirective {
      kind: DirectiveKind::Add,
      key: key.into(),
      template: template.into(),
    }
  }

  pub fn delete(key: impl Into<String>) -> Self {
    TagDirective {
      kind: DirectiveKind::Delete,
      key: key.into(),
      template: String::new(),
    }
  }

  #[inline]
  pub fn kind(&self) -> DirectiveKind {
    self.kind
  }

  #[inline]
  pub fn key(&self) -> &str {
    &self.key
  }

  /// Raw value template. Always empty for deletions.
  #[inline]
  pub fn template(&self) -> &str {
    &self.template
  }
}

impl fmt::Display for TagDirective {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind {
      DirectiveKind::Add => write!(f, "add {:?}={:?}", self.key, self.template),
      DirectiveKind::Delete => write!(f, "delete {:?}", self.key),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
  #[error("Malformed tag directive {parameter}={value:?}: expected key=value")]
  Malformed { parameter: String, value: String },
}

/// Parses an ordered sequence of configuration pairs, keeping their order.
/// Pairs that are not tag directives are ignored.
pub fn parse<I, K, V>(raw: I) -> Result<Vec<TagDirective>, DirectiveError>
where
  I: IntoIterator<Item = (K, V)>,
  K: AsRef<str>,
  V: AsRef<str>,
{
  raw
    .into_iter()
    .filter_map(|(k, v)| parse_one(k.as_ref(), v.as_ref()).transpose())
    .collect()
}

fn parse_one(parameter: &str, value: &str) -> Result<Option<TagDirective>, DirectiveError> {
  if parameter.starts_with(TAG_SPECIFICATION_PREFIX) {
    let mut parts = value.splitn(2, '=');
    match (parts.next(), parts.next()) {
      (Some(key), Some(template)) => Ok(Some(TagDirective::add(key, template))),
      _ => Err(DirectiveError::Malformed {
        parameter: parameter.to_owned(),
        value: value.to_owned(),
      }),
    }
  } else if parameter.starts_with(TAG_DELETION_PREFIX) {
    Ok(Some(TagDirective::delete(value)))
  } else {
    Ok(None)
  }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Suffix<'a> {
  Numeric(u64),
  Lexical(&'a str),
}

fn sort_key(parameter: &str) -> Option<(Suffix<'_>, DirectiveKind)> {
  let (suffix, kind) = if let Some(s) = parameter.strip_prefix(TAG_SPECIFICATION_PREFIX) {
    (s, DirectiveKind::Add)
  } else if let Some(s) = parameter.strip_prefix(TAG_DELETION_PREFIX) {
    (s, DirectiveKind::Delete)
  } else {
    return None;
  };

  let suffix = suffix
    .parse::<u64>()
    .map(Suffix::Numeric)
    .unwrap_or(Suffix::Lexical(suffix));

  Some((suffix, kind))
}

/// Parses the directives out of an unordered parameter map. The numeric
/// suffix decides the order; on a tie additions come before deletions, and
/// non-numeric suffixes follow all numeric ones.
pub fn parse_parameters<S>(
  parameters: &HashMap<String, String, S>,
) -> Result<Vec<TagDirective>, DirectiveError>
where
  S: BuildHasher,
{
  let mut entries = parameters
    .iter()
    .filter_map(|(k, v)| sort_key(k).map(|key| (key, k, v)))
    .collect::<Vec<_>>();

  entries.sort_by(|(a, ak, _), (b, bk, _)| a.cmp(b).then_with(|| ak.cmp(bk)));

  parse(entries.into_iter().map(|(_, k, v)| (k, v)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use test_case::test_case;

  #[test]
  fn preserves_order() {
    let directives = parse(vec![
      ("tagSpecification_1", "team=payments"),
      ("tagDeletion_1", "team"),
      ("tagSpecification_2", "owner={{ .PVCNamespace }}"),
    ])
    .unwrap();

    assert_eq!(
      directives,
      vec![
        TagDirective::add("team", "payments"),
        TagDirective::delete("team"),
        TagDirective::add("owner", "{{ .PVCNamespace }}"),
      ]
    );
  }

  #[test_case("tagSpecification_1", "key=value" => Ok(Some(TagDirective::add("key", "value"))) ; "add")]
  #[test_case("tagSpecification_1", "key=" => Ok(Some(TagDirective::add("key", ""))) ; "empty value")]
  #[test_case("tagSpecification_1", "key=a=b" => Ok(Some(TagDirective::add("key", "a=b"))) ; "split on first equals")]
  #[test_case("tagSpecification_1", "=value" => Ok(Some(TagDirective::add("", "value"))) ; "empty key left to validation")]
  #[test_case("tagDeletion_3", "key" => Ok(Some(TagDirective::delete("key"))) ; "delete")]
  #[test_case("tagDeletion_3", "key=value" => Ok(Some(TagDirective::delete("key=value"))) ; "delete is literal")]
  #[test_case("type", "gp3" => Ok(None) ; "unrelated")]
  #[test_case("tagspecification_1", "key=value" => Ok(None) ; "prefix is case sensitive")]
  #[test_case("tagSpecification_1", "novalue" => Err(DirectiveError::Malformed { parameter: "tagSpecification_1".to_owned(), value: "novalue".to_owned() }) ; "missing equals")]
  fn parse_single(parameter: &str, value: &str) -> Result<Option<TagDirective>, DirectiveError> {
    parse_one(parameter, value)
  }

  #[test]
  fn malformed_fails_whole_parse() {
    assert!(parse(vec![
      ("tagSpecification_1", "good=value"),
      ("tagSpecification_2", "bad"),
    ])
    .is_err());
  }

  #[test]
  fn parameters_sorted_by_suffix() {
    let parameters = vec![
      ("tagSpecification_10", "ten=10"),
      ("tagSpecification_2", "two=2"),
      ("tagDeletion_2", "old"),
      ("tagSpecification_extra", "extra=x"),
      ("tagDeletion_1", "older"),
      ("csi.storage.k8s.io/pvc/name", "data"),
      ("tagSpecification_1", "one=1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect::<HashMap<_, _>>();

    assert_eq!(
      parse_parameters(&parameters).unwrap(),
      vec![
        TagDirective::add("one", "1"),
        TagDirective::delete("older"),
        TagDirective::add("two", "2"),
        TagDirective::delete("old"),
        TagDirective::add("ten", "10"),
        TagDirective::add("extra", "x"),
      ]
    );
  }

  #[test]
  fn display() {
    assert_eq!(
      TagDirective::add("team", "{{ .PVCName }}").to_string(),
      "add \"team\"=\"{{ .PVCName }}\""
    );
    assert_eq!(TagDirective::delete("team").to_string(), "delete \"team\"");
  }
}
