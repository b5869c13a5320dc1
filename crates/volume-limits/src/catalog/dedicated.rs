//! Dedicated EBS attachment limits.
//!
//! These Nitro families have an EBS volume limit of up to 128 attachments,
//! depending on instance size, which is not shared with other device
//! attachments. The figures already account for the local devices of each
//! size.
//!
//! <https://docs.aws.amazon.com/AWSEC2/latest/UserGuide/volume_limits.html#nitro-system-limits>

use std::collections::HashMap;

pub(crate) const DEDICATED_FAMILIES: &[&str] = &[
  "m7i", "m7i-flex", "m7a", "c7i", "c7i-flex", "c7a", "r7a", "r7i", "r7iz", "r8g", "u7i", "g6",
  "gr6",
];

pub(crate) const COMMON_SIZES: &[&str] = &[
  "medium", "large", "xlarge", "2xlarge", "4xlarge", "8xlarge", "12xlarge",
];

const COMMON_SIZE_LIMIT: u32 = 32;

/// Sizes that carry their own figure.
pub(crate) const SIZED_LIMITS: &[(&str, u32)] = &[
  ("metal-16xl", 39),
  ("metal-24xl", 39),
  ("16xlarge", 48),
  ("24xlarge", 64),
  ("metal-32xl", 79),
  ("metal-48xl", 79),
  ("32xlarge", 88),
  ("48xlarge", 128),
];

/// Expands every family against the common sizes and the enumerated large and
/// bare-metal sizes, keyed by `family.size`.
pub(crate) fn expand<'a>(
  families: impl IntoIterator<Item = &'a str>,
  common_sizes: &[&str],
  sized_limits: &[(&str, u32)],
) -> HashMap<String, u32> {
  let mut limits = HashMap::new();

  for family in families {
    for size in common_sizes {
      limits.insert(format!("{}.{}", family, size), COMMON_SIZE_LIMIT);
    }

    for (size, limit) in sized_limits {
      limits.insert(format!("{}.{}", family, size), *limit);
    }
  }

  limits
}

pub(crate) fn build() -> HashMap<String, u32> {
  expand(
    DEDICATED_FAMILIES.iter().copied(),
    COMMON_SIZES,
    SIZED_LIMITS,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expand_single_family() {
    let limits = expand(
      vec!["x9"],
      &["large", "xlarge"],
      &[("metal-16xl", 39), ("48xlarge", 128)],
    );

    let mut entries = limits.into_iter().collect::<Vec<_>>();
    entries.sort();

    assert_eq!(
      entries,
      vec![
        ("x9.48xlarge".to_owned(), 128),
        ("x9.large".to_owned(), 32),
        ("x9.metal-16xl".to_owned(), 39),
        ("x9.xlarge".to_owned(), 32),
      ]
    );
  }

  #[test]
  fn expand_nothing() {
    assert!(expand(Vec::<&str>::new(), COMMON_SIZES, SIZED_LIMITS).is_empty());
  }

  #[test]
  fn build_covers_full_cross_product() {
    let limits = build();

    assert_eq!(
      limits.len(),
      DEDICATED_FAMILIES.len() * (COMMON_SIZES.len() + SIZED_LIMITS.len())
    );
    assert_eq!(limits.get("m7i.large"), Some(&32));
    assert_eq!(limits.get("m7i-flex.12xlarge"), Some(&32));
    assert_eq!(limits.get("r7iz.metal-32xl"), Some(&79));
    assert_eq!(limits.get("gr6.48xlarge"), Some(&128));
    assert_eq!(limits.get("u7i.24xlarge"), Some(&64));
    assert_eq!(limits.get("m7i.metal"), None);
    assert_eq!(limits.get("m6i.large"), None);
  }
}
