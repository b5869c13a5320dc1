use super::EvalError;
use smallvec::SmallVec;
use std::{convert::TryFrom, fmt};

/// Built-ins that are never available to tag templates. They allow escaping
/// into other languages or dispatching arbitrary functions.
pub const DISALLOWED_FUNCTIONS: &[&str] = &["js", "html", "urlquery", "call"];

pub(crate) type Args = SmallVec<[Value; 4]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
  Str(String),
  Int(i64),
  Bool(bool),
}

impl Value {
  fn type_name(&self) -> &'static str {
    match self {
      Value::Str(_) => "string",
      Value::Int(_) => "int",
      Value::Bool(_) => "bool",
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Str(v) => f.write_str(v),
      Value::Int(v) => write!(f, "{}", v),
      Value::Bool(v) => write!(f, "{}", v),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Function {
  Field,
  Substring,
  ToUpper,
  ToLower,
  Contains,
}

impl Function {
  pub(crate) fn from_name(name: &str) -> Option<Self> {
    Some(match name {
      "field" => Function::Field,
      "substring" => Function::Substring,
      "toUpper" => Function::ToUpper,
      "toLower" => Function::ToLower,
      "contains" => Function::Contains,
      _ => return None,
    })
  }

  pub(crate) fn name(self) -> &'static str {
    match self {
      Function::Field => "field",
      Function::Substring => "substring",
      Function::ToUpper => "toUpper",
      Function::ToLower => "toLower",
      Function::Contains => "contains",
    }
  }

  fn arity(self) -> usize {
    match self {
      Function::Field | Function::Substring => 3,
      Function::ToUpper | Function::ToLower => 1,
      Function::Contains => 2,
    }
  }

  pub(crate) fn apply(self, args: Args) -> Result<Value, EvalError> {
    if args.len() != self.arity() {
      return Err(EvalError::WrongArgumentCount {
        function: self.name(),
        expected: self.arity(),
        found: args.len(),
      });
    }

    let mut args = ArgReader {
      function: self,
      args: args.into_iter(),
      position: 0,
    };

    Ok(match self {
      Function::Field => {
        let delimiter = args.string()?;
        let index = args.int()?;
        let input = args.string()?;
        Value::Str(field(&delimiter, index, &input)?)
      }
      Function::Substring => {
        let start = args.int()?;
        let end = args.int()?;
        let input = args.string()?;
        Value::Str(substring(start, end, &input))
      }
      Function::ToUpper => Value::Str(args.string()?.to_uppercase()),
      Function::ToLower => Value::Str(args.string()?.to_lowercase()),
      Function::Contains => {
        let needle = args.string()?;
        let haystack = args.string()?;
        Value::Bool(haystack.contains(needle.as_str()))
      }
    })
  }
}

struct ArgReader {
  function: Function,
  args: smallvec::IntoIter<[Value; 4]>,
  position: usize,
}

impl ArgReader {
  fn take(&mut self) -> Result<Value, EvalError> {
    let function = self.function;
    let found = self.position;
    self.position += 1;

    self.args.next().ok_or(EvalError::WrongArgumentCount {
      function: function.name(),
      expected: function.arity(),
      found,
    })
  }

  fn mismatch(&self, expected: &'static str, found: &Value) -> EvalError {
    EvalError::TypeMismatch {
      function: self.function.name(),
      position: self.position,
      expected,
      found: found.type_name(),
    }
  }

  fn string(&mut self) -> Result<String, EvalError> {
    match self.take()? {
      Value::Str(v) => Ok(v),
      other => Err(self.mismatch("string", &other)),
    }
  }

  fn int(&mut self) -> Result<i64, EvalError> {
    match self.take()? {
      Value::Int(v) => Ok(v),
      other => Err(self.mismatch("int", &other)),
    }
  }
}

/// Splits `input` on `delimiter` and returns the 0-indexed segment.
fn field(delimiter: &str, index: i64, input: &str) -> Result<String, EvalError> {
  let out_of_range = || EvalError::ArgumentOutOfRange {
    function: Function::Field.name(),
    message: format!("index {} out of range for {:?}", index, input),
  };

  let index = usize::try_from(index).map_err(|_| out_of_range())?;
  let segment = if delimiter.is_empty() {
    // an empty delimiter splits into characters
    input.chars().nth(index).map(String::from)
  } else {
    input.split(delimiter).nth(index).map(str::to_owned)
  };

  segment.ok_or_else(out_of_range)
}

/// Character range `start..end`, clamped to the bounds of `input`.
fn substring(start: i64, end: i64, input: &str) -> String {
  let len = input.chars().count();
  let clamp = |v: i64| usize::try_from(v.max(0)).unwrap_or(usize::MAX).min(len);
  let (start, end) = (clamp(start), clamp(end));

  if start >= end {
    return String::new();
  }

  input.chars().skip(start).take(end - start).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use smallvec::smallvec;
  use test_case::test_case;

  fn s(v: &str) -> Value {
    Value::Str(v.to_owned())
  }

  #[test_case("-", 0, "team-prod-east" => Ok("team".to_owned()) ; "first")]
  #[test_case("-", 2, "team-prod-east" => Ok("east".to_owned()) ; "last")]
  #[test_case("/", 0, "no-delimiter" => Ok("no-delimiter".to_owned()) ; "no delimiter")]
  #[test_case("-", 3, "team-prod-east" => Err(()) ; "past end")]
  #[test_case("", 0, "abc" => Ok("a".to_owned()) ; "empty delimiter first")]
  #[test_case("", 2, "añb" => Ok("b".to_owned()) ; "empty delimiter multibyte")]
  #[test_case("", 3, "abc" => Err(()) ; "empty delimiter past end")]
  #[test_case("", 0, "" => Err(()) ; "empty delimiter empty input")]
  #[test_case("-", -1, "team-prod-east" => Err(()) ; "negative")]
  fn field_segments(delimiter: &str, index: i64, input: &str) -> Result<String, ()> {
    field(delimiter, index, input).map_err(|_| ())
  }

  #[test_case(0, 4, "namespace" => "name" ; "prefix")]
  #[test_case(4, 100, "namespace" => "space" ; "end clamped")]
  #[test_case(-5, 2, "namespace" => "na" ; "start clamped")]
  #[test_case(6, 2, "namespace" => "" ; "inverted")]
  #[test_case(20, 30, "namespace" => "" ; "past end")]
  #[test_case(1, 3, "ñandú" => "an" ; "multibyte")]
  fn substrings(start: i64, end: i64, input: &str) -> String {
    substring(start, end, input)
  }

  #[test]
  fn contains_renders_bool() {
    let v = Function::Contains.apply(smallvec![s("prod"), s("team-prod")]).unwrap();
    assert_eq!(v, Value::Bool(true));
    assert_eq!(v.to_string(), "true");

    let v = Function::Contains.apply(smallvec![s("prod"), s("team-dev")]).unwrap();
    assert_eq!(v.to_string(), "false");
  }

  #[test]
  fn case_conversion() {
    assert_eq!(
      Function::ToUpper.apply(smallvec![s("East")]).unwrap(),
      s("EAST")
    );
    assert_eq!(
      Function::ToLower.apply(smallvec![s("East")]).unwrap(),
      s("east")
    );
  }

  #[test]
  fn wrong_argument_count() {
    assert_eq!(
      Function::ToUpper.apply(smallvec![s("a"), s("b")]),
      Err(EvalError::WrongArgumentCount {
        function: "toUpper",
        expected: 1,
        found: 2,
      })
    );
  }

  #[test]
  fn type_mismatch() {
    assert_eq!(
      Function::Field.apply(smallvec![s("-"), s("1"), s("a-b")]),
      Err(EvalError::TypeMismatch {
        function: "field",
        position: 2,
        expected: "int",
        found: "string",
      })
    );
  }

  #[test]
  fn disallowed_are_not_functions() {
    for name in DISALLOWED_FUNCTIONS {
      assert_eq!(Function::from_name(name), None);
    }
  }
}
