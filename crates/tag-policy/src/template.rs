//! Runtime interpolation of tag values.
//!
//! Templates use the familiar `{{ .Field | function "arg" }}` pipeline syntax,
//! where the value of each command is appended as the last argument of the
//! next one. Only a small, fixed set of string functions is exposed; see
//! [DISALLOWED_FUNCTIONS] for built-ins that are rejected outright.

mod funcs;
mod lexer;

pub use funcs::DISALLOWED_FUNCTIONS;

use crate::context::InterpolationContext;
use funcs::{Args, Function, Value};
use lexer::{Chunk, Token};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("unclosed action")]
  UnclosedAction,
  #[error("unterminated quoted string")]
  UnterminatedString,
  #[error("invalid escape sequence \\{0}")]
  InvalidEscape(char),
  #[error("unexpected character {0:?} in action")]
  UnexpectedCharacter(char),
  #[error("missing field name after '.'")]
  InvalidField,
  #[error("invalid number {0:?}")]
  InvalidNumber(String),
  #[error("missing value for command")]
  EmptyCommand,
  #[error("function {0:?} not defined")]
  UndefinedFunction(String),
  #[error("can't give argument to non-function {0}")]
  ArgumentToNonFunction(String),
  #[error("non-function {0} in pipeline position")]
  NonFunctionInPipeline(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
  #[error("missing context field .{0}")]
  MissingContext(String),
  #[error("{function}: {message}")]
  ArgumentOutOfRange {
    function: &'static str,
    message: String,
  },
  #[error("{function}: wrong number of arguments (expected: {expected}, found: {found})")]
  WrongArgumentCount {
    function: &'static str,
    expected: usize,
    found: usize,
  },
  #[error("{function}: argument {position} must be {expected}, not {found}")]
  TypeMismatch {
    function: &'static str,
    position: usize,
    expected: &'static str,
    found: &'static str,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  /// The template references a built-in that is never available.
  #[error("function {0:?} is disabled")]
  Disallowed(String),
  #[error("template parse error: {0}")]
  Parse(#[from] ParseError),
  #[error("template evaluation error: {0}")]
  Eval(#[from] EvalError),
}

impl TemplateError {
  #[inline]
  pub fn is_disallowed(&self) -> bool {
    matches!(self, TemplateError::Disallowed(_))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
  Field(String),
  Literal(Value),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
  Call(Function, Vec<Operand>),
  Operand(Operand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
  Text(String),
  Pipeline(Vec<Command>),
}

/// A compiled tag value template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  nodes: Vec<Node>,
}

impl Template {
  /// Compiles a template. Disabled built-ins are detected first, before the
  /// template is even required to be well formed.
  pub fn compile(src: &str) -> Result<Self, TemplateError> {
    let disallowed = lexer::scan_idents(src)
      .into_iter()
      .find(|name| DISALLOWED_FUNCTIONS.contains(name));
    if let Some(name) = disallowed {
      return Err(TemplateError::Disallowed(name.to_owned()));
    }

    let chunks = lexer::split(src)?;

    let nodes = chunks
      .into_iter()
      .map(|chunk| match chunk {
        Chunk::Text(text) => Ok(Node::Text(text)),
        Chunk::Action(tokens) => parse_pipeline(tokens).map(Node::Pipeline),
      })
      .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(Template { nodes })
  }

  pub fn render(&self, ctx: &InterpolationContext) -> Result<String, TemplateError> {
    let mut out = String::new();

    for node in &self.nodes {
      match node {
        Node::Text(text) => out.push_str(text),
        Node::Pipeline(commands) => out.push_str(&eval_pipeline(commands, ctx)?.to_string()),
      }
    }

    Ok(out)
  }
}

/// Compiles and renders `src` against `ctx`.
pub fn interpolate(src: &str, ctx: &InterpolationContext) -> Result<String, TemplateError> {
  Template::compile(src)?.render(ctx)
}

fn parse_pipeline(tokens: Vec<Token>) -> Result<Vec<Command>, ParseError> {
  let mut commands = Vec::new();

  for segment in tokens.split(|t| *t == Token::Pipe) {
    let command = parse_command(segment)?;
    if !commands.is_empty() {
      if let Command::Operand(operand) = &command {
        return Err(ParseError::NonFunctionInPipeline(describe(operand)));
      }
    }
    commands.push(command);
  }

  Ok(commands)
}

fn parse_command(tokens: &[Token]) -> Result<Command, ParseError> {
  let (head, rest) = tokens.split_first().ok_or(ParseError::EmptyCommand)?;

  match head {
    Token::Ident(name) => {
      let function =
        Function::from_name(name).ok_or_else(|| ParseError::UndefinedFunction(name.clone()))?;
      let args = rest.iter().map(parse_operand).collect::<Result<_, _>>()?;
      Ok(Command::Call(function, args))
    }
    token => {
      let operand = parse_operand(token)?;
      if !rest.is_empty() {
        return Err(ParseError::ArgumentToNonFunction(describe(&operand)));
      }
      Ok(Command::Operand(operand))
    }
  }
}

fn parse_operand(token: &Token) -> Result<Operand, ParseError> {
  Ok(match token {
    Token::Field(name) => Operand::Field(name.clone()),
    Token::Str(v) => Operand::Literal(Value::Str(v.clone())),
    Token::Int(v) => Operand::Literal(Value::Int(*v)),
    Token::Bool(v) => Operand::Literal(Value::Bool(*v)),
    // nested calls need parentheses, which are not supported
    Token::Ident(name) => return Err(ParseError::UndefinedFunction(name.clone())),
    Token::Pipe => return Err(ParseError::EmptyCommand),
  })
}

fn describe(operand: &Operand) -> String {
  match operand {
    Operand::Field(name) => format!(".{}", name),
    Operand::Literal(Value::Str(v)) => format!("{:?}", v),
    Operand::Literal(v) => v.to_string(),
  }
}

fn eval_operand(operand: &Operand, ctx: &InterpolationContext) -> Result<Value, EvalError> {
  match operand {
    Operand::Field(name) => ctx
      .field(name)
      .map(|v| Value::Str(v.to_owned()))
      .ok_or_else(|| EvalError::MissingContext(name.clone())),
    Operand::Literal(v) => Ok(v.clone()),
  }
}

fn eval_pipeline(commands: &[Command], ctx: &InterpolationContext) -> Result<Value, EvalError> {
  let mut piped: Option<Value> = None;

  for command in commands {
    piped = Some(match command {
      Command::Operand(operand) => eval_operand(operand, ctx)?,
      Command::Call(function, operands) => {
        let mut args = operands
          .iter()
          .map(|o| eval_operand(o, ctx))
          .collect::<Result<Args, _>>()?;
        args.extend(piped.take());
        function.apply(args)?
      }
    });
  }

  piped.ok_or(EvalError::WrongArgumentCount {
    function: "pipeline",
    expected: 1,
    found: 0,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use test_case::test_case;

  fn ctx() -> InterpolationContext {
    InterpolationContext::volume()
      .with_namespace("payments-prod")
      .with_name("data-ledger-east-0")
      .with_parent_name("pvc-1234")
  }

  #[test_case("static" => Ok("static".to_owned()) ; "no actions")]
  #[test_case("" => Ok(String::new()) ; "empty")]
  #[test_case("{{ .PVCNamespace }}" => Ok("payments-prod".to_owned()) ; "field")]
  #[test_case("ns={{ .PVCNamespace }},pv={{ .PVName }}" => Ok("ns=payments-prod,pv=pvc-1234".to_owned()) ; "mixed")]
  #[test_case("{{ .PVCNamespace | contains \"prod\" }}" => Ok("true".to_owned()) ; "contains true")]
  #[test_case("{{ .PVCNamespace | contains \"dev\" }}" => Ok("false".to_owned()) ; "contains false")]
  #[test_case("{{ .PVCName | field \"-\" 2 | toUpper }}" => Ok("EAST".to_owned()) ; "field then upper")]
  #[test_case("{{ .PVCName | substring 0 4 }}" => Ok("data".to_owned()) ; "substring")]
  #[test_case("{{ \"MiXeD\" | toLower }}" => Ok("mixed".to_owned()) ; "literal head")]
  #[test_case("{{ toUpper .PVCNamespace }}" => Ok("PAYMENTS-PROD".to_owned()) ; "direct call")]
  #[test_case("{{ 42 }}" => Ok("42".to_owned()) ; "integer")]
  #[test_case("a {{- \" b \" -}} c" => Ok("a b c".to_owned()) ; "trim")]
  fn renders(src: &str) -> Result<String, TemplateError> {
    interpolate(src, &ctx())
  }

  #[test_case("{{ .PVCName | js }}" ; "js")]
  #[test_case("{{ html .PVCName }}" ; "html")]
  #[test_case("{{ .PVCName | urlquery }}" ; "urlquery")]
  #[test_case("{{ call .PVCName }}" ; "call")]
  #[test_case("{{ .Missing }}{{ js }}" ; "after other failures")]
  #[test_case("{{ toUpper js }}" ; "as argument")]
  #[test_case("{{ .PVCName | js }}{{ $x }}" ; "before lex error")]
  #[test_case("{{ call .PVCName }}{{" ; "before unclosed action")]
  #[test_case("{{ html \"\\q\" }}" ; "before bad escape")]
  #[test_case("{{ html $ }}" ; "same action as lex error")]
  fn disallowed(src: &str) {
    let err = Template::compile(src).unwrap_err();
    assert!(err.is_disallowed(), "{:?}", err);
  }

  #[test_case("{{ .PVCName | printf \"%s\" }}" => TemplateError::Parse(ParseError::UndefinedFunction("printf".to_owned())) ; "unknown function")]
  #[test_case("{{ }}" => TemplateError::Parse(ParseError::EmptyCommand) ; "empty action")]
  #[test_case("{{ .PVCName | }}" => TemplateError::Parse(ParseError::EmptyCommand) ; "dangling pipe")]
  #[test_case("{{ .PVCName .PVName }}" => TemplateError::Parse(ParseError::ArgumentToNonFunction(".PVCName".to_owned())) ; "argument to field")]
  #[test_case("{{ .PVCName | .PVName }}" => TemplateError::Parse(ParseError::NonFunctionInPipeline(".PVName".to_owned())) ; "field in pipeline")]
  #[test_case("{{ .VolumeSnapshotName }}" => TemplateError::Eval(EvalError::MissingContext("VolumeSnapshotName".to_owned())) ; "missing context")]
  #[test_case("{{ .PVCName | field \"-\" 9 }}" => TemplateError::Eval(EvalError::ArgumentOutOfRange { function: "field", message: "index 9 out of range for \"data-ledger-east-0\"".to_owned() }) ; "field out of range")]
  #[test_case("{{ .PVCNamespace | contains \"prod\" | toUpper }}" => TemplateError::Eval(EvalError::TypeMismatch { function: "toUpper", position: 1, expected: "string", found: "bool" }) ; "bool into string function")]
  fn failures(src: &str) -> TemplateError {
    interpolate(src, &ctx()).unwrap_err()
  }

  #[test]
  fn compiled_template_is_reusable() {
    let template = Template::compile("{{ .PVCName | field \"-\" 1 }}").unwrap();
    let other = InterpolationContext::volume().with_name("logs-archive");

    assert_eq!(template.render(&ctx()).unwrap(), "ledger");
    assert_eq!(template.render(&other).unwrap(), "archive");
    assert_eq!(template.render(&ctx()).unwrap(), "ledger");
  }
}
