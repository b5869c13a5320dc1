use super::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
  Pipe,
  Field(String),
  Ident(String),
  Str(String),
  Int(i64),
  Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Chunk {
  Text(String),
  Action(Vec<Token>),
}

/// Splits a template into literal text and tokenized `{{ ... }}` actions.
/// `{{- ` and ` -}}` trim the whitespace of the adjacent text.
pub(crate) fn split(src: &str) -> Result<Vec<Chunk>, ParseError> {
  let mut chunks = Vec::new();
  let mut rest = src;
  let mut trim_next = false;

  loop {
    let start = match rest.find("{{") {
      Some(start) => start,
      None => {
        push_text(&mut chunks, rest, trim_next, false);
        return Ok(chunks);
      }
    };

    let open = start + 2;
    let trim_prev = has_left_trim(&rest[open..]);
    push_text(&mut chunks, &rest[..start], trim_next, trim_prev);

    let body_start = if trim_prev { open + 1 } else { open };
    let body = &rest[body_start..];
    let end = find_close(body)?;
    let (action, trim_after) = strip_right_trim(&body[..end]);

    chunks.push(Chunk::Action(lex(action)?));
    rest = &body[end + 2..];
    trim_next = trim_after;
  }
}

/// Bare identifiers of every action, found without validating anything else.
/// Never fails: quoted strings are skipped, and an unclosed action or string
/// runs to the end of the input. Field names (`.Name`) and numbers are not
/// identifiers.
pub(crate) fn scan_idents(src: &str) -> Vec<&str> {
  let mut idents = Vec::new();
  let mut rest = src;

  while let Some(start) = rest.find("{{") {
    let body = &rest[start + 2..];
    let mut end = body.len();
    let mut quote = None;
    let mut word = None;
    let mut skipping = false;
    let mut prev = ' ';
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
      if let Some(q) = quote {
        if q == '"' && c == '\\' {
          chars.next();
        } else if c == q {
          quote = None;
        }
        prev = c;
        continue;
      }

      if c.is_alphanumeric() || c == '_' {
        if word.is_none() && !skipping {
          if prev == '.' || c.is_ascii_digit() {
            skipping = true;
          } else {
            word = Some(i);
          }
        }
      } else {
        if let Some(w) = word.take() {
          idents.push(&body[w..i]);
        }
        skipping = false;

        match c {
          '"' | '`' => quote = Some(c),
          '}' if matches!(chars.peek(), Some((_, '}'))) => {
            end = i;
            break;
          }
          _ => (),
        }
      }

      prev = c;
    }

    if let Some(w) = word {
      idents.push(&body[w..end]);
    }
    rest = body.get(end + 2..).unwrap_or("");
  }

  idents
}

fn push_text(chunks: &mut Vec<Chunk>, text: &str, trim_start: bool, trim_end: bool) {
  let mut text = text;
  if trim_start {
    text = text.trim_start();
  }
  if trim_end {
    text = text.trim_end();
  }
  if !text.is_empty() {
    chunks.push(Chunk::Text(text.to_owned()));
  }
}

fn has_left_trim(after: &str) -> bool {
  let mut chars = after.chars();
  chars.next() == Some('-') && chars.next().map_or(false, char::is_whitespace)
}

fn strip_right_trim(body: &str) -> (&str, bool) {
  match body.strip_suffix('-') {
    Some(stripped) if stripped.ends_with(char::is_whitespace) => (stripped, true),
    _ => (body, false),
  }
}

/// Byte offset of the `}}` closing an action, skipping quoted strings.
fn find_close(body: &str) -> Result<usize, ParseError> {
  let mut chars = body.char_indices().peekable();
  let mut quote = None;

  while let Some((i, c)) = chars.next() {
    match (quote, c) {
      (Some('"'), '\\') => {
        chars.next();
      }
      (Some(q), c) if c == q => quote = None,
      (Some(_), _) => (),
      (None, '"') | (None, '`') => quote = Some(c),
      (None, '}') => {
        if let Some((_, '}')) = chars.peek() {
          return Ok(i);
        }
      }
      (None, _) => (),
    }
  }

  Err(match quote {
    Some(_) => ParseError::UnterminatedString,
    None => ParseError::UnclosedAction,
  })
}

fn lex(body: &str) -> Result<Vec<Token>, ParseError> {
  let mut tokens = Vec::new();
  let mut chars = body.chars().peekable();

  while let Some(&c) = chars.peek() {
    match c {
      c if c.is_whitespace() => {
        chars.next();
      }
      '|' => {
        chars.next();
        tokens.push(Token::Pipe);
      }
      '.' => {
        chars.next();
        let name = take_ident(&mut chars);
        if name.is_empty() {
          return Err(ParseError::InvalidField);
        }
        tokens.push(Token::Field(name));
      }
      '"' => {
        chars.next();
        tokens.push(Token::Str(take_quoted(&mut chars)?));
      }
      '`' => {
        chars.next();
        let mut raw = String::new();
        loop {
          match chars.next() {
            Some('`') => break,
            Some(c) => raw.push(c),
            None => return Err(ParseError::UnterminatedString),
          }
        }
        tokens.push(Token::Str(raw));
      }
      '-' | '0'..='9' => {
        let mut number = String::new();
        number.push(c);
        chars.next();
        while let Some(&d) = chars.peek() {
          if !d.is_ascii_alphanumeric() {
            break;
          }
          number.push(d);
          chars.next();
        }
        let value = number
          .parse::<i64>()
          .map_err(|_| ParseError::InvalidNumber(number))?;
        tokens.push(Token::Int(value));
      }
      c if c.is_alphabetic() || c == '_' => {
        let ident = take_ident(&mut chars);
        tokens.push(match ident.as_str() {
          "true" => Token::Bool(true),
          "false" => Token::Bool(false),
          _ => Token::Ident(ident),
        });
      }
      c => return Err(ParseError::UnexpectedCharacter(c)),
    }
  }

  Ok(tokens)
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
  let mut ident = String::new();
  while let Some(&c) = chars.peek() {
    if !(c.is_alphanumeric() || c == '_') {
      break;
    }
    ident.push(c);
    chars.next();
  }
  ident
}

fn take_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<String, ParseError> {
  let mut value = String::new();
  loop {
    match chars.next() {
      Some('"') => return Ok(value),
      Some('\\') => match chars.next() {
        Some('n') => value.push('\n'),
        Some('t') => value.push('\t'),
        Some('\\') => value.push('\\'),
        Some('"') => value.push('"'),
        Some(c) => return Err(ParseError::InvalidEscape(c)),
        None => return Err(ParseError::UnterminatedString),
      },
      Some(c) => value.push(c),
      None => return Err(ParseError::UnterminatedString),
    }
  }
}
