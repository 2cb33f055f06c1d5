// ABOUTME: Reader module, turning source text into Values using nom combinators

use nom::{
    branch::alt,
    character::complete::{char, digit1, multispace1, one_of},
    combinator::{opt, recognize},
    multi::many0,
    IResult, Parser,
};

use crate::error::EvalError;
use crate::value::{IdentifierData, SourceSpan, Value};
use std::rc::Rc;

const IDENTIFIER_EXTRA: &str = "_?+-*/=<>";

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || IDENTIFIER_EXTRA.contains(c)
}

/// Skip whitespace and `#`-to-end-of-line comments.
fn skip_ws(input: &str) -> IResult<&str, ()> {
    many0(alt((
        nom::combinator::value((), multispace1),
        nom::combinator::value(
            (),
            (char('#'), nom::bytes::complete::take_while(|c| c != '\n')),
        ),
    )))
    .map(|_| ())
    .parse(input)
}

/// `-?\d+(\.\d+)?` — a number containing `.` is Float, otherwise Integer.
/// No leading-dot numbers (`.5`), unlike some Lisp dialects.
fn parse_number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize((
        opt(char('-')),
        digit1,
        opt((char('.'), digit1)),
    ))
    .parse(input)?;

    let value = if text.contains('.') {
        Value::Float(text.parse().expect("validated float literal"))
    } else {
        Value::Integer(text.parse().expect("validated integer literal"))
    };
    Ok((rest, value))
}

/// `"` ... `"`, no embedded `"`, no escape processing.
fn parse_string(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('"')(input)?;
    let (input, content) = nom::bytes::complete::take_while(|c| c != '"')(input)?;
    let (input, _) = char('"')(input)?;
    Ok((input, Value::string(content)))
}

/// One or more `[A-Za-z0-9_?+\-*/=<>]`, non-digit leading (the number
/// rule already claimed digit-leading tokens).
fn parse_identifier(start: usize, input: &str) -> IResult<&str, Value> {
    let original_len = input.len();
    let (rest, first) = one_of("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_?+-*/=<>")(
        input,
    )?;
    let (rest, more) =
        nom::bytes::complete::take_while(is_identifier_char)(rest)?;

    let mut name = String::new();
    name.push(first);
    name.push_str(more);

    let consumed = original_len - rest.len();
    let span = SourceSpan {
        start,
        end: start + consumed,
    };
    Ok((
        rest,
        Value::Identifier(Rc::new(IdentifierData {
            name,
            span: Some(span),
        })),
    ))
}

/// `:` followed by zero or more identifier characters.
fn parse_symbol(input: &str) -> IResult<&str, Value> {
    let (input, _) = char(':')(input)?;
    let (input, name) = nom::bytes::complete::take_while(is_identifier_char)(input)?;
    Ok((input, Value::Symbol(crate::value::intern(name))))
}

/// The sentinel this reader uses in place of `nom::Err::Incomplete`:
/// the `complete` combinators throughout this module never produce
/// `Incomplete`, so running out of input before a list's closing `)`
/// has to be signaled explicitly rather than detected by nom itself.
fn unmatched_open_paren(at: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Failure(nom::error::Error::new(at, nom::error::ErrorKind::Eof))
}

fn is_unmatched_open_paren(err: &nom::Err<nom::error::Error<&str>>) -> bool {
    matches!(err, nom::Err::Failure(e) if e.code == nom::error::ErrorKind::Eof)
}

fn parse_list<'a>(full_input: &str, input: &'a str) -> IResult<&'a str, Value> {
    let (input, _) = char('(')(input)?;
    let (input, _) = skip_ws(input)?;

    let mut items = Vec::new();
    let mut remaining = input;

    loop {
        if remaining.is_empty() {
            return Err(unmatched_open_paren(remaining));
        }
        if let Ok((rest, _)) = char::<_, nom::error::Error<_>>(')')(remaining) {
            return Ok((rest, Value::list(items)));
        }

        let (rest, expr) = parse_expr(full_input, remaining)?;
        items.push(expr);

        let (rest, _) = skip_ws(rest)?;
        remaining = rest;
    }
}

fn parse_atom(input: &str, pos: usize) -> IResult<&str, Value> {
    alt((
        parse_number,
        parse_string,
        parse_symbol,
        |i| parse_identifier(pos, i),
    ))
    .parse(input)
}

fn parse_expr<'a>(full_input: &str, input: &'a str) -> IResult<&'a str, Value> {
    if input.starts_with('(') {
        parse_list(full_input, input)
    } else {
        let pos = full_input.len() - input.len();
        parse_atom(input, pos)
    }
}

/// Parse every top-level expression in `source`, returning them as a
/// Nil-terminated Pair chain (the reader's documented output shape).
pub fn parse(source: &str) -> Result<Value, EvalError> {
    let mut remaining = source;
    let mut items = Vec::new();

    loop {
        let (rest, _) = skip_ws(remaining).map_err(read_error)?;
        remaining = rest;
        if remaining.is_empty() {
            break;
        }
        if remaining.starts_with(')') {
            return Err(EvalError::ReadError("Unmatched parenthese )".to_string()));
        }
        let pos = source.len() - remaining.len();
        match parse_expr(source, remaining) {
            Ok((rest, expr)) => {
                items.push(expr);
                remaining = rest;
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(EvalError::ReadError("Unmatched parenthese (".to_string()));
            }
            Err(ref e) if is_unmatched_open_paren(e) => {
                return Err(EvalError::ReadError("Unmatched parenthese (".to_string()));
            }
            Err(_) => {
                return Err(EvalError::ReadError(format!(
                    "unknown token at position {}",
                    pos
                )));
            }
        }
    }

    Ok(Value::list(items))
}

fn read_error(_: nom::Err<nom::error::Error<&str>>) -> EvalError {
    EvalError::ReadError("Unmatched parenthese (".to_string())
}

/// Parse exactly one top-level expression (used by the `read` builtin);
/// zero or more than one is an `ArgumentError`, per spec's stated
/// preference for the safest choice here.
pub fn parse_one(source: &str) -> Result<Value, EvalError> {
    let program = parse(source)?;
    let mut iter = program.iter_list();
    let first = iter
        .next()
        .ok_or_else(|| EvalError::ArgumentError("read expected exactly one expression, received none".to_string()))?
        .clone();
    if iter.next().is_some() {
        return Err(EvalError::ArgumentError(
            "read expected exactly one expression, received more than one".to_string(),
        ));
    }
    Ok(first)
}
