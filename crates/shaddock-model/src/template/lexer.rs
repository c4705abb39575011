//! Tokenization of service templates using `nom`.
//!
//! A template is literal text interleaved with `{{ name }}` placeholders.
//! Whitespace inside the braces is ignored.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::multispace0,
    combinator::recognize,
    sequence::{delimited, pair},
};

use super::TemplateError;

const OPEN: &str = "{{";

/// A piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied to the output unchanged.
    Text(&'a str),
    /// A placeholder naming a variable.
    Variable(&'a str),
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_ident_start), take_while(is_ident_continue))).parse(input)
}

/// Parses one `{{ name }}` placeholder.
fn placeholder(input: &str) -> IResult<&str, Segment<'_>> {
    let (input, name) = delimited(
        pair(tag(OPEN), multispace0),
        identifier,
        pair(multispace0, tag("}}")),
    )
    .parse(input)?;
    Ok((input, Segment::Variable(name)))
}

/// Parses literal text up to the next placeholder opener.
fn text(input: &str) -> IResult<&str, &str> {
    take_until(OPEN)(input)
}

/// Splits a template into text and placeholder segments.
///
/// # Errors
///
/// Returns [`TemplateError::Syntax`] if a `{{` does not open a well-formed
/// placeholder.
pub fn tokenize(input: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() {
        if remaining.starts_with(OPEN) {
            let (rest, segment) = placeholder(remaining).map_err(|_| TemplateError::Syntax {
                offset: input.len() - remaining.len(),
                snippet: remaining.chars().take(20).collect(),
            })?;
            segments.push(segment);
            remaining = rest;
            continue;
        }

        match text(remaining) {
            Ok((rest, literal)) => {
                segments.push(Segment::Text(literal));
                remaining = rest;
            }
            Err(_) => {
                segments.push(Segment::Text(remaining));
                remaining = "";
            }
        }
    }

    Ok(segments)
}
