//! Markup fragment parser.
//!
//! Tokens are recognized with nom combinators; nesting is tracked with an
//! explicit element stack. A `<` that does not start a tag is plain text.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_till1, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use photon_core::MarkupError;

/// A parsed markup node.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Element {
        tag: String,
        /// Decoded attribute values in source order.
        attributes: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
    Text(String),
    Comment(String),
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that never have children or a closing tag.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug)]
enum Token<'a> {
    Text(&'a str),
    Comment(&'a str),
    Open {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    Close(String),
}

/// An element whose closing tag has not been seen yet.
struct OpenElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Fragment>,
    offset: usize,
}

/// Parse a markup fragment.
pub fn parse_fragment(source: &str) -> Result<Vec<Fragment>, MarkupError> {
    let mut roots: Vec<Fragment> = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut input = source;

    while !input.is_empty() {
        let offset = source.len() - input.len();
        let (rest, token) = token(input).map_err(|_| MarkupError::UnexpectedToken {
            found: input.chars().take(16).collect(),
            expected: "markup".to_string(),
            offset,
        })?;
        input = rest;

        match token {
            Token::Text(text) => push_child(&mut roots, &mut stack, Fragment::Text(text.to_string())),
            Token::Comment(text) => {
                push_child(&mut roots, &mut stack, Fragment::Comment(text.to_string()))
            }
            Token::Open {
                name,
                attributes,
                self_closing,
            } => {
                if self_closing || is_void_element(&name) {
                    let element = Fragment::Element {
                        tag: name,
                        attributes,
                        children: Vec::new(),
                    };
                    push_child(&mut roots, &mut stack, element);
                } else if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    let (rest, body) = raw_text(input, &name).ok_or_else(|| {
                        MarkupError::UnclosedElement {
                            name: name.clone(),
                            offset,
                        }
                    })?;
                    input = rest;
                    let children = if body.is_empty() {
                        Vec::new()
                    } else {
                        vec![Fragment::Text(body.to_string())]
                    };
                    let element = Fragment::Element {
                        tag: name,
                        attributes,
                        children,
                    };
                    push_child(&mut roots, &mut stack, element);
                } else {
                    stack.push(OpenElement {
                        tag: name,
                        attributes,
                        children: Vec::new(),
                        offset,
                    });
                }
            }
            Token::Close(name) => {
                if is_void_element(&name) {
                    continue;
                }
                match stack.pop() {
                    Some(open) if open.tag == name => {
                        let element = Fragment::Element {
                            tag: open.tag,
                            attributes: open.attributes,
                            children: open.children,
                        };
                        push_child(&mut roots, &mut stack, element);
                    }
                    Some(open) => {
                        return Err(MarkupError::MismatchedClose {
                            expected: open.tag,
                            found: name,
                            offset,
                        })
                    }
                    None => {
                        return Err(MarkupError::UnexpectedToken {
                            found: format!("</{name}>"),
                            expected: "text or opening tag".to_string(),
                            offset,
                        })
                    }
                }
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(MarkupError::UnclosedElement {
            name: open.tag,
            offset: open.offset,
        });
    }

    Ok(roots)
}

fn push_child(roots: &mut Vec<Fragment>, stack: &mut [OpenElement], fragment: Fragment) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(fragment),
        None => roots.push(fragment),
    }
}

/// Body of a raw text element up to its closing tag, and the input after it.
fn raw_text<'a>(input: &'a str, name: &str) -> Option<(&'a str, &'a str)> {
    let close = format!("</{name}");
    let end = input.find(&close)?;
    let after = &input[end + close.len()..];
    let gt = after.find('>')?;
    Some((&after[gt + 1..], &input[..end]))
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        map(comment, Token::Comment),
        map(close_tag, Token::Close),
        open_tag,
        map(text, Token::Text),
        // A stray `<` is text.
        map(tag("<"), Token::Text),
    ))(input)
}

fn text(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == '<')(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->"))(input)
}

fn tag_name(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
        |s: &str| s.to_ascii_lowercase(),
    )(input)
}

fn close_tag(input: &str) -> IResult<&str, String> {
    delimited(tag("</"), tag_name, preceded(multispace0, char('>')))(input)
}

fn open_tag(input: &str) -> IResult<&str, Token<'_>> {
    let (input, (_, name, attributes, _, closing)) = tuple((
        char('<'),
        tag_name,
        many0(preceded(multispace1, attribute)),
        multispace0,
        alt((tag("/>"), tag(">"))),
    ))(input)?;

    Ok((
        input,
        Token::Open {
            name,
            attributes,
            self_closing: closing == "/>",
        },
    ))
}

fn attribute(input: &str) -> IResult<&str, (String, String)> {
    map(
        pair(
            attribute_name,
            opt(preceded(
                delimited(multispace0, char('='), multispace0),
                attribute_value,
            )),
        ),
        |(name, value)| {
            (
                name.to_ascii_lowercase(),
                value.map(decode_entities).unwrap_or_default(),
            )
        },
    )(input)
}

fn attribute_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\''))(input)
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\''), char('\'')),
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, '>' | '"' | '\'')),
    ))(input)
}

/// Decode the entities that matter inside attribute values.
pub(crate) fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Escape an attribute value for double-quoted output.
pub(crate) fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
