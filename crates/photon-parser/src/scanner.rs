//! Two-token template scanner.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    combinator::rest,
    sequence::terminated,
    IResult,
};

/// Placeholder opening token.
pub const OPEN: &str = "${{";
/// Placeholder closing token.
pub const CLOSE: &str = "}}";

/// Byte range in the scanned source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A contiguous piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal markup.
    Text(&'a str),
    /// A complete `${{identifier}}`.
    Placeholder { identifier: &'a str, span: Span },
    /// An opener with no closer, up to the next opener or end of input.
    /// `text` includes the opener itself.
    Unterminated { text: &'a str, span: Span },
}

/// Result of scanning a template. Segments cover the source without gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    /// The scanned source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Placeholder identifiers with their spans, left to right.
    pub fn placeholders(&self) -> impl Iterator<Item = (&'a str, Span)> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder { identifier, span } => Some((*identifier, *span)),
            _ => None,
        })
    }

    /// Placeholder identifiers, left to right, duplicates included.
    pub fn identifiers(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.placeholders().map(|(identifier, _)| identifier)
    }

    /// Spans of unterminated openers.
    pub fn unterminated(&self) -> impl Iterator<Item = Span> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Unterminated { span, .. } => Some(*span),
            _ => None,
        })
    }

    /// True when every opener has a closer.
    pub fn is_well_formed(&self) -> bool {
        self.unterminated().next().is_none()
    }

    /// Replace every placeholder with `substitute(identifier)`.
    /// Text and unterminated fragments are copied unchanged.
    pub fn render<F>(&self, mut substitute: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) | Segment::Unterminated { text, .. } => out.push_str(text),
                Segment::Placeholder { identifier, .. } => out.push_str(&substitute(identifier)),
            }
        }
        out
    }
}

/// Scan `source` for placeholders. Never fails.
pub fn scan(source: &str) -> Template<'_> {
    let mut segments = Vec::new();

    let (mut input, leading) = until_open(source);
    if !leading.is_empty() {
        segments.push(Segment::Text(leading));
    }

    while let Ok((after_open, _)) = open(input) {
        let start = source.len() - input.len();
        let (next, chunk) = until_open(after_open);

        match placeholder_body(chunk) {
            Ok((tail, identifier)) => {
                let end = start + OPEN.len() + identifier.len() + CLOSE.len();
                segments.push(Segment::Placeholder {
                    identifier,
                    span: Span::new(start, end),
                });
                if !tail.is_empty() {
                    segments.push(Segment::Text(tail));
                }
            }
            Err(_) => {
                let end = start + OPEN.len() + chunk.len();
                segments.push(Segment::Unterminated {
                    text: &source[start..end],
                    span: Span::new(start, end),
                });
            }
        }

        input = next;
    }

    Template { source, segments }
}

fn open(input: &str) -> IResult<&str, &str> {
    tag(OPEN)(input)
}

/// Everything up to the next opener, or the rest of the input.
fn until_open(input: &str) -> (&str, &str) {
    let parsed: IResult<&str, &str> = alt((take_until(OPEN), rest))(input);
    // `rest` always succeeds.
    parsed.unwrap_or(("", input))
}

fn placeholder_body(chunk: &str) -> IResult<&str, &str> {
    terminated(take_until(CLOSE), tag(CLOSE))(chunk)
}
