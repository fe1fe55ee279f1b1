use std::fmt;

use serde::{Deserialize, Serialize};
use winnow::ascii::digit1;
use winnow::combinator::{alt, delimited, repeat};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

use super::error::TemplateError;

/// One piece of a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim.
    Literal(String),
    /// `{N}`: replaced by the `N`th entry of a depth path.
    Placeholder(usize),
}

/// A field path or component id with positional placeholders, e.g.
/// `"people.name{0}"` or `"name-{0}-{1}"`.
///
/// Only `{` followed by digits and `}` is a placeholder. Everything else,
/// including stray braces, is literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Malformed`] if a placeholder index does not fit
    /// in a `usize`.
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let pieces = raw_segments.parse(raw).map_err(|e| TemplateError::Malformed {
            template: raw.to_owned(),
            message: e.to_string(),
        })?;

        let mut segments: Vec<Segment> = Vec::with_capacity(pieces.len());
        for piece in pieces {
            match piece {
                RawSegment::Placeholder(digits) => {
                    let index = digits.parse().map_err(|_| TemplateError::Malformed {
                        template: raw.to_owned(),
                        message: format!("placeholder index '{digits}' is too large"),
                    })?;
                    segments.push(Segment::Placeholder(index));
                }
                RawSegment::Literal(text) => match segments.last_mut() {
                    Some(Segment::Literal(prev)) => prev.push_str(text),
                    _ => segments.push(Segment::Literal(text.to_owned())),
                },
            }
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// The template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Whether the template contains at least one placeholder.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_)))
    }

    /// The template with every placeholder removed.
    ///
    /// Input parameters are written as `group{0}.field`; dropping the
    /// placeholder leaves the plain path that transposition then indexes.
    #[must_use]
    pub fn strip(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Literal(text) => Some(text.as_str()),
                Segment::Placeholder(_) => None,
            })
            .collect()
    }

    /// Substitute each `{N}` with `depth[N]`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::DepthOutOfRange`] if a placeholder index is
    /// not covered by `depth`.
    pub fn resolve(&self, depth: &[usize]) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(index) => {
                    let row = depth.get(*index).ok_or(TemplateError::DepthOutOfRange {
                        index: *index,
                        depth: depth.len(),
                    })?;
                    out.push_str(&row.to_string());
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl TryFrom<&str> for Template {
    type Error = TemplateError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<Template> for String {
    fn from(template: Template) -> Self {
        template.raw
    }
}

// -- Grammar ----------------------------------------------------------------

enum RawSegment<'i> {
    Literal(&'i str),
    Placeholder(&'i str),
}

fn placeholder<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    delimited('{', digit1, '}').parse_next(input)
}

fn literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((take_while(1.., |c: char| c != '{'), "{")).parse_next(input)
}

fn raw_segments<'i>(input: &mut &'i str) -> ModalResult<Vec<RawSegment<'i>>> {
    repeat(
        0..,
        alt((
            placeholder.map(RawSegment::Placeholder),
            literal.map(RawSegment::Literal),
        )),
    )
    .parse_next(input)
}
