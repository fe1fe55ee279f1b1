use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of a single value in a data model: which model, and where in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataReference {
    pub data_type: String,
    pub field: String,
}

impl DataReference {
    #[must_use]
    pub fn new(data_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            field: field.into(),
        }
    }

    /// Same data type, different field.
    #[must_use]
    pub fn with_field(&self, field: impl Into<String>) -> Self {
        Self {
            data_type: self.data_type.clone(),
            field: field.into(),
        }
    }
}

impl fmt::Display for DataReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.data_type, self.field)
    }
}

/// One dot-separated step of a field path, with an optional `[i]` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathSegment<'a> {
    pub(crate) name: &'a str,
    pub(crate) index: Option<usize>,
}

/// Split `a.b[2].c` into segments. An empty path has no segments.
pub(crate) fn split_path(path: &str) -> Vec<PathSegment<'_>> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> PathSegment<'_> {
    if let Some(open) = segment.rfind('[') {
        if let Some(inner) = segment[open + 1..].strip_suffix(']') {
            if let Ok(index) = inner.parse() {
                return PathSegment {
                    name: &segment[..open],
                    index: Some(index),
                };
            }
        }
    }
    PathSegment {
        name: segment,
        index: None,
    }
}

pub(crate) fn join_path(segments: &[PathSegment<'_>]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(segment.name);
        if let Some(index) = segment.index {
            out.push('[');
            out.push_str(&index.to_string());
            out.push(']');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let r = DataReference::new("model", "people.name");
        assert_eq!(r.to_string(), "model::people.name");
    }

    #[test]
    fn with_field_keeps_data_type() {
        let r = DataReference::new("model", "a").with_field("b");
        assert_eq!(r, DataReference::new("model", "b"));
    }

    #[test]
    fn serde_camel_case() {
        let r: DataReference =
            serde_json::from_str(r#"{"dataType":"model","field":"a.b"}"#).unwrap();
        assert_eq!(r, DataReference::new("model", "a.b"));
    }

    #[test]
    fn split_plain_and_indexed() {
        let segs = split_path("people[2].name");
        assert_eq!(
            segs,
            vec![
                PathSegment {
                    name: "people",
                    index: Some(2)
                },
                PathSegment {
                    name: "name",
                    index: None
                },
            ]
        );
        assert!(split_path("").is_empty());
    }

    #[test]
    fn malformed_index_stays_in_name() {
        let segs = split_path("a[x]");
        assert_eq!(segs[0].name, "a[x]");
        assert_eq!(segs[0].index, None);
    }

    #[test]
    fn join_round_trips() {
        for path in ["a", "a.b", "people[2].kids[0].name"] {
            assert_eq!(join_path(&split_path(path)), path);
        }
    }
}
