//! Path template matching.
//!
//! # Responsibilities
//! - Parse templates like `/instances/{instanceId}/devices/fcm`
//! - Match request paths segment by segment
//! - Bind `{name}` segments to their (percent-decoded) values
//! - Invalid UTF-8 in a decoded value is replaced, never a routing miss
//!
//! # Design Decisions
//! - Literal segments are case-sensitive
//! - A parameter never binds an empty segment
//! - No regex: matching is a single pass over the segments

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// One segment of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template. Segments wrapped in braces become named parameters.
    pub fn parse(template: &str) -> Self {
        let segments = split_segments(template)
            .map(|segment| {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Literal(segment.to_string()),
                }
            })
            .collect();

        Self {
            raw: template.to_string(),
            segments,
        }
    }

    /// The template as it was registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a request path, returning the bound parameters on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(expected) => {
                    if expected != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    // Invalid UTF-8 still binds (lossily); it is not a routing miss.
                    let value = percent_decode_str(part).decode_utf8_lossy();
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }

        Some(params)
    }
}

/// Split a path into segments, ignoring the leading slash.
///
/// `"/a/b"` yields `["a", "b"]`; `"/a/"` yields `["a", ""]` so a trailing
/// slash never matches a template without one.
fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let empty = trimmed.is_empty();
    trimmed.split('/').filter(move |_| !empty)
}

/// Parameter values bound by a template match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
