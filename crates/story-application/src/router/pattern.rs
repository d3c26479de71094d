//! Route patterns and location fragment parsing.

use std::cmp::Ordering;
use std::fmt;
use story_core::error::{Result, StoryError};

/// The pattern that matches any location nothing else claims.
pub const WILDCARD: &str = "*";

/// Parameters extracted from a location, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    pairs: Vec<(String, String)>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Normalises a location fragment into a path.
///
/// `#/story/42/?tab=map` becomes `/story/42`; an empty fragment is `/`.
pub fn normalize_fragment(fragment: &str) -> String {
    let fragment = fragment.trim();
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let path = fragment.split('?').next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Wildcard,
    Segments(Vec<Segment>),
}

/// A parsed route pattern such as `/story/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    shape: Shape,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern == WILDCARD {
            return Ok(Self {
                raw: WILDCARD.to_string(),
                shape: Shape::Wildcard,
            });
        }
        if !pattern.starts_with('/') {
            return Err(StoryError::config(format!(
                "Route pattern '{}' must start with '/'",
                pattern
            )));
        }

        let mut names: Vec<&str> = Vec::new();
        let mut segments = Vec::new();
        for segment in split_path(pattern) {
            match segment.strip_prefix(':') {
                Some("") => {
                    return Err(StoryError::config(format!(
                        "Route pattern '{}' has an unnamed parameter",
                        pattern
                    )));
                }
                Some(name) => {
                    if names.contains(&name) {
                        return Err(StoryError::config(format!(
                            "Route pattern '{}' repeats parameter ':{}'",
                            pattern, name
                        )));
                    }
                    names.push(name);
                    segments.push(Segment::Param(name.to_string()));
                }
                None if segment == WILDCARD => {
                    return Err(StoryError::config(format!(
                        "Route pattern '{}' uses '*' inside a path; only the bare wildcard route is supported",
                        pattern
                    )));
                }
                None => segments.push(Segment::Literal(segment.to_string())),
            }
        }

        Ok(Self {
            raw: normalize_fragment(pattern),
            shape: Shape::Segments(segments),
        })
    }

    /// The normalised pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_wildcard(&self) -> bool {
        self.shape == Shape::Wildcard
    }

    /// Matches a normalised path, extracting parameters positionally.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let segments = match &self.shape {
            Shape::Wildcard => return Some(RouteParams::new()),
            Shape::Segments(segments) => segments,
        };

        let parts = split_path(path);
        if parts.len() != segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push((name.clone(), part.to_string())),
            }
        }
        Some(RouteParams { pairs: params })
    }

    /// Orders two patterns that both matched the same path.
    ///
    /// Compares segment by segment; a literal beats a parameter at the
    /// first position where they differ. The wildcard is least specific.
    pub fn specificity_cmp(&self, other: &Self) -> Ordering {
        match (&self.shape, &other.shape) {
            (Shape::Wildcard, Shape::Wildcard) => Ordering::Equal,
            (Shape::Wildcard, _) => Ordering::Less,
            (_, Shape::Wildcard) => Ordering::Greater,
            (Shape::Segments(a), Shape::Segments(b)) => {
                let literal = |s: &Segment| matches!(s, Segment::Literal(_));
                a.iter()
                    .map(literal)
                    .cmp(b.iter().map(literal))
            }
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fragment() {
        assert_eq!(normalize_fragment(""), "/");
        assert_eq!(normalize_fragment("#"), "/");
        assert_eq!(normalize_fragment("#/"), "/");
        assert_eq!(normalize_fragment("#/story/42"), "/story/42");
        assert_eq!(normalize_fragment("story/42/"), "/story/42");
        assert_eq!(normalize_fragment("#/bookmark?sort=new"), "/bookmark");
        assert_eq!(normalize_fragment("/about/"), "/about");
    }

    #[test]
    fn test_param_extraction() {
        let pattern = RoutePattern::parse("/story/:id").unwrap();
        let params = pattern.matches("/story/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.len(), 1);

        assert!(pattern.matches("/story").is_none());
        assert!(pattern.matches("/story/42/extra").is_none());
        assert!(pattern.matches("/stories/42").is_none());
    }

    #[test]
    fn test_root_pattern_matches_only_root() {
        let root = RoutePattern::parse("/").unwrap();
        assert!(root.matches("/").unwrap().is_empty());
        assert!(root.matches("/about").is_none());
    }

    #[test]
    fn test_literal_is_more_specific_than_param() {
        let literal = RoutePattern::parse("/story/new").unwrap();
        let param = RoutePattern::parse("/story/:id").unwrap();
        let wildcard = RoutePattern::parse("*").unwrap();

        assert_eq!(literal.specificity_cmp(&param), Ordering::Greater);
        assert_eq!(param.specificity_cmp(&literal), Ordering::Less);
        assert_eq!(param.specificity_cmp(&wildcard), Ordering::Greater);
        assert!(wildcard.matches("/anything/at/all").is_some());
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(RoutePattern::parse("story").is_err());
        assert!(RoutePattern::parse("/story/:").is_err());
        assert!(RoutePattern::parse("/a/:id/:id").is_err());
        assert!(RoutePattern::parse("/files/*").is_err());
    }
}
