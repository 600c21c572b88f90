use crate::error::{ActionError, Result, RouteResolutionError};
use crate::routing::RouteParams;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
    CatchAll(String),
}

/// A path pattern in axum syntax: `/users/{id}`, `/files/{*path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if !pattern.starts_with('/') {
            return Err(ActionError::invalid_route(pattern, "must start with '/'"));
        }

        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        let parts: Vec<&str> = pattern[1..].split('/').collect();
        let last = parts.len() - 1;

        for (index, part) in parts.iter().enumerate() {
            let segment = parse_segment(pattern, part)?;
            match &segment {
                Segment::Capture(name) | Segment::CatchAll(name) => {
                    if !seen.insert(name.clone()) {
                        return Err(ActionError::invalid_route(
                            pattern,
                            format!("duplicate capture '{name}'"),
                        ));
                    }
                    if matches!(segment, Segment::CatchAll(_)) && index != last {
                        return Err(ActionError::invalid_route(
                            pattern,
                            "catch-all capture must be the last segment",
                        ));
                    }
                }
                Segment::Literal(_) => {}
            }
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Join a group prefix and a route path, then parse the result.
    pub fn join(prefix: &str, path: &str) -> Result<Self> {
        let prefix = prefix.trim_end_matches('/');
        let joined = match path {
            "" | "/" if prefix.is_empty() => "/".to_string(),
            "" | "/" => prefix.to_string(),
            _ if path.starts_with('/') => format!("{prefix}{path}"),
            _ => format!("{prefix}/{path}"),
        };
        let joined = if joined.starts_with('/') {
            joined
        } else {
            format!("/{joined}")
        };
        Self::parse(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn captures(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Capture(name) | Segment::CatchAll(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// The pattern with capture names erased: `/users/{id}` and
    /// `/users/{user_id}` share the shape `/users/{}`.
    pub fn shape(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => format!("/{text}"),
                Segment::Capture(_) => "/{}".to_string(),
                Segment::CatchAll(_) => "/{*}".to_string(),
            })
            .collect()
    }

    /// Substitute captures from `params`; leftovers become the query string.
    pub fn render(
        &self,
        route: &str,
        params: &RouteParams,
    ) -> std::result::Result<String, RouteResolutionError> {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Capture(name) | Segment::CatchAll(name) => {
                    let value =
                        params
                            .get(name)
                            .ok_or_else(|| RouteResolutionError::MissingParameter {
                                route: route.to_string(),
                                parameter: name.clone(),
                            })?;
                    path.push_str(value);
                }
            }
        }

        let captures: HashSet<&str> = self.captures().collect();
        let extra: Vec<(&str, &str)> = params
            .iter()
            .filter(|(key, _)| !captures.contains(key))
            .collect();
        if !extra.is_empty() {
            // Encoding a list of string pairs cannot fail.
            if let Ok(query) = serde_urlencoded::to_string(&extra) {
                path.push('?');
                path.push_str(&query);
            }
        }
        Ok(path)
    }
}

fn parse_segment(pattern: &str, part: &str) -> Result<Segment> {
    let Some(inner) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) else {
        if part.contains('{') || part.contains('}') {
            return Err(ActionError::invalid_route(
                pattern,
                format!("captures must span a whole segment, found '{part}'"),
            ));
        }
        if part.starts_with([':', '*']) {
            return Err(ActionError::invalid_route(
                pattern,
                format!("use '{{name}}' captures, found '{part}'"),
            ));
        }
        return Ok(Segment::Literal(part.to_string()));
    };

    let (name, catch_all) = match inner.strip_prefix('*') {
        Some(name) => (name, true),
        None => (inner, false),
    };
    if name.is_empty() || name.contains(['{', '}', '*']) {
        return Err(ActionError::invalid_route(
            pattern,
            format!("invalid capture '{part}'"),
        ));
    }

    Ok(if catch_all {
        Segment::CatchAll(name.to_string())
    } else {
        Segment::Capture(name.to_string())
    })
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
