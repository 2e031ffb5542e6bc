use crate::{
    common::data::CapturedRequest,
    matchers::{
        options::MatchOptions,
        uri::{UriMatch, UriPattern},
        value::Value,
    },
};
use http::{Method, Version};
use std::{collections::BTreeMap, fmt};

/// Requirements a captured request has to fulfil, one [Value] per request field.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPattern {
    pub method: Value<Method>,
    /// Compare method names case-insensitively. Set when the method was given as text.
    pub method_case_insensitive: bool,
    pub request_uri: UriPattern,
    pub version: Value<Version>,
    /// Name/value requirements. Empty means "no headers allowed", a single `(Any, Any)` entry
    /// means "any headers allowed".
    pub headers: Vec<(Value<String>, Value<String>)>,
    pub content: Value<String>,
}

impl Default for RequestPattern {
    fn default() -> Self {
        Self {
            method: Value::Any,
            method_case_insensitive: false,
            request_uri: UriPattern::any(),
            version: Value::Any,
            headers: vec![(Value::Any, Value::Any)],
            content: Value::Any,
        }
    }
}

/// Per-field outcome of [RequestPattern::matches].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestMatch {
    pub method: bool,
    pub request_uri: UriMatch,
    pub version: bool,
    pub headers: bool,
    pub content: bool,
}

impl RequestMatch {
    pub fn is_match(&self) -> bool {
        self.method && self.request_uri.is_match() && self.version && self.headers && self.content
    }

    /// The number of fields that matched, counting every URI component on its own.
    pub fn score(&self) -> usize {
        [self.method, self.version, self.headers, self.content]
            .iter()
            .filter(|m| **m)
            .count()
            + self.request_uri.matched_count()
    }

    /// Names of the fields that did not match.
    pub fn mismatched_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("method", self.method),
            ("scheme", self.request_uri.scheme),
            ("host", self.request_uri.host),
            ("port", self.request_uri.port),
            ("path", self.request_uri.path),
            ("query", self.request_uri.query),
            ("version", self.version),
            ("headers", self.headers),
            ("content", self.content),
        ];

        fields
            .iter()
            .filter(|(_, matched)| !matched)
            .map(|(name, _)| *name)
            .collect()
    }
}

impl RequestPattern {
    pub fn new(request_uri: UriPattern) -> Self {
        Self {
            request_uri,
            ..Self::default()
        }
    }

    pub fn matches(&self, req: &CapturedRequest, options: &MatchOptions) -> RequestMatch {
        let result = RequestMatch {
            method: self
                .method
                .matches(req.method(), self.method_case_insensitive),
            request_uri: self.request_uri.matches(req.uri(), options),
            version: self.version.matches(&req.version(), false),
            headers: self.headers_match(&req.merged_headers(), options),
            content: self.content_matches(req),
        };

        tracing::trace!("Matched {} {} against pattern: {:?}", req.method(), req.uri(), result);

        result
    }

    pub fn is_match(&self, req: &CapturedRequest, options: &MatchOptions) -> bool {
        self.matches(req, options).is_match()
    }

    fn headers_match(&self, headers: &BTreeMap<String, String>, options: &MatchOptions) -> bool {
        if self.headers.is_empty() {
            return headers.is_empty();
        }

        self.headers.iter().all(|(name, value)| {
            if name.is_any() && value.is_any() {
                return true;
            }

            headers.iter().any(|(header_name, header_value)| {
                name.matches(header_name.as_str(), true)
                    && value.matches(
                        header_value.as_str(),
                        options.header_values_case_insensitive,
                    )
            })
        })
    }

    fn content_matches(&self, req: &CapturedRequest) -> bool {
        match req.content() {
            None => self.content.is_any(),
            Some(content) => self
                .content
                .matches(content.read_as_string().as_str(), false),
        }
    }
}

impl fmt::Display for RequestPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.request_uri)?;
        if !self.version.is_any() {
            write!(f, " ({})", self.version)?;
        }

        match self.headers.as_slice() {
            [] => write!(f, ", without headers")?,
            [(name, value)] if name.is_any() && value.is_any() => {}
            headers => {
                let headers: Vec<String> = headers
                    .iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect();
                write!(f, ", headers [{}]", headers.join("; "))?;
            }
        }

        if !self.content.is_any() {
            write!(f, ", content '{}'", self.content)?;
        }
        Ok(())
    }
}
