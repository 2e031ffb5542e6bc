use crate::matchers::{options::MatchOptions, value::Value};
use std::fmt;
use url::Url;

/// A parsed URI pattern. Each component is matched on its own; the default pattern matches
/// every URI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UriPattern {
    pub scheme: Value<String>,
    pub host: Value<String>,
    pub port: Value<String>,
    pub path: Value<String>,
    pub query: Value<String>,
}

/// Per-component outcome of [UriPattern::matches].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriMatch {
    pub scheme: bool,
    pub host: bool,
    pub port: bool,
    pub path: bool,
    pub query: bool,
}

impl UriMatch {
    pub fn is_match(&self) -> bool {
        self.scheme && self.host && self.port && self.path && self.query
    }

    pub(crate) fn matched_count(&self) -> usize {
        [self.scheme, self.host, self.port, self.path, self.query]
            .iter()
            .filter(|m| **m)
            .count()
    }
}

impl UriPattern {
    /// A pattern that matches every URI.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn matches(&self, uri: &Url, options: &MatchOptions) -> UriMatch {
        let port = uri
            .port_or_known_default()
            .map(|p| p.to_string())
            .unwrap_or_default();

        UriMatch {
            scheme: self
                .scheme
                .matches(uri.scheme(), options.scheme_case_insensitive),
            host: self
                .host
                .matches(uri.host_str().unwrap_or_default(), options.host_case_insensitive),
            port: self.port.matches(port.as_str(), true),
            path: self.path.matches(uri.path(), options.path_case_insensitive),
            query: self
                .query
                .matches(uri.query().unwrap_or_default(), options.query_case_insensitive),
        }
    }

    pub fn is_match(&self, uri: &Url, options: &MatchOptions) -> bool {
        self.matches(uri, options).is_match()
    }
}

impl fmt::Display for UriPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |value: &Value<String>| match value {
            Value::Any => "*".to_string(),
            other => other.to_string(),
        };

        write!(f, "{}://{}", part(&self.scheme), part(&self.host))?;
        if !self.port.is_any() {
            write!(f, ":{}", part(&self.port))?;
        }
        match &self.path {
            Value::Any => write!(f, "/*")?,
            other => write!(f, "{}", other)?,
        }
        if !self.query.is_any() {
            write!(f, "?{}", part(&self.query))?;
        }
        Ok(())
    }
}
