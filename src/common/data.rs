use crate::common::util::{decode_text, join_header_values};
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Version};
use std::{collections::BTreeMap, convert::TryFrom, time::Duration};
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid pattern '{pattern}': {reason}")]
    PatternSyntax { pattern: String, reason: String },
    #[error("invalid matcher value: {0}")]
    InvalidValue(String),
    #[error("internal consistency error: {0}")]
    Internal(String),
    #[error("cannot capture request: {0}")]
    Request(String),
    #[error("cannot build response: {0}")]
    Http(#[from] http::Error),
    #[error("cannot serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the request has been cancelled")]
    Cancelled,
    #[error("the request timed out after {0:?}")]
    Timeout(Duration),
    #[error("no more responses left in the sequence")]
    SequenceExhausted,
}

impl Error {
    pub(crate) fn syntax(pattern: &str, reason: &str) -> Self {
        Error::PatternSyntax {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }
}

// ************************************************************************************************
// Content
// ************************************************************************************************
/// The body of a captured request together with its content headers
/// (`content-type`, `content-length`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    headers: HeaderMap,
    body: Bytes,
}

impl Content {
    pub fn new<B: Into<Bytes>>(body: B) -> Self {
        Self {
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Creates a text body with a `content-type: text/plain; charset=utf-8` header.
    pub fn text(body: &str) -> Self {
        Self::new(body.to_string()).with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Reads the whole body as text. The charset is taken from the `content-type` header and
    /// defaults to UTF-8.
    pub fn read_as_string(&self) -> String {
        let charset = self
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_of);

        decode_text(&self.body, charset.as_deref())
    }
}

fn charset_of(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_ascii_lowercase())
}

// ************************************************************************************************
// CapturedRequest
// ************************************************************************************************
/// An immutable snapshot of a request that has been sent to a
/// [FakeHandler](crate::FakeHandler).
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    method: Method,
    uri: Url,
    version: Version,
    headers: HeaderMap,
    content: Option<Content>,
}

impl CapturedRequest {
    pub fn new(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            content: None,
        }
    }

    /// Parses `uri` as an absolute URL and creates a request without headers or content.
    pub fn parse(method: Method, uri: &str) -> Result<Self, Error> {
        let uri = Url::parse(uri).map_err(|e| Error::Request(format!("{}: {}", uri, e)))?;
        Ok(Self::new(method, uri))
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// The explicit port of the request URI, or the known default port of its scheme.
    pub fn port_or_default(&self) -> Option<u16> {
        self.uri.port_or_known_default()
    }

    /// Request and content headers merged into one map. Names are lower case, multiple values
    /// of the same header are joined with `", "`.
    pub fn merged_headers(&self) -> BTreeMap<String, String> {
        let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();

        let content_headers = self.content.iter().flat_map(|c| c.headers().iter());
        for (name, value) in self.headers.iter().chain(content_headers) {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            merged
                .entry(name.as_str().to_ascii_lowercase())
                .or_default()
                .push(value);
        }

        merged
            .into_iter()
            .map(|(name, values)| (name, join_header_values(&values)))
            .collect()
    }
}

impl TryFrom<http::Request<Bytes>> for CapturedRequest {
    type Error = Error;

    fn try_from(req: http::Request<Bytes>) -> Result<Self, Self::Error> {
        let (parts, body) = req.into_parts();

        if parts.uri.scheme().is_none() || parts.uri.authority().is_none() {
            return Err(Error::Request(format!(
                "request URI '{}' is not absolute",
                parts.uri
            )));
        }

        let uri = Url::parse(&parts.uri.to_string())
            .map_err(|e| Error::Request(format!("{}: {}", parts.uri, e)))?;

        let mut headers = HeaderMap::new();
        let mut content_headers = HeaderMap::new();
        for (name, value) in parts.headers.iter() {
            if name.as_str().starts_with("content-") {
                content_headers.append(name.clone(), value.clone());
            } else {
                headers.append(name.clone(), value.clone());
            }
        }

        let content = if body.is_empty() && content_headers.is_empty() {
            None
        } else {
            Some(Content {
                headers: content_headers,
                body,
            })
        };

        Ok(Self {
            method: parts.method,
            uri,
            version: parts.version,
            headers,
            content,
        })
    }
}
