use crate::{
    common::{
        data::{CapturedRequest, Error},
        util::string_distance,
    },
    matchers::{
        options::MatchOptions,
        request::{RequestMatch, RequestPattern},
        uri::UriPattern,
        value::Value,
    },
};
use http::{Method, Version};
use std::sync::Arc;

/// Verifies that the captured requests of a [FakeHandler](crate::FakeHandler) contain the
/// expected requests.
///
/// Requirements are added with the `with_*` methods. The terminal methods (`times`, `once`,
/// `at_least` and `never`) panic with a description of the mismatch when the expectation
/// does not hold.
///
/// # Example
/// ```
/// use httpfake::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() {
/// let handler = FakeHandler::new(StatusCodeResponse::new(StatusCode::OK));
///
/// let req = http::Request::builder()
///     .method(Method::POST)
///     .uri("https://httpbin.org/post")
///     .body(Bytes::from("hello"))
///     .unwrap();
/// handler.send(req).await.unwrap();
///
/// handler
///     .should_have_made_requests_to("https://*.org/post")
///     .unwrap()
///     .with_method(Method::POST)
///     .with_content("hello")
///     .once();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestAssertion {
    requests: Vec<Arc<CapturedRequest>>,
    pattern: RequestPattern,
    options: MatchOptions,
    headers_customized: bool,
}

impl RequestAssertion {
    pub(crate) fn new(
        requests: Vec<Arc<CapturedRequest>>,
        request_uri: UriPattern,
        options: MatchOptions,
    ) -> Self {
        Self {
            requests,
            pattern: RequestPattern::new(request_uri),
            options,
            headers_customized: false,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.pattern.method = Value::exact(method);
        self.pattern.method_case_insensitive = false;
        self
    }

    /// Like [RequestAssertion::with_method], but compares the method name case-insensitively,
    /// extension methods included.
    pub fn with_method_str(mut self, method: &str) -> Result<Self, Error> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|e| Error::InvalidValue(format!("'{}' is not a method: {}", method, e)))?;
        self.pattern.method = Value::exact(method);
        self.pattern.method_case_insensitive = true;
        Ok(self)
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.pattern.version = Value::exact(version);
        self
    }

    /// Requires a header whose name and value match the given wildcard patterns. Multiple
    /// requirements can be added, each of them has to be satisfied. An empty `value` requires
    /// an empty header value, use `*` to accept any value.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let value = match value {
            "" => Value::exact(""),
            value => Value::from_wildcard(value)?,
        };
        let requirement = (Value::from_wildcard(name)?, value);

        if !self.headers_customized {
            self.pattern.headers.clear();
            self.headers_customized = true;
        }
        self.pattern.headers.push(requirement);
        Ok(self)
    }

    /// Requires the request to have no headers at all, content headers included.
    pub fn with_headers_absent(mut self) -> Self {
        self.pattern.headers.clear();
        self.headers_customized = true;
        self
    }

    /// Requires a body equal to `content`. Requests without a body never match.
    pub fn with_content(mut self, content: &str) -> Self {
        self.pattern.content = Value::exact(content);
        self
    }

    pub fn with_content_pattern(mut self, glob: &str) -> Result<Self, Error> {
        self.pattern.content = Value::pattern(glob)?;
        Ok(self)
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn pattern(&self) -> &RequestPattern {
        &self.pattern
    }

    pub fn matching_requests(&self) -> Vec<Arc<CapturedRequest>> {
        self.requests
            .iter()
            .filter(|req| self.pattern.is_match(req, &self.options))
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.requests
            .iter()
            .filter(|req| self.pattern.is_match(req, &self.options))
            .count()
    }

    pub fn times(&self, expected: usize) {
        let actual = self.count();
        if actual != expected {
            self.fail(&format!("exactly {}", expected), actual);
        }
    }

    pub fn once(&self) {
        self.times(1)
    }

    pub fn at_least(&self, expected: usize) {
        let actual = self.count();
        if actual < expected {
            self.fail(&format!("at least {}", expected), actual);
        }
    }

    pub fn never(&self) {
        self.times(0)
    }

    fn closest_match(&self) -> Option<(&CapturedRequest, RequestMatch)> {
        let pattern_text = self.pattern.request_uri.to_string();

        self.requests
            .iter()
            .map(|req| (req.as_ref(), self.pattern.matches(req, &self.options)))
            .max_by(|(left_req, left), (right_req, right)| {
                left.score().cmp(&right.score()).then_with(|| {
                    // Lower distance wins, so the comparison is reversed.
                    string_distance(&pattern_text, right_req.uri().as_str())
                        .cmp(&string_distance(&pattern_text, left_req.uri().as_str()))
                })
            })
    }

    fn fail(&self, expectation: &str, actual: usize) {
        let mut output = format!(
            "Expected {} request(s) matching {}, but {} of {} captured request(s) matched.",
            expectation,
            self.pattern,
            actual,
            self.requests.len()
        );

        if self.requests.is_empty() {
            output.push_str("\nNo requests have been captured.");
        } else if actual == 0 {
            if let Some((req, result)) = self.closest_match() {
                output.push_str(&format!(
                    "\nThe closest request was {} {} (mismatched: {}).",
                    req.method(),
                    req.uri(),
                    result.mismatched_fields().join(", ")
                ));
            }
        }

        panic!("{}", output);
    }
}
