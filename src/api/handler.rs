use crate::{
    api::{assertion::RequestAssertion, response::Response},
    common::{
        data::{CapturedRequest, Error},
        util::lock,
    },
    matchers::{options::MatchOptions, uri::UriPattern},
    parsers,
    routing::RoutingTable,
};
use bytes::Bytes;
use std::{convert::TryFrom, fmt, sync::Arc, sync::Mutex};
use tokio_util::sync::CancellationToken;

/// A fake HTTP handler. It records every request it receives and answers it with the
/// configured [Response].
///
/// # Example
/// ```
/// use httpfake::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() {
/// let handler = FakeHandler::with_routes(|routes| {
///     routes
///         .map("https://httpbin.org/get", TextResponse::new("hello"))?
///         .map("*/status/*", StatusCodeResponse::new(StatusCode::ACCEPTED))?;
///     Ok(())
/// })
/// .unwrap();
///
/// let req = http::Request::get("https://httpbin.org/get").body(Bytes::new()).unwrap();
/// let res = handler.send(req).await.unwrap();
/// assert_eq!(res.body(), &Bytes::from("hello"));
///
/// handler.should_have_made_requests_to("*/get").unwrap().once();
/// # }
/// ```
pub struct FakeHandler {
    response: Box<dyn Response>,
    captured: Mutex<Vec<Arc<CapturedRequest>>>,
    options: MatchOptions,
}

impl FakeHandler {
    pub fn new<R: Response + 'static>(response: R) -> Self {
        Self {
            response: Box::new(response),
            captured: Mutex::new(Vec::new()),
            options: MatchOptions::default(),
        }
    }

    /// Creates a handler answering requests from a [RoutingTable] that is configured by
    /// `configure`. Errors of invalid routes are passed through.
    pub fn with_routes<F>(configure: F) -> Result<Self, Error>
    where
        F: FnOnce(&mut RoutingTable) -> Result<(), Error>,
    {
        let mut routes = RoutingTable::new();
        configure(&mut routes)?;
        Ok(Self::new(routes))
    }

    /// Options used by assertions started from this handler.
    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>, Error> {
        self.send_with_cancel(req, &CancellationToken::new()).await
    }

    pub async fn send_with_cancel(
        &self,
        req: http::Request<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        let req = CapturedRequest::try_from(req)?;
        self.send_captured(req, cancel).await
    }

    /// Records an already captured request and produces its response.
    pub async fn send_captured(
        &self,
        req: CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        tracing::debug!("Captured request: {} {}", req.method(), req.uri());

        let req = Arc::new(req);
        lock(&self.captured).push(req.clone());

        self.response.respond(&req, cancel).await
    }

    /// All requests received so far, oldest first.
    pub fn captured_requests(&self) -> Vec<Arc<CapturedRequest>> {
        lock(&self.captured).clone()
    }

    pub fn reset(&self) {
        lock(&self.captured).clear();
    }

    /// Starts an assertion over all captured requests.
    pub fn should_have_made_requests(&self) -> RequestAssertion {
        RequestAssertion::new(self.captured_requests(), UriPattern::any(), self.options)
    }

    /// Starts an assertion over the captured requests whose URI matches `pattern`
    /// (e.g. `https://*.example.com/api/*?page=*`).
    pub fn should_have_made_requests_to(&self, pattern: &str) -> Result<RequestAssertion, Error> {
        let request_uri = parsers::uri_pattern::parse(pattern)?;
        Ok(RequestAssertion::new(
            self.captured_requests(),
            request_uri,
            self.options,
        ))
    }

    /// Panics if any request has been captured.
    pub fn should_not_have_made_requests(&self) {
        self.should_have_made_requests().never()
    }
}

impl fmt::Debug for FakeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeHandler")
            .field("captured", &lock(&self.captured).len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
