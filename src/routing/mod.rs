//! Routes requests to configured responses.
//!
//! Routes are tried in the order they were added and the first route whose pattern matches
//! the request URI answers it. Later routes never shadow earlier ones, however specific they
//! are. Requests that match no route are answered by the fallback response.

use crate::{
    api::response::{not_found, Response},
    common::data::{CapturedRequest, Error},
    matchers::{options::MatchOptions, uri::UriPattern},
    parsers,
};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A single routing table entry.
pub struct RouteDefinition {
    pub pattern: UriPattern,
    pub response: Box<dyn Response>,
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// An ordered list of routes plus a fallback response. The default fallback answers with
/// `404 Not Found`.
pub struct RoutingTable {
    routes: Vec<RouteDefinition>,
    fallback: Box<dyn Response>,
    options: MatchOptions,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::new_with_options(MatchOptions::default())
    }

    pub fn new_with_options(options: MatchOptions) -> Self {
        Self {
            routes: Vec::new(),
            fallback: Box::new(not_found()),
            options,
        }
    }

    /// Adds a route such as `https://*.example.com/api/*`. Invalid routes are rejected and
    /// never stored.
    pub fn map<R: Response + 'static>(
        &mut self,
        route: &str,
        response: R,
    ) -> Result<&mut Self, Error> {
        let pattern = parsers::route::parse(route)?;
        Ok(self.map_pattern(pattern, response))
    }

    /// Adds a route for an already parsed pattern, e.g. one produced by the full URI pattern
    /// grammar that also constrains ports and query strings.
    pub fn map_pattern<R: Response + 'static>(
        &mut self,
        pattern: UriPattern,
        response: R,
    ) -> &mut Self {
        tracing::debug!("Adding route #{} for pattern {}", self.routes.len(), pattern);

        self.routes.push(RouteDefinition {
            pattern,
            response: Box::new(response),
        });
        self
    }

    /// Replaces the response used when no route matches.
    pub fn map_fallback_response<R: Response + 'static>(&mut self, response: R) -> &mut Self {
        self.fallback = Box::new(response);
        self
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Finds the index of the first route matching `uri`.
    pub fn find_route(&self, uri: &Url) -> Option<usize> {
        self.routes
            .iter()
            .position(|route| route.pattern.is_match(uri, &self.options))
    }

    /// Selects the response for `uri`: the first matching route, or the fallback.
    pub fn select(&self, uri: &Url) -> &dyn Response {
        match self.find_route(uri) {
            Some(idx) => {
                tracing::debug!("Route #{} matched {}", idx, uri);
                self.routes[idx].response.as_ref()
            }
            None => {
                tracing::debug!("No route matched {}, using fallback response", uri);
                self.fallback.as_ref()
            }
        }
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingTable")
            .field("routes", &self.routes)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Response for RoutingTable {
    async fn respond(
        &self,
        req: &CapturedRequest,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>, Error> {
        self.select(req.uri()).respond(req, cancel).await
    }
}
