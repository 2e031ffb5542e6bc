//! `httpfake` is a test double for HTTP clients. Instead of sending requests over the network,
//! the code under test hands them to a [FakeHandler], which
//!
//! * records every request it receives,
//! * answers it with a canned [Response], usually chosen by a [RoutingTable], and
//! * lets the test verify afterwards which requests were made.
//!
//! # Getting Started
//! ```rust
//! use httpfake::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handler = FakeHandler::with_routes(|routes| {
//!     let user = JsonResponse::new(&serde_json::json!({"id": 1}))?;
//!     routes.map("https://api.example.com/users/*", user)?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! // The code under test sends its requests through the handler.
//! let req = http::Request::get("https://api.example.com/users/1")
//!     .header("accept", "application/json")
//!     .body(Bytes::new())
//!     .unwrap();
//! let res = handler.send(req).await.unwrap();
//! assert_eq!(res.status(), StatusCode::OK);
//!
//! // Unmatched requests are answered with 404 Not Found.
//! let req = http::Request::get("https://api.example.com/orders").body(Bytes::new()).unwrap();
//! assert_eq!(handler.send(req).await.unwrap().status(), StatusCode::NOT_FOUND);
//!
//! handler
//!     .should_have_made_requests_to("https://api.example.com/users/*")
//!     .unwrap()
//!     .with_method(Method::GET)
//!     .with_header("accept", "*json")
//!     .unwrap()
//!     .once();
//! # }
//! ```
//!
//! # Patterns
//! Routes and assertions select requests with wildcard patterns. `*` stands for any number of
//! characters and is the only special character. Assertions understand the complete form
//! `scheme://host:port/path?query`, routes understand `scheme://host/path`. Every component
//! is optional: `*/users` matches the path `/users` on any host, and `*` matches everything.
//!
//! Scheme, host, path, query and header values are compared case-insensitively unless the
//! [MatchOptions] say otherwise. Request bodies are always compared case-sensitively.
//!
//! # Debugging
//! `httpfake` logs through `tracing`, with the `log` compatibility feature enabled. With the
//! `env_logger` backend, set `RUST_LOG=httpfake=debug` and call `env_logger::try_init()` to see
//! which requests were captured and which route answered them.
pub mod api;
pub mod common;
pub mod matchers;
pub mod parsers;
pub mod routing;

pub use api::{
    assertion::RequestAssertion,
    handler::FakeHandler,
    response::{
        not_found, DelayedResponse, JsonResponse, Response, SequenceResponse, StatusCodeResponse,
        TextResponse, TimeoutResponse,
    },
};
pub use common::data::{CapturedRequest, Content, Error};
pub use matchers::{
    options::MatchOptions,
    request::{RequestMatch, RequestPattern},
    uri::{UriMatch, UriPattern},
    value::{Glob, MatchTarget, Value},
};
pub use routing::{RouteDefinition, RoutingTable};
pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    #[doc(no_inline)]
    pub use crate::{
        CancellationToken, CapturedRequest, Content, DelayedResponse, Error, FakeHandler,
        JsonResponse, MatchOptions, RequestAssertion, RequestPattern, Response, RoutingTable,
        SequenceResponse, StatusCodeResponse, TextResponse, TimeoutResponse, UriPattern, Value,
    };
    #[doc(no_inline)]
    pub use bytes::Bytes;
    #[doc(no_inline)]
    pub use http::{Method, StatusCode, Version};
}
