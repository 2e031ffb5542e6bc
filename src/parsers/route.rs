//! The route grammar used by the routing table: `[scheme://]host[/path]`.
//!
//! Routes only constrain scheme, host and path. Everything between the scheme separator and
//! the first `/` is the host, so a route cannot constrain ports or query strings; the returned
//! pattern always accepts any port and any query.

use crate::{
    common::data::Error,
    matchers::{uri::UriPattern, value::Value},
};

/// Parses a route such as `https://*.example.com/api/*`.
pub fn parse(route: &str) -> Result<UriPattern, Error> {
    let text = route.trim();
    if text.is_empty() {
        return Err(Error::syntax(route, "empty route isn't valid"));
    }

    if text == "*" {
        return Ok(UriPattern::any());
    }

    let (scheme, rest) = match text.find("://") {
        Some(0) => return Err(Error::syntax(route, "no scheme specified")),
        Some(idx) => (Value::from_wildcard(&text[..idx])?, &text[idx + 3..]),
        None => (Value::Any, text),
    };

    let (host, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let path = match path {
        p if !p.starts_with('/') => Value::Any,
        "/*" => Value::Any,
        p if p.contains('*') => Value::pattern(p)?,
        p => Value::exact(p),
    };

    Ok(UriPattern {
        scheme,
        host: Value::from_wildcard(host)?,
        path,
        ..UriPattern::any()
    })
}
