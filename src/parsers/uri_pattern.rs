//! The URI pattern grammar used by request assertions.
//!
//! ```text
//! [scheme://][user-info@]host[:port][/path][?query][#fragment]
//! ```
//!
//! `*` is the only wildcard. A component that is missing, empty or exactly `*` matches
//! anything. User info and fragments are accepted but never matched.

use crate::{
    common::data::Error,
    matchers::{uri::UriPattern, value::Value},
};
use std::str::FromStr;

/// Parses a URI pattern such as `https://*.org:*/get?*`.
pub fn parse(pattern: &str) -> Result<UriPattern, Error> {
    let text = pattern.trim();
    if text.is_empty() {
        return Err(Error::syntax(pattern, "empty pattern isn't valid"));
    }

    let (scheme, rest) = split_scheme(pattern, text)?;
    let rest = strip_fragment(rest);
    let (rest, query) = split_query(rest)?;
    let (authority, path) = split_path(rest);
    let (host, port) = split_port(pattern, strip_user_info(authority))?;

    Ok(UriPattern {
        scheme,
        host: Value::from_wildcard(host)?,
        port,
        path: parse_path(path)?,
        query,
    })
}

impl FromStr for UriPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn split_scheme<'a>(pattern: &str, text: &'a str) -> Result<(Value<String>, &'a str), Error> {
    // A "://" that follows a path, query or fragment delimiter belongs to that component.
    let separator = text
        .find("://")
        .filter(|&idx| !text[..idx].contains(['/', '?', '#']));

    match separator {
        Some(0) => Err(Error::syntax(pattern, "no scheme specified")),
        Some(idx) => Ok((Value::from_wildcard(&text[..idx])?, &text[idx + 3..])),
        None => Ok((Value::Any, text.strip_prefix("//").unwrap_or(text))),
    }
}

fn strip_fragment(text: &str) -> &str {
    match text.rfind('#') {
        Some(idx) => &text[..idx],
        None => text,
    }
}

fn split_query(text: &str) -> Result<(&str, Value<String>), Error> {
    match text.rfind('?') {
        Some(idx) => Ok((&text[..idx], Value::from_wildcard(&text[idx + 1..])?)),
        None => Ok((text, Value::Any)),
    }
}

fn split_path(text: &str) -> (&str, &str) {
    match text.find('/') {
        Some(idx) => text.split_at(idx),
        None => (text, ""),
    }
}

fn strip_user_info(authority: &str) -> &str {
    match authority.rfind('@') {
        Some(idx) => &authority[idx + 1..],
        None => authority,
    }
}

fn split_port<'a>(pattern: &str, authority: &'a str) -> Result<(&'a str, Value<String>), Error> {
    let colon = authority.rfind(':');
    let closing_bracket = authority.rfind(']');

    let colon = match (colon, closing_bracket) {
        (Some(c), Some(b)) if c < b => None,
        (colon, _) => colon,
    };

    let idx = match colon {
        None => return Ok((authority, Value::Any)),
        Some(idx) => idx,
    };

    let port = &authority[idx + 1..];
    if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit() || c == '*') {
        return Err(Error::syntax(pattern, "invalid port"));
    }

    Ok((&authority[..idx], Value::from_wildcard(port)?))
}

fn parse_path(path: &str) -> Result<Value<String>, Error> {
    if path.is_empty() {
        return Ok(Value::Any);
    }

    if !path.starts_with('/') {
        return Err(Error::Internal(format!(
            "path '{}' does not start with '/'",
            path
        )));
    }

    match path {
        "/*" => Ok(Value::Any),
        p if p.contains('*') => Value::pattern(p),
        p => Ok(Value::exact(p)),
    }
}
