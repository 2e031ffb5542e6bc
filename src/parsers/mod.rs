//! Pattern grammars.
//!
//! [uri_pattern] is the complete grammar (scheme, host, port, path and query) and is used by
//! request assertions. [route] is the smaller grammar of the routing table, which only knows
//! scheme, host and path.

pub mod route;
pub mod uri_pattern;
