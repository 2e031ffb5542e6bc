use crate::common::data::Error;
use http::{Method, Version};
use regex::{Regex, RegexBuilder};
use std::{borrow::Borrow, borrow::Cow, convert::TryFrom, fmt};

/// Anything a [Value] can be compared against.
///
/// Text compares case-insensitively when asked to, and so does [Method] by its name.
/// [Version] compares structurally and ignores the flag.
pub trait MatchTarget {
    fn equals(&self, other: &Self, ignore_case: bool) -> bool;
    fn as_text(&self) -> Cow<'_, str>;
}

impl MatchTarget for str {
    fn equals(&self, other: &Self, ignore_case: bool) -> bool {
        match ignore_case {
            true => self.to_lowercase() == other.to_lowercase(),
            false => self == other,
        }
    }

    fn as_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl MatchTarget for String {
    fn equals(&self, other: &Self, ignore_case: bool) -> bool {
        self.as_str().equals(other.as_str(), ignore_case)
    }

    fn as_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl MatchTarget for Method {
    fn equals(&self, other: &Self, ignore_case: bool) -> bool {
        match ignore_case {
            true => self.as_str().eq_ignore_ascii_case(other.as_str()),
            false => self == other,
        }
    }

    fn as_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl MatchTarget for Version {
    fn equals(&self, other: &Self, _ignore_case: bool) -> bool {
        self == other
    }

    fn as_text(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{:?}", self))
    }
}

// ************************************************************************************************
// Glob
// ************************************************************************************************
/// A wildcard pattern where `*` stands for zero or more characters. Every other character is
/// taken literally and the whole candidate has to match.
#[derive(Clone)]
pub struct Glob {
    source: String,
    case_sensitive: Regex,
    case_insensitive: Regex,
}

impl Glob {
    pub fn new(source: &str) -> Result<Self, Error> {
        let expression = format!("^{}$", regex::escape(source).replace(r"\*", ".*"));
        let build = |case_insensitive: bool| {
            RegexBuilder::new(&expression)
                .case_insensitive(case_insensitive)
                .dot_matches_new_line(true)
                .build()
                .map_err(|e| Error::InvalidValue(format!("cannot compile '{}': {}", source, e)))
        };

        Ok(Self {
            source: source.to_string(),
            case_sensitive: build(false)?,
            case_insensitive: build(true)?,
        })
    }

    pub fn is_match(&self, candidate: &str, ignore_case: bool) -> bool {
        match ignore_case {
            true => self.case_insensitive.is_match(candidate),
            false => self.case_sensitive.is_match(candidate),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Glob {}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Glob").field(&self.source).finish()
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

// ************************************************************************************************
// Value
// ************************************************************************************************
/// A comparison against a single field of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<T> {
    /// Matches everything, including an absent field.
    Any,
    Exact(T),
    OneOf(Vec<T>),
    Pattern(Glob),
}

impl<T> Value<T> {
    pub fn any() -> Self {
        Value::Any
    }

    pub fn exact<V: Into<T>>(expected: V) -> Self {
        Value::Exact(expected.into())
    }

    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<T>,
    {
        Value::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Like [Value::one_of], but rejects the whole set if one of its members is missing.
    pub fn try_one_of<I>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Option<T>>,
    {
        values
            .into_iter()
            .map(|v| v.ok_or_else(|| Error::InvalidValue("one-of member is missing".into())))
            .collect::<Result<Vec<T>, Error>>()
            .map(Value::OneOf)
    }

    pub fn pattern(glob: &str) -> Result<Self, Error> {
        Ok(Value::Pattern(Glob::new(glob)?))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Value::Any)
    }

    pub fn matches<Q>(&self, candidate: &Q, ignore_case: bool) -> bool
    where
        T: Borrow<Q>,
        Q: MatchTarget + ?Sized,
    {
        match self {
            Value::Any => true,
            Value::Exact(expected) => Borrow::<Q>::borrow(expected).equals(candidate, ignore_case),
            Value::OneOf(values) => values
                .iter()
                .any(|v| Borrow::<Q>::borrow(v).equals(candidate, ignore_case)),
            Value::Pattern(glob) => glob.is_match(&candidate.as_text(), ignore_case),
        }
    }
}

impl Value<String> {
    /// Classifies a pattern fragment: `*` or nothing is [Value::Any], text containing `*` is a
    /// [Value::Pattern] and everything else is [Value::Exact].
    pub fn from_wildcard(text: &str) -> Result<Self, Error> {
        match text {
            "" | "*" => Ok(Value::Any),
            t if t.contains('*') => Value::pattern(t),
            t => Ok(Value::exact(t)),
        }
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Any
    }
}

impl<T> TryFrom<Option<T>> for Value<T> {
    type Error = Error;

    fn try_from(expected: Option<T>) -> Result<Self, Self::Error> {
        expected
            .map(Value::Exact)
            .ok_or_else(|| Error::InvalidValue("expected value is missing".into()))
    }
}

impl<T: MatchTarget> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Any => write!(f, "<any>"),
            Value::Exact(v) => write!(f, "{}", v.as_text()),
            Value::OneOf(values) => {
                let values: Vec<_> = values.iter().map(|v| v.as_text()).collect();
                write!(f, "one of [{}]", values.join(", "))
            }
            Value::Pattern(glob) => write!(f, "{}", glob),
        }
    }
}
