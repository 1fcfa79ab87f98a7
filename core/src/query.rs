//! Query-string encoding.
//!
//! # Design
//! Options are kept in insertion order and encoded in that order, so the
//! same options always produce the same string. Encoding follows the API's
//! legacy falsy-omission rule: absent values, `false`, zero, empty strings
//! and empty lists are dropped rather than sent. `true` becomes a bare
//! flag (`fulltext`, not `fulltext=true`). Lists are comma-joined into one
//! value, as `key=a,b` or, for endpoints that want it, `key[]=a,b`.
//!
//! Because of falsy-omission there is no way to send a literal `0` or
//! `false` through the ordinary variants. `QueryValue::Verbatim` is the
//! explicit escape: it is always emitted as `key=value`.
//!
//! Values are percent-encoded with `urlencoding`, which leaves only
//! alphanumerics and `-_.~` alone. `!'()*` are therefore escaped too, where
//! Node's `querystring.escape` keeps them literal. Servers decode both
//! forms to the same value; only a byte-level comparison sees a difference.

use std::fmt;

/// How list values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayEncoding {
    /// `key=a,b,c`
    #[default]
    Comma,
    /// `key[]=a,b,c`, for legacy endpoints.
    Bracket,
}

/// One element of a list value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryScalar {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for QueryScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryScalar::Str(s) => f.write_str(s),
            QueryScalar::Int(n) => write!(f, "{n}"),
            QueryScalar::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for QueryScalar {
    fn from(s: &str) -> Self {
        QueryScalar::Str(s.to_string())
    }
}

impl From<String> for QueryScalar {
    fn from(s: String) -> Self {
        QueryScalar::Str(s)
    }
}

impl From<i64> for QueryScalar {
    fn from(n: i64) -> Self {
        QueryScalar::Int(n)
    }
}

impl From<u64> for QueryScalar {
    fn from(n: u64) -> Self {
        i64::try_from(n)
            .map(QueryScalar::Int)
            .unwrap_or_else(|_| QueryScalar::Str(n.to_string()))
    }
}

/// A single option value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryValue {
    /// Not set. Never emitted.
    #[default]
    Absent,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<QueryScalar>),
    /// Always emitted as `key=value`, bypassing falsy-omission.
    Verbatim(String),
}

impl QueryValue {
    /// Whether falsy-omission drops this value.
    pub fn is_omitted(&self) -> bool {
        match self {
            QueryValue::Absent => true,
            QueryValue::Str(s) => s.is_empty(),
            QueryValue::Int(n) => *n == 0,
            QueryValue::Float(n) => *n == 0.0 || n.is_nan(),
            QueryValue::Bool(b) => !b,
            QueryValue::List(items) => items.is_empty(),
            QueryValue::Verbatim(_) => false,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Str(s)
    }
}

impl From<&String> for QueryValue {
    fn from(s: &String) -> Self {
        QueryValue::Str(s.clone())
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Int(n)
    }
}

impl From<i32> for QueryValue {
    fn from(n: i32) -> Self {
        QueryValue::Int(i64::from(n))
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Int(i64::from(n))
    }
}

impl From<u64> for QueryValue {
    fn from(n: u64) -> Self {
        i64::try_from(n)
            .map(QueryValue::Int)
            .unwrap_or_else(|_| QueryValue::Str(n.to_string()))
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        QueryValue::Float(n)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl<T: Into<QueryScalar>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryValue::Absent)
    }
}

/// Insertion-ordered option bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    entries: Vec<(String, QueryValue)>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`. A key that is already present keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode into a query string without the leading `?`.
    pub fn encode(&self, encoding: ArrayEncoding) -> String {
        encode_query(self, encoding)
    }
}

/// Encode `options` in insertion order. Returns an empty string when every
/// entry was omitted.
pub fn encode_query(options: &QueryOptions, encoding: ArrayEncoding) -> String {
    options
        .iter()
        .filter(|(_, value)| !value.is_omitted())
        .map(|(key, value)| encode_pair(key, value, encoding))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_pair(key: &str, value: &QueryValue, encoding: ArrayEncoding) -> String {
    let key = urlencoding::encode(key);
    match value {
        QueryValue::Bool(_) => key.into_owned(),
        QueryValue::List(items) => {
            let joined = items
                .iter()
                .map(|item| urlencoding::encode(&item.to_string()).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            match encoding {
                ArrayEncoding::Comma => format!("{key}={joined}"),
                ArrayEncoding::Bracket => format!("{key}[]={joined}"),
            }
        }
        QueryValue::Str(s) | QueryValue::Verbatim(s) => format!("{key}={}", urlencoding::encode(s)),
        QueryValue::Int(n) => format!("{key}={n}"),
        QueryValue::Float(n) => format!("{key}={n}"),
        // Filtered out by `is_omitted`.
        QueryValue::Absent => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_values_are_omitted() {
        let options = QueryOptions::new()
            .with("max", 10)
            .with("lang", vec!["en", "es"])
            .with("clean", false)
            .with("notCategory", None::<String>);
        assert_eq!(options.encode(ArrayEncoding::Comma), "max=10&lang=en,es");
    }

    #[test]
    fn true_is_a_bare_flag() {
        let options = QueryOptions::new().with("fulltext", true);
        assert_eq!(options.encode(ArrayEncoding::Comma), "fulltext");
    }

    #[test]
    fn zero_and_empty_values_are_dropped() {
        let options = QueryOptions::new()
            .with("max", 0)
            .with("ratio", 0.0)
            .with("q", "")
            .with("cat", Vec::<String>::new());
        assert_eq!(options.encode(ArrayEncoding::Comma), "");
    }

    #[test]
    fn verbatim_bypasses_omission() {
        let options = QueryOptions::new()
            .with("clean", QueryValue::Verbatim("false".to_string()))
            .with("max", QueryValue::Verbatim("0".to_string()));
        assert_eq!(options.encode(ArrayEncoding::Comma), "clean=false&max=0");
    }

    #[test]
    fn bracket_encoding_for_legacy_endpoints() {
        let options = QueryOptions::new().with("cat", vec!["News", "Comedy"]);
        assert_eq!(options.encode(ArrayEncoding::Bracket), "cat[]=News,Comedy");
        assert_eq!(options.encode(ArrayEncoding::Comma), "cat=News,Comedy");
    }

    #[test]
    fn scalar_values_are_uri_encoded() {
        let options = QueryOptions::new().with("q", "this week in tech & more");
        assert_eq!(
            options.encode(ArrayEncoding::Comma),
            "q=this%20week%20in%20tech%20%26%20more"
        );
    }

    #[test]
    fn list_elements_are_encoded_individually() {
        let options = QueryOptions::new().with("cat", vec!["Arts & Design", "TV,Film"]);
        assert_eq!(
            options.encode(ArrayEncoding::Comma),
            "cat=Arts%20%26%20Design,TV%2CFilm"
        );
    }

    #[test]
    fn numeric_lists_join_with_commas() {
        let options = QueryOptions::new().with("id", vec![75075_i64, 920666]);
        assert_eq!(options.encode(ArrayEncoding::Comma), "id=75075,920666");
    }

    #[test]
    fn reinserting_a_key_keeps_its_position() {
        let mut options = QueryOptions::new().with("a", 1).with("b", 2);
        options.insert("a", 3);
        assert_eq!(options.encode(ArrayEncoding::Comma), "a=3&b=2");
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn floats_render_like_plain_numbers() {
        let options = QueryOptions::new().with("x", 1.5).with("y", 10.0);
        assert_eq!(options.encode(ArrayEncoding::Comma), "x=1.5&y=10");
    }

    #[test]
    fn nan_is_treated_as_falsy() {
        let options = QueryOptions::new().with("x", f64::NAN);
        assert!(options.encode(ArrayEncoding::Comma).is_empty());
    }

    #[test]
    fn reserved_marks_are_escaped() {
        let options = QueryOptions::new().with("q", "(it's)!*");
        assert_eq!(options.encode(ArrayEncoding::Comma), "q=%28it%27s%29%21%2A");
    }
}
