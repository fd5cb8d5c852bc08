//! Query strings as an ordered multi-map.
//!
//! A [`Query`] is the parsed, decoded view of a raw query string: an
//! ordered sequence of key-value pairs in which duplicate keys are
//! preserved and iteration follows parse order. The view is read-only;
//! query manipulation goes through the [`Url`] derivation methods
//! (`with_query`, `update_query`, `extend_query`, `without_query_params`).
//!
//! [`Url`]: crate::Url

use std::borrow::Cow;
use std::collections::HashSet;
use std::slice;

use crate::encoding::{QS_PART_UNQUOTER, QUERY_PART_QUOTER, QUERY_QUOTER};
use crate::error::Error;

/// An ordered multi-map of decoded query parameters.
///
/// # Examples
///
/// ```
/// use fluent_url::Url;
///
/// let url = Url::parse("http://example.com/?a=1&b=2&a=3")?;
/// let query = url.query();
/// assert_eq!(query.get("a"), Some("1"));
/// assert_eq!(query.get_all("a").collect::<Vec<_>>(), ["1", "3"]);
/// assert_eq!(query.len(), 3);
/// # Ok::<_, fluent_url::error::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Parses a raw query string, splitting on `"&"` and `";"` and
    /// decoding each token with `+` as space. Tokens without `"="` yield
    /// an empty value; empty tokens are skipped.
    pub(crate) fn parse(raw: &str) -> Query {
        let mut pairs = Vec::new();
        for token in raw.split(['&', ';']) {
            if token.is_empty() {
                continue;
            }
            let (key, value) = token.split_once('=').unwrap_or((token, ""));
            pairs.push((
                QS_PART_UNQUOTER.unquote(key).into_owned(),
                QS_PART_UNQUOTER.unquote(value).into_owned(),
            ));
        }
        Query { pairs }
    }

    /// Serializes the pairs back into a raw query string.
    pub(crate) fn encode(&self) -> String {
        let quoter = QUERY_PART_QUOTER;
        let mut out = String::new();
        for (key, value) in &self.pairs {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&quoter.quote_literal(key));
            out.push('=');
            out.push_str(&quoter.quote_literal(value));
        }
        out
    }

    /// Returns the first value for the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns all values for the key, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Checks whether any pair has the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Checks whether there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns an iterator over the pairs in parse order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.pairs.iter(),
        }
    }

    /// Dictionary-update: for every key of `new`, all existing entries are
    /// replaced in place by the new entries; unseen keys are appended.
    pub(crate) fn update(&self, new: &Query) -> Query {
        let new_keys: HashSet<&str> = new.pairs.iter().map(|(k, _)| k.as_str()).collect();
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut pairs = Vec::with_capacity(self.pairs.len() + new.pairs.len());

        for (key, value) in &self.pairs {
            if new_keys.contains(key.as_str()) {
                if emitted.insert(key.as_str()) {
                    pairs.extend(new.get_all(key).map(|v| (key.clone(), v.to_owned())));
                }
            } else {
                pairs.push((key.clone(), value.clone()));
            }
        }
        for (key, value) in &new.pairs {
            if !emitted.contains(key.as_str()) && !self.contains_key(key) {
                pairs.push((key.clone(), value.clone()));
            }
        }
        Query { pairs }
    }

    /// Appends the pairs of `new` without touching existing entries.
    pub(crate) fn extend(&self, new: &Query) -> Query {
        let mut pairs = self.pairs.clone();
        pairs.extend(new.pairs.iter().cloned());
        Query { pairs }
    }

    /// Removes all entries whose key is in `keys`.
    pub(crate) fn without(&self, keys: &[&str]) -> Query {
        Query {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// An iterator over the pairs of a [`Query`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, String)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Conversion into a raw query string, accepted by the query derivation
/// methods of [`Url`].
///
/// Implemented for whole query strings (`&str`), for slices, arrays and
/// vectors of key-value pairs, for [`Query`] itself, and for `Option`s of
/// these where `None` clears the query.
///
/// [`Url`]: crate::Url
pub trait ToQuery {
    /// Encodes the value into a raw query string; `None` clears.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a value cannot be serialized, e.g. a non-finite
    /// float.
    fn to_query_string(&self) -> Result<Option<String>, Error>;
}

impl ToQuery for str {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        Ok(Some(QUERY_QUOTER.quote_literal(self).into_owned()))
    }
}

impl ToQuery for String {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        self.as_str().to_query_string()
    }
}

impl ToQuery for Query {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        Ok(Some(self.encode()))
    }
}

impl<K: AsRef<str>, V: ToQueryValue> ToQuery for [(K, V)] {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        let mut tokens = Vec::with_capacity(self.len());
        for (key, value) in self {
            value.append_tokens(key.as_ref(), &mut tokens)?;
        }
        Ok(Some(tokens.join("&")))
    }
}

impl<K: AsRef<str>, V: ToQueryValue, const N: usize> ToQuery for [(K, V); N] {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        self[..].to_query_string()
    }
}

impl<K: AsRef<str>, V: ToQueryValue> ToQuery for Vec<(K, V)> {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        self[..].to_query_string()
    }
}

impl<T: ToQuery + ?Sized> ToQuery for &T {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        (**self).to_query_string()
    }
}

impl<T: ToQuery> ToQuery for Option<T> {
    fn to_query_string(&self) -> Result<Option<String>, Error> {
        match self {
            Some(query) => query.to_query_string(),
            None => Ok(None),
        }
    }
}

/// A single query value, or a sequence of values for a repeated key.
///
/// Implemented for strings, the integer primitives and floats; sequences
/// of these emit one `key=value` token per element. There is no
/// implementation for `bool`: booleans have no universal query
/// serialization, so the caller must pick one explicitly.
pub trait ToQueryValue {
    /// Appends encoded `key=value` tokens for this value.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the value cannot be serialized.
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error>;
}

fn push_token(key: &str, value: &str, tokens: &mut Vec<String>) {
    let quoter = QUERY_PART_QUOTER;
    tokens.push(format!("{}={}", quoter.quote_literal(key), quoter.quote_literal(value)));
}

impl ToQueryValue for str {
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
        push_token(key, self, tokens);
        Ok(())
    }
}

impl ToQueryValue for String {
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
        self.as_str().append_tokens(key, tokens)
    }
}

impl<'a> ToQueryValue for Cow<'a, str> {
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
        self.as_ref().append_tokens(key, tokens)
    }
}

macro_rules! impl_to_query_value_int {
    ($($ty:ty)*) => {$(
        impl ToQueryValue for $ty {
            fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
                push_token(key, &self.to_string(), tokens);
                Ok(())
            }
        }
    )*};
}

impl_to_query_value_int!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);

macro_rules! impl_to_query_value_float {
    ($($ty:ty)*) => {$(
        impl ToQueryValue for $ty {
            fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
                if !self.is_finite() {
                    return Err(Error::invalid_argument(format!(
                        "query value for key {key:?} must be finite"
                    )));
                }
                push_token(key, &self.to_string(), tokens);
                Ok(())
            }
        }
    )*};
}

impl_to_query_value_float!(f32 f64);

impl<T: ToQueryValue + ?Sized> ToQueryValue for &T {
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
        (**self).append_tokens(key, tokens)
    }
}

impl<T: ToQueryValue> ToQueryValue for [T] {
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
        for value in self {
            value.append_tokens(key, tokens)?;
        }
        Ok(())
    }
}

impl<T: ToQueryValue, const N: usize> ToQueryValue for [T; N] {
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
        self[..].append_tokens(key, tokens)
    }
}

impl<T: ToQueryValue> ToQueryValue for Vec<T> {
    fn append_tokens(&self, key: &str, tokens: &mut Vec<String>) -> Result<(), Error> {
        self[..].append_tokens(key, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preserves_order_and_duplicates() {
        let q = Query::parse("b=2&a=1&b=3");
        assert_eq!(
            q.iter().collect::<Vec<_>>(),
            [("b", "2"), ("a", "1"), ("b", "3")]
        );
    }

    #[test]
    fn parse_separators_and_blanks() {
        let q = Query::parse("a=1;b=2&&flag");
        assert_eq!(
            q.iter().collect::<Vec<_>>(),
            [("a", "1"), ("b", "2"), ("flag", "")]
        );
    }

    #[test]
    fn parse_decodes_plus_and_escapes() {
        let q = Query::parse("k=a+b&t=2022-03-27T14:05:00%2B03:00");
        assert_eq!(q.get("k"), Some("a b"));
        assert_eq!(q.get("t"), Some("2022-03-27T14:05:00+03:00"));
    }

    #[test]
    fn update_replaces_in_place() {
        let q = Query::parse("a=b&b=1");
        let updated = q.update(&Query::parse("b=2"));
        assert_eq!(updated.iter().collect::<Vec<_>>(), [("a", "b"), ("b", "2")]);
    }

    #[test]
    fn update_appends_new_keys() {
        let q = Query::parse("a=1");
        let updated = q.update(&Query::parse("b=2&c=3"));
        assert_eq!(
            updated.iter().collect::<Vec<_>>(),
            [("a", "1"), ("b", "2"), ("c", "3")]
        );
    }

    #[test]
    fn update_keeps_multiple_new_values() {
        let q = Query::parse("a=1&x=0&a=2");
        let updated = q.update(&Query::parse("a=7&a=8"));
        assert_eq!(
            updated.iter().collect::<Vec<_>>(),
            [("a", "7"), ("a", "8"), ("x", "0")]
        );
    }

    #[test]
    fn sequence_values_repeat_key() {
        let s = [("k", ["a", "b"])].to_query_string().unwrap().unwrap();
        assert_eq!(s, "k=a&k=b");
    }

    #[test]
    fn numeric_values() {
        let s = [("a", 1i64)].to_query_string().unwrap().unwrap();
        assert_eq!(s, "a=1");
        assert!([("a", f64::INFINITY)].to_query_string().is_err());
        assert!([("a", f64::NAN)].to_query_string().is_err());
    }

    #[test]
    fn string_query_escapes_percent() {
        let s = "next=http%3A//example.com/".to_query_string().unwrap().unwrap();
        assert_eq!(s, "next=http%253A//example.com/");
    }
}
