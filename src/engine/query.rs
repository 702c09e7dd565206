use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

pub const SEARCH_METHOD: &str = "flickr.photos.search";
pub const RECENT_METHOD: &str = "flickr.photos.getRecent";

/// Caller-supplied query parameters, kept in the order they arrived.
///
/// Duplicate names are kept as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters(Vec<(String, String)>);

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keeps only the first occurrence of each allowed key, in `allowed` order.
    pub fn select(&self, allowed: &[&str]) -> Self {
        let pairs = allowed
            .iter()
            .filter_map(|key| self.get(key).map(|v| (key.to_string(), v.to_string())))
            .collect();
        Self(pairs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

struct QueryParametersVisitor;

impl<'de> Visitor<'de> for QueryParametersVisitor {
    type Value = QueryParameters;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of string query parameters")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            pairs.push((key, value));
        }
        Ok(QueryParameters(pairs))
    }
}

impl<'de> Deserialize<'de> for QueryParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(QueryParametersVisitor)
    }
}

/// Builds the upstream search URI.
///
/// Nothing is percent-encoded: keys and values are copied verbatim, so a
/// value holding `&` or `=` changes the meaning of the query string.
pub fn build_search_uri(
    base_url: &str,
    api_key: &str,
    params: Option<&QueryParameters>,
) -> String {
    build_method_uri(base_url, SEARCH_METHOD, api_key, params)
}

pub fn build_method_uri(
    base_url: &str,
    method: &str,
    api_key: &str,
    params: Option<&QueryParameters>,
) -> String {
    let caller = params
        .map(|p| {
            p.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&")
        })
        .unwrap_or_default();
    format!(
        "{}?method={}&api_key={}&format=json&nojsoncallback=1&{}",
        base_url, method, api_key, caller
    )
}

/// Replaces the `api_key` value in a built URI so it can be logged.
pub fn redact_api_key(uri: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return uri.to_string();
    }
    uri.replacen(&format!("api_key={}", api_key), "api_key=[redacted]", 1)
}
