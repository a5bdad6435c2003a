//! Normalized request query parameters.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Query parameters keyed by name, iterated in name order.
///
/// When a name repeats in the raw query string the last value wins, so the same
/// mapping drives both filtering and cache-key derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw `application/x-www-form-urlencoded` query string.
    pub fn parse(query: Option<&str>) -> Self {
        let entries = query
            .map(|raw| {
                form_urlencoded::parse(raw.as_bytes())
                    .map(|(name, value)| (name.into_owned(), value.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
