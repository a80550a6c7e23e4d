//! URL query-string state
//!
//! List views keep their page/filter/sort state in the query string rather
//! than in local fields. Controls produce a new `QueryParams` through
//! [`update_params`], so replaying the same URL reproduces the same view.

use std::fmt;

/// Ordered, de-duplicated query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parse `a=1&b=two%20words`. A leading `?` is ignored, later duplicates win.
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        let query = query.trim().trim_start_matches('?');

        for part in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = match part.split_once('=') {
                Some((k, v)) => (k, v),
                None => (part, ""),
            };
            let key = decode(key);
            if key.is_empty() {
                continue;
            }
            params.set(key, decode(value));
        }

        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a key, keeping its original position if it already exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(pos).1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render back to a query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// Merge `updates` into `current`.
///
/// A non-empty value sets the key, an empty (or whitespace-only) value deletes
/// it, and keys not mentioned in `updates` are left untouched.
pub fn update_params<K, V>(current: &QueryParams, updates: impl IntoIterator<Item = (K, V)>) -> QueryParams
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut next = current.clone();
    for (key, value) in updates {
        let key = key.as_ref();
        let value = value.as_ref();
        if value.trim().is_empty() {
            next.remove(key);
        } else {
            next.set(key, value);
        }
    }
    next
}

fn decode(raw: &str) -> String {
    // `+` is a space in form encoding; urlencoding only handles `%XX`
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_params_merge_or_delete() {
        let current: QueryParams = [("a", "1"), ("b", "2")].into_iter().collect();
        let next = update_params(&current, [("b", ""), ("c", "3")]);

        assert_eq!(next.get("a"), Some("1"));
        assert_eq!(next.get("b"), None);
        assert_eq!(next.get("c"), Some("3"));
        assert_eq!(next.len(), 2);
        // input is not mutated
        assert_eq!(current.get("b"), Some("2"));
    }

    #[test]
    fn test_update_params_overwrites_in_place() {
        let current = QueryParams::parse("pageNumber=2&sortBy=asc");
        let next = update_params(&current, [("pageNumber", "3")]);
        assert_eq!(next.to_query_string(), "pageNumber=3&sortBy=asc");
    }

    #[test]
    fn test_whitespace_value_deletes() {
        let current = QueryParams::parse("filterQuery=math");
        let next = update_params(&current, [("filterQuery", "  ")]);
        assert!(next.is_empty());
    }

    #[test]
    fn test_parse_decodes_values() {
        let params = QueryParams::parse("?filterOn=title&filterQuery=hello%20world&search=a+b&flag");
        assert_eq!(params.get("filterQuery"), Some("hello world"));
        assert_eq!(params.get("search"), Some("a b"));
        assert_eq!(params.get("flag"), Some(""));
    }

    #[test]
    fn test_round_trip_encoding() {
        let params: QueryParams = [("filterQuery", "a&b=c")].into_iter().collect();
        let rendered = params.to_query_string();
        assert_eq!(rendered, "filterQuery=a%26b%3Dc");
        assert_eq!(QueryParams::parse(&rendered), params);
    }
}
