//! Ordered multi-value map used for headers and query parameters.
//!
//! Keys keep their first-insertion order and each key holds an ordered list of
//! values. Header maps match keys case-insensitively, parameter maps match
//! them exactly.

use url::form_urlencoded;

/// An ordered multimap of string keys to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiMap {
    case_insensitive: bool,
    entries: Vec<(String, Vec<String>)>,
}

impl MultiMap {
    /// Creates an empty map with exact key matching (query parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with ASCII case-insensitive key matching (headers).
    pub fn case_insensitive() -> Self {
        Self {
            case_insensitive: true,
            entries: Vec::new(),
        }
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    pub fn from_query(query: &str) -> Self {
        let mut map = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            map.add(key, value);
        }
        map
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| {
            if self.case_insensitive {
                k.eq_ignore_ascii_case(key)
            } else {
                k == key
            }
        })
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key)
            .and_then(|i| self.entries[i].1.first())
            .map(String::as_str)
    }

    /// Returns every value for `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        match self.position(key) {
            Some(i) => &self.entries[i].1,
            None => &[],
        }
    }

    /// Returns true if `key` has at least one value.
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Replaces all values for `key` with `value`, keeping the key's position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = vec![value],
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Appends `value` to the values for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Removes `key` and all its values. Returns false if it was absent.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Every `(key, value)` pair, keys in insertion order, values in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Encodes the map as an `application/x-www-form-urlencoded` string.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_appends_values_in_order() {
        let mut params = MultiMap::new();
        params.add("k", "v");
        params.add("k1", "v1");
        params.add("k1", "v11");
        assert_eq!(params.get("k1"), Some("v1"));
        assert_eq!(params.get_all("k1"), ["v1", "v11"]);
        assert_eq!(params.to_query(), "k=v&k1=v1&k1=v11");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = MultiMap::from_query("a=1&b=2&b=3&c=4");
        params.set("b", "x");
        assert_eq!(params.to_query(), "a=1&b=x&c=4");
    }

    #[test]
    fn test_delete_missing_key_is_noop() {
        let mut params = MultiMap::from_query("a=1");
        assert!(!params.delete("missing"));
        assert!(params.delete("a"));
        assert!(params.is_empty());
        assert_eq!(params.to_query(), "");
    }

    #[test]
    fn test_params_are_case_sensitive() {
        let mut params = MultiMap::new();
        params.add("Key", "1");
        params.add("key", "2");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("KEY"), None);
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut headers = MultiMap::case_insensitive();
        headers.add("Content-Type", "text/plain");
        headers.add("content-type", "text/html");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(headers.get_all("Content-type").len(), 2);
        // first spelling is kept
        assert_eq!(headers.keys().collect::<Vec<_>>(), ["Content-Type"]);
        assert!(headers.delete("CONTENT-TYPE"));
        assert!(!headers.contains("content-type"));
    }

    #[test]
    fn test_query_encoding_escapes() {
        let mut params = MultiMap::new();
        params.add("q", "a b&c");
        assert_eq!(params.to_query(), "q=a+b%26c");
        let parsed = MultiMap::from_query(&params.to_query());
        assert_eq!(parsed.get("q"), Some("a b&c"));
    }
}
