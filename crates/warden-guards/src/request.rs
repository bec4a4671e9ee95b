//! Transport-neutral view of an incoming request

use std::collections::HashMap;

/// The parts of a request the gate reads.
pub trait RequestParts {
    /// Header value; names are matched case-insensitively.
    fn header(&self, name: &str) -> Option<&str>;

    /// Query parameter value; names are matched exactly.
    fn query_param(&self, name: &str) -> Option<&str>;
}

/// Owned request head built by a transport adapter or a test.
#[derive(Debug, Clone, Default)]
pub struct RequestHead {
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
}

impl RequestHead {
    /// Request without headers or query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Add a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_query(name, value);
        self
    }

    /// Set a header in place.
    pub fn insert_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Set a query parameter in place.
    pub fn insert_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.insert(name.into(), value.into());
    }
}

impl RequestParts for RequestHead {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = RequestHead::new().with_header("Authorization", "abc");
        assert_eq!(request.header("authorization"), Some("abc"));
        assert_eq!(request.header("AUTHORIZATION"), Some("abc"));
    }

    #[test]
    fn test_query_lookup_is_exact() {
        let request = RequestHead::new().with_query("Authorization", "abc");
        assert_eq!(request.query_param("Authorization"), Some("abc"));
        assert_eq!(request.query_param("authorization"), None);
    }
}
