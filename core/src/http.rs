//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The request builder produces `HttpRequest` values and the parser consumes
//! `HttpResponse` values; neither touches the network. `PodcastIndex` in
//! `dispatch.rs` is one host that executes them over reqwest, but any
//! transport can. Every call against the API is a GET without a body, so a
//! request is just a URL plus headers.

/// A signed GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Full URL including the encoded query string, if any.
    pub url: String,
    /// The endpoint path relative to the base URL, e.g. `/episodes/byid`.
    pub endpoint: String,
    /// Encoded query string without the leading `?`. Empty when no
    /// parameter survived encoding.
    pub query: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed to
/// `PodcastIndexClient::parse_response`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Canonical reason phrase for a status code, e.g. `404` → `Not Found`.
pub fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            url: "http://localhost/stats/current".to_string(),
            endpoint: "/stats/current".to_string(),
            query: String::new(),
            headers: vec![("X-Auth-Key".to_string(), "abc".to_string())],
        };
        assert_eq!(req.header("x-auth-key"), Some("abc"));
        assert_eq!(req.header("Authorization"), None);
    }

    #[test]
    fn status_text_uses_canonical_reason() {
        assert_eq!(status_text(404), "Not Found");
        assert_eq!(status_text(500), "Internal Server Error");
        assert_eq!(status_text(599), "Unknown Status");
    }
}
