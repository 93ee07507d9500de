//! Cross-origin header policy
//!
//! Every response leaves the server with the same CORS, COOP and COEP
//! headers. The COOP/COEP pair makes pages served from here cross-origin
//! isolated, which browsers require for `SharedArrayBuffer`.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Origin, Content-Type, Accept, Range";
pub const OPENER_POLICY: &str = "same-origin";
pub const EMBEDDER_POLICY: &str = "require-corp";

const POLICY: [(&str, &str); 5] = [
    ("access-control-allow-origin", ALLOW_ORIGIN),
    ("access-control-allow-methods", ALLOW_METHODS),
    ("access-control-allow-headers", ALLOW_HEADERS),
    ("cross-origin-opener-policy", OPENER_POLICY),
    ("cross-origin-embedder-policy", EMBEDDER_POLICY),
];

/// Insert the policy headers, replacing any existing values
pub fn apply(headers: &mut HeaderMap) {
    for (name, value) in POLICY {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

#[cfg(test)]
pub(crate) fn assert_policy(headers: &HeaderMap) {
    for (name, value) in POLICY {
        assert_eq!(
            headers.get(name).and_then(|v| v.to_str().ok()),
            Some(value),
            "header {name}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_all_headers() {
        let mut headers = HeaderMap::new();
        apply(&mut headers);
        assert_eq!(headers.len(), 5);
        assert_policy(&headers);
    }

    #[test]
    fn test_apply_overrides_existing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "access-control-allow-origin",
            HeaderValue::from_static("https://example.com"),
        );
        apply(&mut headers);
        assert_eq!(headers.get_all("access-control-allow-origin").iter().count(), 1);
        assert_policy(&headers);
    }
}
