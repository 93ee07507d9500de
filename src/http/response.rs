//! HTTP response building module
//!
//! Builders for each status the server produces. Header policy (CORS,
//! no-cache) is applied later by the router, not here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use super::range::ByteRange;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const FILE_CACHE_CONTROL: &str = "no-cache";

/// Cache validators of a served file
#[derive(Debug, Clone)]
pub struct Validators {
    pub etag: String,
    pub last_modified: Option<String>,
}

impl Validators {
    fn apply(&self, mut builder: Builder) -> Builder {
        builder = builder.header(header::ETAG, &self.etag);
        if let Some(ref lm) = self.last_modified {
            builder = builder.header(header::LAST_MODIFIED, lm);
        }
        builder
    }
}

/// Build 200 preflight response with an empty body
pub fn build_preflight_response() -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, 0),
        Bytes::new(),
        "OPTIONS",
    )
}

/// Build 200 JSON response
pub fn build_json_response(body: String, is_head: bool) -> Response<Full<Bytes>> {
    sized(StatusCode::OK, "application/json", Bytes::from(body), is_head)
}

/// Build a plain-text response with the given status
pub fn build_text_response(
    status: StatusCode,
    text: &'static str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    sized(status, TEXT_PLAIN, Bytes::from_static(text.as_bytes()), is_head)
}

/// Build 404 Not Found response
pub fn build_404_response(is_head: bool) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 File not found", is_head)
}

/// Build 501 response for methods the server does not implement
pub fn build_501_response(method: &hyper::Method) -> Response<Full<Bytes>> {
    let text = format!("Unsupported method ('{method}')");
    sized(StatusCode::NOT_IMPLEMENTED, TEXT_PLAIN, Bytes::from(text), false)
}

/// Build 301 redirect, used to add the trailing slash to directory URLs
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(StatusCode::MOVED_PERMANENTLY)
            .header(header::LOCATION, location)
            .header(header::CONTENT_LENGTH, 0),
        Bytes::new(),
        "301",
    )
}

/// Build 304 Not Modified response
pub fn build_304_response(validators: &Validators) -> Response<Full<Bytes>> {
    let builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(header::CACHE_CONTROL, FILE_CACHE_CONTROL);
    finish(validators.apply(builder), Bytes::new(), "304")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    let body = Bytes::from_static(b"Range Not Satisfiable");
    finish(
        Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_TYPE, TEXT_PLAIN)
            .header(header::CONTENT_LENGTH, body.len())
            .header(header::CONTENT_RANGE, format!("bytes */{file_size}")),
        body,
        "416",
    )
}

/// Build HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    sized(
        StatusCode::OK,
        "text/html; charset=utf-8",
        Bytes::from(content),
        is_head,
    )
}

/// Build 200 response for a whole file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    validators: &Validators,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, FILE_CACHE_CONTROL);
    finish(validators.apply(builder), body, "200")
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    data: &Bytes,
    range: ByteRange,
    content_type: &str,
    validators: &Validators,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        data.slice(range.start..=range.end)
    };

    let builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, range.content_length())
        .header(header::CONTENT_RANGE, range.content_range(data.len()))
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CACHE_CONTROL, FILE_CACHE_CONTROL);
    finish(validators.apply(builder), body, "206")
}

/// Response with `Content-Type` and `Content-Length`; HEAD keeps the length but drops the body
fn sized(
    status: StatusCode,
    content_type: &str,
    body: Bytes,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = body.len();
    let body = if is_head { Bytes::new() } else { body };
    finish(
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, content_length),
        body,
        status.as_str(),
    )
}

fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {label} response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn validators() -> Validators {
        Validators {
            etag: "\"abc\"".to_string(),
            last_modified: Some("Sun, 06 Nov 1994 08:49:37 GMT".to_string()),
        }
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_json_response("{\"key\": \"k\"}".to_string(), true);
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "12");
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_response() {
        let data = Bytes::from_static(b"0123456789");
        let range = ByteRange { start: 2, end: 5 };
        let resp = build_partial_response(&data, range, "text/plain", &validators(), false);
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[header::CONTENT_RANGE], "bytes 2-5/10");
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "4");
        assert_eq!(body_of(resp).await, Bytes::from_static(b"2345"));
    }

    #[tokio::test]
    async fn test_501_names_method() {
        let resp = build_501_response(&hyper::Method::DELETE);
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body_of(resp).await, "Unsupported method ('DELETE')");
    }

    #[test]
    fn test_304_carries_validators() {
        let resp = build_304_response(&validators());
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()[header::ETAG], "\"abc\"");
        assert_eq!(
            resp.headers()[header::LAST_MODIFIED],
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn test_redirect() {
        let resp = build_redirect_response("/docs/");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[header::LOCATION], "/docs/");
    }
}
