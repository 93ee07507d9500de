//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, the key
//! endpoint, static files, then header policy and access logging.

use crate::config::{AppState, HttpConfig, LoggingConfig};
use crate::handler::{encryption_key, static_files};
use crate::http::{self, cache, cors};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Default)]
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub range_header: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let get = move |name: header::HeaderName| {
            req.headers().get(name).and_then(|v| v.to_str().ok())
        };
        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_none_match: get(header::IF_NONE_MATCH),
            if_modified_since: get(header::IF_MODIFIED_SINCE),
            range_header: get(header::RANGE),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// The body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let mut response = match *req.method() {
        Method::OPTIONS => http::build_preflight_response(),
        Method::GET | Method::HEAD => {
            let ctx = RequestContext::from_request(&req);
            route_request(&ctx, &state).await
        }
        _ => http::build_501_response(req.method()),
    };

    apply_header_policy(&mut response, &state.config.http);

    let logging = &state.config.logging;
    if should_log_access(logging, req.method(), response.status()) {
        log_access(&req, &response, remote_addr, started, &logging.access_log_format);
    }

    Ok(response)
}

/// Key endpoint first, static files second
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    if ctx.path == state.config.key.endpoint {
        return encryption_key::serve(state.encryption_key.as_deref(), ctx.is_head);
    }

    static_files::serve(ctx, Path::new(&state.config.server.root), &state.config.http).await
}

fn apply_header_policy(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = response.headers_mut();
    cors::apply(headers);
    if http_config.no_cache {
        cache::apply_no_cache(headers);
    }
    if let Ok(server) = HeaderValue::from_str(&http_config.server_name) {
        headers.insert(header::SERVER, server);
    }
}

/// `access_log_errors_only` hides successful GETs (2xx and 304)
fn should_log_access(logging: &LoggingConfig, method: &Method, status: StatusCode) -> bool {
    if !logging.access_log {
        return false;
    }
    if logging.access_log_errors_only && method == Method::GET {
        return !(status.is_success() || status == StatusCode::NOT_MODIFIED);
    }
    true
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    remote_addr: SocketAddr,
    started: Instant,
    format: &str,
) {
    let get = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    let bodiless = req.method() == Method::HEAD || response.status() == StatusCode::NOT_MODIFIED;
    entry.body_bytes = if bodiless {
        None
    } else {
        response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    };
    entry.referer = get(header::REFERER);
    entry.user_agent = get(header::USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, format);
}
