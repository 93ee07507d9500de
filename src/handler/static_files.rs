//! Static file serving module
//!
//! Maps request paths under the serving root, resolves directory indexes and
//! answers conditional and range requests.

use std::fs::Metadata;
use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::HttpConfig;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, path, response, RangeParseResult, Validators};
use crate::logger;

/// Serve `ctx.path` from `root`
pub async fn serve(
    ctx: &RequestContext<'_>,
    root: &Path,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    let target = path::translate(root, ctx.path);

    // Missing paths are ordinary 404s, not worth a log line
    let Ok(meta) = fs::metadata(&target.fs_path).await else {
        return http::build_404_response(ctx.is_head);
    };

    if meta.is_dir() {
        return serve_directory(ctx, &target.fs_path, target.trailing_slash, http_config).await;
    }

    if target.trailing_slash {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, &target.fs_path, &meta).await
}

async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &Path,
    trailing_slash: bool,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    if !trailing_slash {
        let location = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in &http_config.index_files {
        let index_path = dir.join(index_file);
        if let Ok(meta) = fs::metadata(&index_path).await {
            if meta.is_file() {
                return serve_file(ctx, &index_path, &meta).await;
            }
        }
    }

    if http_config.directory_listing {
        listing::serve_listing(ctx, dir).await
    } else {
        http::build_404_response(ctx.is_head)
    }
}

/// Serve a single file with validators and range support
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    meta: &Metadata,
) -> Response<Full<Bytes>> {
    let data = match fs::read(file_path).await {
        Ok(c) => Bytes::from(c),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response(ctx.is_head);
        }
    };

    let validators = Validators {
        etag: cache::generate_etag(&data),
        last_modified: meta.modified().ok().map(cache::format_http_date),
    };

    if is_not_modified(ctx, &validators, meta) {
        return response::build_304_response(&validators);
    }

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    match http::parse_range_header(ctx.range_header, data.len()) {
        RangeParseResult::Valid(range) => {
            response::build_partial_response(&data, range, content_type, &validators, ctx.is_head)
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(data.len()),
        RangeParseResult::None => {
            response::build_file_response(data, content_type, &validators, ctx.is_head)
        }
    }
}

/// `If-None-Match` wins; `If-Modified-Since` only counts without it
fn is_not_modified(ctx: &RequestContext<'_>, validators: &Validators, meta: &Metadata) -> bool {
    if ctx.if_none_match.is_some() {
        return cache::check_etag_match(ctx.if_none_match, &validators.etag);
    }
    meta.modified()
        .is_ok_and(|modified| cache::not_modified_since(ctx.if_modified_since, modified))
}
