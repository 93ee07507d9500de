//! Directory listing
//!
//! HTML index for directories without an index file.

use std::fmt::Write;
use std::io;
use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::path::{escape_html, percent_decode, percent_encode};
use crate::http::response;
use crate::logger;

struct Entry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

pub async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    match render_listing(dir, ctx.path).await {
        Ok(html) => response::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_debug(&format!("Cannot list '{}': {e}", dir.display()));
            response::build_text_response(
                StatusCode::NOT_FOUND,
                "No permission to list directory",
                ctx.is_head,
            )
        }
    }
}

/// Render the listing page for `dir`, requested as `request_path`
pub async fn render_listing(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Follow symlinks so linked directories still get a trailing slash
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }
    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = format!(
        "Directory listing for {}",
        escape_html(&percent_decode(request_path))
    );

    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for entry in &entries {
        let (link, display) = if entry.is_dir {
            (format!("{}/", entry.name), format!("{}/", entry.name))
        } else if entry.is_symlink {
            (entry.name.clone(), format!("{}@", entry.name))
        } else {
            (entry.name.clone(), entry.name.clone())
        };
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape_html(&percent_encode(&link)),
            escape_html(&display)
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Ok(html)
}
