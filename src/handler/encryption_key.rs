//! Encryption key endpoint
//!
//! Serves the key resolved at startup as `{"key": "<value>"}`. The body is
//! byte-for-byte what Python's `json.dumps` produces: `": "` and `", "`
//! separators and non-ASCII escaped as `\uXXXX`.

use std::io::{self, Write};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::ser::Formatter;

use crate::http::response;
use crate::logger;

pub const NOT_CONFIGURED: &str = "Encryption key not configured";

#[derive(Serialize)]
struct KeyBody<'a> {
    key: &'a str,
}

/// JSON formatter matching Python's default `json.dumps` output
struct PythonJsonFormatter;

impl Formatter for PythonJsonFormatter {
    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            for unit in c.encode_utf16(&mut [0u16; 2]) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Render the JSON body for `key`
pub fn render_body(key: &str) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PythonJsonFormatter);
    KeyBody { key }.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Answer a GET/HEAD on the key endpoint
pub fn serve(key: Option<&str>, is_head: bool) -> Response<Full<Bytes>> {
    let Some(key) = key else {
        return response::build_text_response(StatusCode::NOT_FOUND, NOT_CONFIGURED, is_head);
    };

    match render_body(key) {
        Ok(body) => response::build_json_response(body, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to encode encryption key: {e}"));
            response::build_text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "500 Internal Server Error",
                is_head,
            )
        }
    }
}
