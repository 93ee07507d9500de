//! HTTP protocol layer module
//!
//! Header policy, content types, cache validators, range parsing, path
//! translation and response builders. Nothing here knows about the key
//! endpoint or the serving root.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod path;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{
    build_404_response, build_416_response, build_501_response, build_preflight_response,
    build_redirect_response, Validators,
};
