//! HTTP Range request parsing module
//!
//! Single `bytes=` ranges only (RFC 7233 section 2.1). Anything else is
//! ignored and the full body is served.

/// Inclusive byte range resolved against a known body size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn content_length(&self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` value, e.g. `bytes 0-99/1000`
    pub fn content_range(&self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    Valid(ByteRange),
    /// Respond 416
    NotSatisfiable,
    /// No header or one we do not handle; respond with the full body
    None,
}

/// Parse a `Range` header against a body of `size` bytes
///
/// # Examples
/// ```
/// use devserve::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// assert_eq!(
///     parse_range_header(Some("bytes=-10"), 100),
///     RangeParseResult::Valid(ByteRange { start: 90, end: 99 })
/// );
/// assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, size: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    if spec.contains(',') {
        return RangeParseResult::None;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // Suffix form: last N bytes
        return match last.parse::<usize>() {
            Ok(0) => RangeParseResult::NotSatisfiable,
            Ok(_) if size == 0 => RangeParseResult::NotSatisfiable,
            Ok(n) => RangeParseResult::Valid(ByteRange {
                start: size.saturating_sub(n),
                end: size - 1,
            }),
            Err(_) => RangeParseResult::None,
        };
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeParseResult::None;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<usize>() {
            Ok(e) => Some(e),
            Err(_) => return RangeParseResult::None,
        }
    };

    if end.is_some_and(|e| e < start) {
        // Syntactically invalid per RFC 7233; ignore the header
        return RangeParseResult::None;
    }
    if start >= size {
        return RangeParseResult::NotSatisfiable;
    }

    let end = end.map_or(size - 1, |e| e.min(size - 1));
    RangeParseResult::Valid(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(start: usize, end: usize) -> RangeParseResult {
        RangeParseResult::Valid(ByteRange { start, end })
    }

    #[test]
    fn test_closed_and_open_ranges() {
        assert_eq!(parse_range_header(Some("bytes=0-4"), 100), valid(0, 4));
        assert_eq!(parse_range_header(Some("bytes=50-"), 100), valid(50, 99));
        assert_eq!(parse_range_header(Some("bytes=90-500"), 100), valid(90, 99));
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(parse_range_header(Some("bytes=-20"), 100), valid(80, 99));
        assert_eq!(parse_range_header(Some("bytes=-500"), 100), valid(0, 99));
        assert_eq!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=100-"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-"), 0),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_ignored_headers() {
        for header in ["items=0-1", "bytes=a-b", "bytes=0-9,20-29", "bytes=9-3", "bytes=5"] {
            assert_eq!(
                parse_range_header(Some(header), 100),
                RangeParseResult::None,
                "{header}"
            );
        }
    }

    #[test]
    fn test_content_range() {
        let range = ByteRange { start: 10, end: 19 };
        assert_eq!(range.content_length(), 10);
        assert_eq!(range.content_range(50), "bytes 10-19/50");
    }
}
