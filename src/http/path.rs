//! URL path translation
//!
//! Maps a request path onto the serving root the way Python's
//! `SimpleHTTPRequestHandler.translate_path` does: percent-decode, then keep
//! only plain path segments. Segments holding a backslash are dropped on
//! Windows only, where the backslash would act as a separator. `..` segments are dropped rather than resolved,
//! so a request can never name a file above the root by path alone. Symlinks
//! inside the root are followed.

use std::path::{Path, PathBuf};

/// A request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPath {
    pub fs_path: PathBuf,
    /// The request path ended with `/`
    pub trailing_slash: bool,
}

/// Translate a URI path (no query string) into a path under `root`
pub fn translate(root: &Path, uri_path: &str) -> TranslatedPath {
    let decoded = percent_decode(uri_path);
    let trailing_slash = decoded.ends_with('/');

    let mut fs_path = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." || is_foreign_separator(segment)
        {
            continue;
        }
        fs_path.push(segment);
    }

    TranslatedPath {
        fs_path,
        trailing_slash,
    }
}

/// Backslash only separates paths on Windows; elsewhere it is a filename byte
#[cfg(windows)]
fn is_foreign_separator(segment: &str) -> bool {
    segment.contains('\\')
}

#[cfg(not(windows))]
const fn is_foreign_separator(_segment: &str) -> bool {
    false
}

/// Decode `%XX` escapes; malformed escapes are kept as-is, invalid UTF-8 is
/// replaced
pub fn percent_decode(input: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(input.as_bytes())).into_owned()
}

/// Percent-encode each `/`-separated segment, keeping the separators
pub fn percent_encode(input: &str) -> String {
    input
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_plain() {
        let t = translate(Path::new("/srv"), "/assets/YBot.fbx");
        assert_eq!(t.fs_path, PathBuf::from("/srv/assets/YBot.fbx"));
        assert!(!t.trailing_slash);
    }

    #[test]
    fn test_translate_root_and_trailing_slash() {
        let t = translate(Path::new("/srv"), "/");
        assert_eq!(t.fs_path, PathBuf::from("/srv"));
        assert!(t.trailing_slash);

        let t = translate(Path::new("/srv"), "/docs/");
        assert_eq!(t.fs_path, PathBuf::from("/srv/docs"));
        assert!(t.trailing_slash);
    }

    #[test]
    fn test_translate_drops_parent_segments() {
        let t = translate(Path::new("/srv"), "/../../etc/passwd");
        assert_eq!(t.fs_path, PathBuf::from("/srv/etc/passwd"));

        let t = translate(Path::new("/srv"), "/a/%2e%2e/%2E%2E/b");
        assert_eq!(t.fs_path, PathBuf::from("/srv/a/b"));

        let t = translate(Path::new("/srv"), "/a/.//./b");
        assert_eq!(t.fs_path, PathBuf::from("/srv/a/b"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_translate_keeps_backslash_in_file_names() {
        let t = translate(Path::new("/srv"), "/docs/a%5Cb.txt");
        assert_eq!(t.fs_path, PathBuf::from("/srv/docs/a\\b.txt"));
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("/my%20file.txt"), "/my file.txt");
        assert_eq!(percent_decode("/caf%C3%A9"), "/café");
        assert_eq!(percent_decode("/100%"), "/100%");
        assert_eq!(percent_decode("/%zz%4"), "/%zz%4");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("my file.txt"), "my%20file.txt");
        assert_eq!(percent_encode("a/b-c_d.e~"), "a/b-c_d.e~");
        assert_eq!(percent_encode("café"), "caf%C3%A9");
        assert_eq!(percent_encode("my docs/a b/"), "my%20docs/a%20b/");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">&'</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;&lt;/a&gt;"
        );
    }
}
