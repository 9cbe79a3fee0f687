//! Content-Type lookup for served files

use std::path::Path;

/// Types served with an explicit utf-8 charset
const UTF8_TEXT: &[&str] = &["text/html", "text/plain"];

/// Whether the file name carries the gzip suffix
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Content type of a file on disk, guessed from its extension
///
/// A `.gz` suffix is a content encoding, not a type: `app.js.gz` is typed
/// from `app.js`. Unknown extensions are `application/octet-stream`.
///
/// ```
/// use std::path::Path;
/// use pathmount::http::mime::content_type_for;
/// assert_eq!(content_type_for(Path::new("index.HTML")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("font.woff2")), "font/woff2");
/// ```
pub fn content_type_for(path: &Path) -> String {
    let typed = if is_gzip(path) {
        path.file_stem().map_or(Path::new(""), Path::new)
    } else {
        path
    };

    let guessed = mime_guess::from_path(typed).first_or_octet_stream();
    let essence = guessed.essence_str();
    if UTF8_TEXT.contains(&essence) {
        format!("{essence}; charset=utf-8")
    } else {
        essence.to_string()
    }
}
