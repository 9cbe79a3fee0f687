//! Prefix matching module
//!
//! Canonical prefix form and the `script_name` / `path_info` rewrite applied
//! on a match.

use crate::request::Request;

/// Canonical mount prefix: `/seg/.../` with both slashes, root as `/`
pub fn normalize_prefix(url: &str) -> String {
    let trimmed = url.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Prefix shown to humans: trailing slash stripped, root kept as `/`
pub fn display_prefix(prefix: &str) -> &str {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// `path_info` in the form compared against prefixes
pub fn probe(path_info: &str) -> String {
    format!("{}/", path_info.trim_end_matches('/'))
}

/// Check if a canonical prefix matches a request path
pub fn match_prefix(prefix: &str, path_info: &str) -> bool {
    probe(path_info).starts_with(prefix)
}

/// Move the matched prefix from `path_info` to `script_name`
///
/// The leading `/` of the residual stays in `path_info`. A trailing `/` of
/// the incoming `script_name` is collapsed.
pub fn rewrite(request: &mut Request, prefix: &str) {
    let consumed = &prefix[..prefix.len() - 1];
    let script_name = format!("{}{consumed}", request.script_name.trim_end_matches('/'));
    let path_info = request.path_info.get(consumed.len()..).unwrap_or_default().to_string();

    request.script_name = script_name;
    request.path_info = path_info;
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Method;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "/");
        assert_eq!(normalize_prefix("/"), "/");
        assert_eq!(normalize_prefix("//"), "/");
        assert_eq!(normalize_prefix("demo"), "/demo/");
        assert_eq!(normalize_prefix("/demo"), "/demo/");
        assert_eq!(normalize_prefix("demo/"), "/demo/");
        assert_eq!(normalize_prefix("/a/b/"), "/a/b/");
    }

    #[test]
    fn test_display_prefix() {
        assert_eq!(display_prefix("/"), "/");
        assert_eq!(display_prefix("/demo/"), "/demo");
    }

    #[test]
    fn test_match_prefix_on_segment_boundary() {
        assert!(match_prefix("/demo/", "/demo"));
        assert!(match_prefix("/demo/", "/demo/"));
        assert!(match_prefix("/demo/", "/demo/x"));
        assert!(!match_prefix("/demo/", "/demoo"));
        assert!(!match_prefix("/demo/", "/x"));
        assert!(!match_prefix("/demo/", ""));
        assert!(match_prefix("/", ""));
        assert!(match_prefix("/", "/anything"));
    }

    #[test]
    fn test_rewrite() {
        let mut request = Request::new(Method::GET, "/demo/x/y");
        request.script_name = "/y/".to_string();
        rewrite(&mut request, "/demo/");
        assert_eq!(request.script_name, "/y/demo");
        assert_eq!(request.path_info, "/x/y");

        let mut request = Request::new(Method::GET, "/x");
        rewrite(&mut request, "/");
        assert_eq!(request.script_name, "");
        assert_eq!(request.path_info, "/x");
    }
}
