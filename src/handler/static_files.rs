//! Static file serving module
//!
//! Path resolution under a served root, precompressed variant selection and
//! conditional response building for single files and directories.

use hyper::header::{self, HeaderValue};
use hyper::{Method, Response, StatusCode};
use std::fmt;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

use crate::error::{Error, Result};
use crate::http::{self, body, cache, mime, Body};
use crate::logger;
use crate::request::Request;

/// Resolve a `/`-separated request path under `root`
///
/// The joined path is normalized lexically before the containment check, so
/// `..` segments can never climb out of the root. The root itself is not a
/// valid result.
pub fn resolve(root: &Path, relative: &str) -> Result<PathBuf> {
    let root = normalize(root);
    let joined = relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.clone(), |path, segment| path.join(segment));
    let resolved = normalize(&joined);

    if resolved.starts_with(&root) && resolved != root {
        Ok(resolved)
    } else {
        Err(Error::not_found(relative))
    }
}

/// Whether the `..` segments of `relative` climb above its start
pub fn climbs_out(relative: &str) -> bool {
    let mut depth = 0usize;
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return true,
            },
            _ => depth += 1,
        }
    }
    false
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// File selected to answer a request
#[derive(Debug)]
pub struct Variant {
    pub path: PathBuf,
    pub metadata: Metadata,
}

impl Variant {
    pub fn is_gzip(&self) -> bool {
        mime::is_gzip(&self.path)
    }

    pub fn modified(&self) -> SystemTime {
        self.metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH)
    }
}

/// Pick the file to serve for `path`
///
/// With `gzip` allowed a regular `<path>.gz` sibling wins; otherwise `path`
/// itself must be a regular file.
pub async fn select_variant(path: &Path, gzip: bool) -> Result<Variant> {
    if gzip {
        let mut compressed = path.as_os_str().to_owned();
        compressed.push(".gz");
        let compressed = PathBuf::from(compressed);

        if let Ok(metadata) = fs::metadata(&compressed).await {
            if metadata.is_file() {
                return Ok(Variant {
                    path: compressed,
                    metadata,
                });
            }
        }
    }

    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => Ok(Variant {
            path: path.to_path_buf(),
            metadata,
        }),
        _ => Err(Error::not_found(path.display().to_string())),
    }
}

/// Serves one fixed file
#[derive(Debug, Clone)]
pub struct FileHandler {
    path: PathBuf,
    gzip: bool,
    chunk_size: usize,
}

impl FileHandler {
    pub fn new(path: impl AsRef<Path>, gzip: bool, chunk_size: usize) -> Self {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self {
            path: normalize(&path),
            gzip,
            chunk_size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn gzip(&self) -> bool {
        self.gzip
    }

    /// Mounted entry point: the mount must have consumed the whole path
    pub async fn invoke(&self, request: &Request) -> Response<Body> {
        if request.path_info.is_empty() || request.path_info == "/" {
            self.generate_response(request).await
        } else {
            http::build_404_response(Some(&request.path_info))
        }
    }

    /// Build the response for this file
    ///
    /// Metadata is read on every call. The file is only opened when a body is
    /// actually sent: 304 and HEAD answers never touch its content.
    pub async fn generate_response(&self, request: &Request) -> Response<Body> {
        let variant = match select_variant(&self.path, self.gzip).await {
            Ok(variant) => variant,
            Err(_) => return http::build_404_response(Some(&request.path_info)),
        };

        let modified = variant.modified();
        let etag = cache::generate_etag(modified, variant.metadata.len(), &variant.path);
        let last_modified = cache::format_http_date(modified);

        let conditional = request.method == Method::GET || request.method == Method::HEAD;
        if conditional
            && cache::is_not_modified(
                request.header(header::IF_NONE_MATCH),
                request.header(header::IF_MODIFIED_SINCE),
                &etag,
                modified,
            )
        {
            return http::build_304_response(&etag, &last_modified);
        }

        let content = if request.method == Method::HEAD {
            body::empty()
        } else {
            match fs::File::open(&variant.path).await {
                Ok(file) => body::file_stream(file, self.chunk_size),
                Err(e) => {
                    logger::log_error(&format!(
                        "Failed to open file '{}': {e}",
                        variant.path.display()
                    ));
                    return http::build_404_response(Some(&request.path_info));
                }
            }
        };

        let mut response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime::content_type_for(&variant.path))
            .header(header::CONTENT_LENGTH, variant.metadata.len())
            .header(header::LAST_MODIFIED, last_modified)
            .header(header::ETAG, etag)
            .body(content)
            .unwrap_or_else(|e| {
                logger::log_error(&format!("Failed to build file response: {e}"));
                Response::new(body::empty())
            });

        if variant.is_gzip() {
            response
                .headers_mut()
                .insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        }

        response
    }
}

impl fmt::Display for FileHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Serves files below a root directory
#[derive(Debug, Clone)]
pub struct DirectoryHandler {
    root: PathBuf,
    gzip: bool,
    chunk_size: usize,
}

impl DirectoryHandler {
    pub fn new(root: impl AsRef<Path>, gzip: bool, chunk_size: usize) -> Self {
        let root = root.as_ref();
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            root: normalize(&root),
            gzip,
            chunk_size,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn gzip(&self) -> bool {
        self.gzip
    }

    /// Map the residual `path_info` to a file and serve it
    pub async fn invoke(&self, request: &Request) -> Response<Body> {
        match resolve(&self.root, &request.path_info) {
            Ok(path) => {
                FileHandler {
                    path,
                    gzip: self.gzip,
                    chunk_size: self.chunk_size,
                }
                .generate_response(request)
                .await
            }
            Err(_) => {
                let escape = climbs_out(&request.path_info);
                logger::log_path_rejected(&self.root, &request.path_info, escape);
                http::build_404_response(Some(&request.path_info))
            }
        }
    }
}

impl fmt::Display for DirectoryHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        response.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[test]
    fn test_resolve_inside_root() {
        let root = Path::new("/srv/static");
        assert_eq!(resolve(root, "/a/b.txt").unwrap(), Path::new("/srv/static/a/b.txt"));
        assert_eq!(resolve(root, "/a/./b.txt").unwrap(), Path::new("/srv/static/a/b.txt"));
        assert_eq!(resolve(root, "/a/../b.txt").unwrap(), Path::new("/srv/static/b.txt"));
        assert_eq!(resolve(root, "//a//b.txt").unwrap(), Path::new("/srv/static/a/b.txt"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let root = Path::new("/srv/static");
        for attempt in [
            "/../secret",
            "/../../etc/passwd",
            "/a/../../secret",
            "/../static-other/x",
            "/..",
            "",
            "/",
            "/a/..",
        ] {
            assert!(
                matches!(resolve(root, attempt), Err(Error::NotFound { .. })),
                "{attempt} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_never_leaves_root() {
        let root = Path::new("/srv/static");
        let segments = ["..", ".", "a", "b", ""];
        for a in segments {
            for b in segments {
                for c in segments {
                    let relative = format!("/{a}/{b}/{c}");
                    if let Ok(path) = resolve(root, &relative) {
                        assert!(path.starts_with(root), "{relative} -> {}", path.display());
                    }
                }
            }
        }
    }

    #[test]
    fn test_root_request_is_not_an_escape() {
        for path_info in ["", "/", "/.", "/a/..", "/a/b/../../"] {
            assert!(!climbs_out(path_info), "{path_info}");
        }
        for path_info in ["/..", "/../etc/passwd", "/a/../../b", "/./../x"] {
            assert!(climbs_out(path_info), "{path_info}");
        }
    }

    #[tokio::test]
    async fn test_serves_file_with_validators() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "hello.txt", b"hello world");
        let handler = FileHandler::new(&path, false, 4);

        let response = handler.invoke(&Request::new(Method::GET, "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "11");
        assert!(response.headers().contains_key(header::ETAG));
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
        assert!(!response.headers().contains_key(header::CONTENT_ENCODING));
        assert_eq!(body_bytes(response).await, b"hello world");
    }

    #[tokio::test]
    async fn test_conditional_not_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "app.js", b"console.log(1)");
        let handler = FileHandler::new(&path, false, 4096);

        let first = handler.invoke(&Request::new(Method::GET, "/")).await;
        let etag = first.headers()[header::ETAG].to_str().unwrap().to_string();
        let last_modified = first.headers()[header::LAST_MODIFIED]
            .to_str()
            .unwrap()
            .to_string();

        let mut request = Request::new(Method::GET, "/");
        request
            .headers
            .insert(header::IF_NONE_MATCH, etag.parse().unwrap());
        let second = handler.invoke(&request).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(second.headers()[header::ETAG], etag.as_str());
        assert!(body_bytes(second).await.is_empty());

        let mut request = Request::new(Method::GET, "/");
        request
            .headers
            .insert(header::IF_MODIFIED_SINCE, last_modified.parse().unwrap());
        let third = handler.invoke(&request).await;
        assert_eq!(third.status(), StatusCode::NOT_MODIFIED);

        let mut request = Request::new(Method::GET, "/");
        request
            .headers
            .insert(header::IF_NONE_MATCH, "\"stale\"".parse().unwrap());
        request
            .headers
            .insert(header::IF_MODIFIED_SINCE, last_modified.parse().unwrap());
        let fourth = handler.invoke(&request).await;
        assert_eq!(fourth.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_head_has_headers_without_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "page.html", b"<p>hi</p>");
        let handler = FileHandler::new(&path, false, 4096);

        let response = handler.invoke(&Request::new(Method::HEAD, "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "9");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_gzip_variant_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "f.txt", b"plain");
        write(dir.path(), "f.txt.gz", b"\x1f\x8bcompressed");

        let gzipped = FileHandler::new(&path, true, 4096)
            .invoke(&Request::new(Method::GET, ""))
            .await;
        assert_eq!(gzipped.headers()[header::CONTENT_ENCODING], "gzip");
        assert_eq!(
            gzipped.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_bytes(gzipped).await, b"\x1f\x8bcompressed");

        let plain = FileHandler::new(&path, false, 4096)
            .invoke(&Request::new(Method::GET, ""))
            .await;
        assert!(!plain.headers().contains_key(header::CONTENT_ENCODING));
        assert_eq!(body_bytes(plain).await, b"plain");
    }

    #[tokio::test]
    async fn test_file_mount_rejects_deeper_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "robots.txt", b"User-agent: *");
        let handler = FileHandler::new(&path, false, 4096);

        let response = handler.invoke(&Request::new(Method::GET, "/extra")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let handler = FileHandler::new(dir.path().join("gone.txt"), true, 4096);

        let response = handler.invoke(&Request::new(Method::GET, "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_serves_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        write(&dir.path().join("css"), "site.css", b"body{}");
        let handler = DirectoryHandler::new(dir.path(), false, 4096);

        let response = handler.invoke(&Request::new(Method::GET, "/css/site.css")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(body_bytes(response).await, b"body{}");
    }

    #[tokio::test]
    async fn test_directory_never_lists_or_escapes() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("public");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        write(parent.path(), "secret.txt", b"top secret");
        let handler = DirectoryHandler::new(&root, false, 4096);

        for path in ["/", "/sub", "/../secret.txt", "/sub/../../secret.txt"] {
            let response = handler.invoke(&Request::new(Method::GET, path)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }
}
