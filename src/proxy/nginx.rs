//! nginx `location` blocks

use std::fmt::Write;
use std::path::Path;

use super::ProxyDirectiveBuilder;

/// Where proxied locations are forwarded to
#[derive(Debug, Clone)]
pub struct NginxContext {
    /// e.g. `http://127.0.0.1:8080`
    pub upstream: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NginxDirectives;

impl NginxDirectives {
    fn location(matcher: &str, body: &[String]) -> String {
        let mut block = format!("location {matcher} {{\n");
        for line in body {
            let _ = writeln!(block, "    {line};");
        }
        block.push('}');
        block
    }

    fn with_slash(url: &str) -> String {
        if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        }
    }
}

impl ProxyDirectiveBuilder for NginxDirectives {
    type Context = NginxContext;
    type Directive = String;

    fn file_directives(
        &self,
        _context: &NginxContext,
        url: &str,
        path: &Path,
        gzip: bool,
    ) -> Vec<String> {
        let mut body = vec![format!("alias {}", path.display())];
        if gzip {
            body.push("gzip_static on".to_string());
        }
        vec![Self::location(&format!("= {url}"), &body)]
    }

    fn dir_directives(
        &self,
        _context: &NginxContext,
        url: &str,
        root: &Path,
        gzip: bool,
    ) -> Vec<String> {
        let root = Self::with_slash(&root.display().to_string());
        let mut body = vec![format!("alias {root}")];
        if gzip {
            body.push("gzip_static on".to_string());
        }
        vec![Self::location(&Self::with_slash(url), &body)]
    }

    fn app_directives(&self, context: &NginxContext, url: &str) -> Vec<String> {
        let body = [
            format!("proxy_pass {}", context.upstream),
            "proxy_set_header Host $host".to_string(),
            "proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for".to_string(),
        ];
        vec![Self::location(url, &body)]
    }

    fn ws_directives(&self, context: &NginxContext, url: &str) -> Vec<String> {
        let body = [
            format!("proxy_pass {}", context.upstream),
            "proxy_http_version 1.1".to_string(),
            "proxy_set_header Upgrade $http_upgrade".to_string(),
            "proxy_set_header Connection \"upgrade\"".to_string(),
        ];
        vec![Self::location(&format!("= {url}"), &body)]
    }
}
