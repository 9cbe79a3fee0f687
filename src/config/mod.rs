// Configuration module entry point
// Loads the server, logging and mount table configuration

mod types;

use std::net::SocketAddr;

use crate::error::{Error, Result};

// Re-export public types
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticsConfig,
};

/// Default configuration file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "pathmount";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `PATHMOUNT__SECTION__KEY` environment variables
    /// override it, and every scalar has a default.
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PATHMOUNT").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "pathmount")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{}:{} ({e})", self.server.host, self.server.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load_from("/nonexistent/pathmount-config").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.http.server_name, "pathmount");
        assert_eq!(config.statics.chunk_size, 4096);
        assert!(!config.statics.gzip);
        assert!(config.statics.files.is_empty());
        assert_eq!(
            config.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_load_statics_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mounts.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090

[statics]
gzip = true
chunk_size = 1024
applications = ["/app"]

[statics.files]
"/robots.txt" = "static/robots.txt"

[statics.directories]
"/static" = "static"

[statics.mountpoints]
"/health" = "health"

[statics.websockets]
"/ws" = "echo"
"#
        )
        .unwrap();

        let stem = path.with_extension("");
        let config = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert!(config.statics.gzip);
        assert_eq!(config.statics.chunk_size, 1024);
        assert_eq!(config.statics.files["/robots.txt"], "static/robots.txt");
        assert_eq!(config.statics.directories["/static"], "static");
        assert_eq!(config.statics.mountpoints["/health"], "health");
        assert_eq!(config.statics.websockets["/ws"], "echo");
        assert_eq!(config.statics.applications, vec!["/app".to_string()]);
    }

    #[test]
    fn test_invalid_address() {
        let mut config = Config::load_from("/nonexistent/pathmount-config").unwrap();
        config.server.host = "not an address".to_string();
        assert!(matches!(config.get_socket_addr(), Err(Error::InvalidAddress(_))));
    }
}
