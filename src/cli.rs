//! Command line interface
//!
//! `serve` runs the server; `mountpoints` and `proxy-directives` build the
//! mount table from the configuration and print it.

use clap::{Parser, Subcommand};
use std::fmt::Write;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::routing::MountTable;

#[derive(Debug, Parser)]
#[command(name = "pathmount")]
#[command(about = "Longest-prefix request dispatch and static file server", long_about = None)]
pub struct Cli {
    /// Configuration file, without extension
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the configured mounts (default)
    Serve,
    /// Display URL mountpoints
    Mountpoints {
        /// Display the mountpoints for the given URLs
        #[arg(short, long = "url", value_name = "URL")]
        urls: Vec<String>,
    },
    /// Print nginx location blocks for the configured mounts
    ProxyDirectives {
        /// Address proxied locations are forwarded to
        #[arg(long, default_value = "http://127.0.0.1:8080")]
        upstream: String,
    },
}

/// Render the mountpoint listing
///
/// Without `urls`: a titled table of `url -> handler` rows, `<empty>` when
/// nothing is mounted. With `urls`: only the handler descriptions of the
/// requested mounts, one per line, in the order asked.
pub fn render_mountpoints(table: &MountTable, urls: &[String]) -> String {
    let mut out = String::new();
    let mountpoints = table.mountpoints();

    if urls.is_empty() {
        out.push_str("Mountpoints\n-----------\n\n");
        if mountpoints.is_empty() {
            out.push_str("<empty>\n");
        }
    }

    // column width comes from every mount, filtered or not
    let width = mountpoints.iter().map(|(url, _)| url.len()).max().unwrap_or(0);

    if urls.is_empty() {
        for (url, handler) in &mountpoints {
            let _ = writeln!(out, "{url:width$} -> {handler}");
        }
    } else {
        let urls: Vec<&str> = urls.iter().map(String::as_str).collect();
        for (_, handler) in table.mountpoints_for(&urls) {
            let _ = writeln!(out, "{handler}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["pathmount"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);

        let cli = Cli::parse_from(["pathmount", "-c", "site", "mountpoints", "-u", "/a", "--url", "/b"]);
        assert_eq!(cli.config, "site");
        match cli.command {
            Some(Commands::Mountpoints { urls }) => assert_eq!(urls, vec!["/a", "/b"]),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["pathmount", "proxy-directives", "--upstream", "http://app:9000"]);
        assert!(matches!(
            cli.command,
            Some(Commands::ProxyDirectives { ref upstream }) if upstream == "http://app:9000"
        ));
    }

    #[test]
    fn test_render_empty() {
        let table = MountTable::new();
        assert_eq!(
            render_mountpoints(&table, &[]),
            "Mountpoints\n-----------\n\n<empty>\n"
        );
        assert_eq!(render_mountpoints(&table, &["/a".to_string()]), "");
    }

    #[test]
    fn test_render_table() {
        let mut table = MountTable::new();
        table.register_application("/").unwrap();
        table.register_application("/admin").unwrap();
        table.register_websocket("/ws", |_, _| {}).unwrap();

        assert_eq!(
            render_mountpoints(&table, &[]),
            "Mountpoints\n-----------\n\n\
             /      -> <application>\n\
             /admin -> <application>\n\
             /ws    -> <websocket>\n"
        );
    }

    #[test]
    fn test_render_filtered() {
        let mut table = MountTable::new();
        table.register_application("/").unwrap();
        table.register_websocket("/ws", |_, _| {}).unwrap();

        let urls = vec!["/ws".to_string(), "/nope".to_string(), "/".to_string()];
        assert_eq!(
            render_mountpoints(&table, &urls),
            "<websocket>\n<application>\n"
        );
    }
}
