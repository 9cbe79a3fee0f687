use clap::Parser;

use pathmount::builtins::{self, Registry};
use pathmount::cli::{render_mountpoints, Cli, Commands};
use pathmount::config::Config;
use pathmount::proxy::{NginxContext, NginxDirectives};
use pathmount::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;
    logger::init(&cfg.logging)?;

    let table = builtins::build_mount_table(&cfg.statics, &Registry::with_builtins())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            // Build the Tokio runtime, sizing worker threads from config
            let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
            runtime_builder.enable_all();

            if let Some(workers) = cfg.server.workers {
                runtime_builder.worker_threads(workers);
                tracing::info!("Using {workers} worker threads");
            } else {
                tracing::info!("Using default worker threads (CPU cores)");
            }

            let runtime = runtime_builder.build()?;
            runtime.block_on(server::run(cfg, table))?;
        }
        Commands::Mountpoints { urls } => {
            print!("{}", render_mountpoints(&table, &urls));
        }
        Commands::ProxyDirectives { upstream } => {
            let context = NginxContext { upstream };
            for directive in table.generate_proxy_directives(&NginxDirectives, &context) {
                println!("{directive}\n");
            }
        }
    }

    Ok(())
}
