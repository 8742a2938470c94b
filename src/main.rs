use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use std::io::Write;

use petitftpd::core_cli::Cli;
use petitftpd::{Config, Server};

const DEFAULT_CONFIG_PATH: &str = "/etc/petitftpd.conf";

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = if cli.config.is_empty() {
        if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() {
            Config::load_from_file(DEFAULT_CONFIG_PATH)?
        } else {
            warn!(
                "no configuration at {}, using built-in defaults",
                DEFAULT_CONFIG_PATH
            );
            Config::default()
        }
    } else {
        Config::load_from_file(&cli.config)?
    };

    info!(
        "petitftpd {} starting, chroot {}",
        env!("CARGO_PKG_VERSION"),
        config.server.chroot_dir
    );

    let server = Server::bind(config)
        .await
        .context("Failed to bind the control listener")?;
    server.serve().await.context("Server terminated")?;
    Ok(())
}
