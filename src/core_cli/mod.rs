use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "petitftpd", about = "A slot-bounded FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
