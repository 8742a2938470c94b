pub mod config;
pub mod constants;
pub mod core_cli;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod core_storage;
pub mod core_transfer;
pub mod error;
pub mod session;

pub use config::{Config, ServerConfig};
pub use core_network::network::Server;
