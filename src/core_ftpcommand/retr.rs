use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::core_transfer;
use crate::session::Session;

/// Handles the RETR (Retrieve File) FTP command.
pub async fn handle_retr_command(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.is_empty() {
        return Reply::send_line(ctrl, "501 No file name").await;
    }
    let path = match make_path_from(&session.cwd, arg) {
        Ok(p) => p,
        Err(_) => return Reply::send_line(ctrl, "500 Command line too long").await,
    };
    core_transfer::download(ctrl, config, session, &path, arg).await
}
