use log::info;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::session::Session;

/// Handles the CWD (Change Working Directory) FTP command.
///
/// The new directory must exist under the chroot; the session's current
/// directory is only updated on success.
pub async fn handle_cwd_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.is_empty() {
        return Reply::send_line(ctrl, "501 No directory name").await;
    }
    let path = match make_path_from(&session.cwd, arg) {
        Ok(p) => p,
        Err(_) => return Reply::send_line(ctrl, "500 Command line too long").await,
    };

    if session.storage.exists(&path).await {
        info!("slot {}: cwd is now {}", session.num, path);
        session.cwd = path;
        Reply::send_line(ctrl, "250 Directory successfully changed.").await
    } else {
        Reply::send_line(ctrl, "550 Failed to change directory.").await
    }
}
