use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::session::Session;

/// Handles the SIZE FTP command (RFC 3659). Directories and missing
/// entries both answer 550.
pub async fn handle_size_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
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

    if session.storage.is_dir(&path).await {
        return Reply::send_line(ctrl, "550 No such file").await;
    }
    match session.storage.size(&path).await {
        Ok(size) => {
            let mut reply = Reply::begin("213 ");
            reply.append(&size.to_string());
            reply.send(ctrl).await
        }
        Err(_) => Reply::send_line(ctrl, "550 No such file").await,
    }
}
