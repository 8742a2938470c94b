use log::info;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::session::Session;

/// Handles the RMD (Remove Directory) FTP command.
pub async fn handle_rmd_command(
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

    if !session.storage.exists(&path).await {
        let mut reply = Reply::begin("550 Directory \"");
        reply.append(arg).append("\" not found");
        return reply.send(ctrl).await;
    }

    match session.storage.remove_dir(&path).await {
        Ok(()) => {
            info!("slot {}: removed directory {}", session.num, path);
            let mut reply = Reply::begin("250 \"");
            reply.append(arg).append("\" removed");
            reply.send(ctrl).await
        }
        Err(_) => {
            let mut reply = Reply::begin("501 Can't delete \"");
            reply.append(arg).append("\"");
            reply.send(ctrl).await
        }
    }
}
