use log::info;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::session::Session;

/// Handles the MKD (Make Directory) FTP command.
pub async fn handle_mkd_command(
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
        let mut reply = Reply::begin("521 \"");
        reply.append(arg).append("\" directory already exists");
        return reply.send(ctrl).await;
    }

    match session.storage.create_dir(&path).await {
        Ok(()) => {
            info!("slot {}: created directory {}", session.num, path);
            let mut reply = Reply::begin("257 \"");
            reply.append(arg).append("\" created");
            reply.send(ctrl).await
        }
        Err(_) => {
            let mut reply = Reply::begin("550 Can't create \"");
            reply.append(arg).append("\"");
            reply.send(ctrl).await
        }
    }
}
