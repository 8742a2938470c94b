use log::info;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::session::Session;

/// Handles the DELE (Delete File) FTP command.
pub async fn handle_dele_command(
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

    if !session.storage.exists(&path).await {
        let mut reply = Reply::begin("550 File ");
        reply.append(arg).append(" not found");
        return reply.send(ctrl).await;
    }

    match session.storage.remove_file(&path).await {
        Ok(()) => {
            info!("slot {}: deleted {}", session.num, path);
            let mut reply = Reply::begin("250 Deleted ");
            reply.append(arg);
            reply.send(ctrl).await
        }
        Err(_) => {
            let mut reply = Reply::begin("450 Can't delete ");
            reply.append(arg);
            reply.send(ctrl).await
        }
    }
}
