use log::debug;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::session::Session;

/// Handles the RNFR (Rename From) FTP command.
///
/// On success the resolved source path is remembered in the session until
/// the matching RNTO arrives; any other command in between leaves it set,
/// and a second RNFR simply replaces it.
pub async fn handle_rnfr_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    session.rename_from.clear();
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

    debug!("slot {}: rename source {}", session.num, path);
    session.rename_from = path;
    Reply::send_line(ctrl, "350 RNFR accepted - file exists, ready for destination").await
}
