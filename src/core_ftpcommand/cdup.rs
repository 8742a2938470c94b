use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Handles the CDUP (Change to Parent Directory) FTP command.
///
/// Any failure along the way falls back to the root directory instead of
/// erroring out; the reply always names the directory we ended up in.
pub async fn handle_cdup_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    let mut ok = false;
    if session.cwd.len() > 1 {
        if session.cwd.ends_with('/') {
            session.cwd.pop();
        }
        if let Some(pos) = session.cwd.rfind('/') {
            if pos > 0 {
                session.cwd.truncate(pos);
                ok = session.storage.exists(&session.cwd).await;
            }
        }
    }
    if !ok {
        session.cwd = String::from("/");
    }

    let mut reply = Reply::begin("200 Ok. Current directory is ");
    reply.append(&session.cwd);
    reply.send(ctrl).await
}
