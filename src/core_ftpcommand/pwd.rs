// src/core_ftpcommand/pwd.rs
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Handles PWD, and `CWD .` which the dispatcher routes here as well.
pub async fn handle_pwd_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    let mut reply = Reply::begin("257 \"");
    reply
        .append(&session.cwd)
        .append("\" is your current directory");
    reply.send(ctrl).await
}
