use chrono::Local;
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Handles the STAT FTP command: a multi-line server status block with
/// the local time, occupancy and the idle timeout.
pub async fn handle_stat_command(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    let now = Local::now().format("%Y/%m/%d %H:%M:%S").to_string();
    let connected = session.slots.occupied_count();
    let idle_minutes = config.idle_timeout().as_secs() / 60;

    let mut reply = Reply::begin("211-FTP server status\r\n ");
    reply
        .append("Local time is ")
        .append(&now)
        .append("\r\n ")
        .append(&connected.to_string())
        .append(" user(s) currently connected to up to ")
        .append(&session.slots.capacity().to_string())
        .append("\r\n You will be disconnected after ")
        .append(&idle_minutes.to_string())
        .append(" minutes of inactivity\r\n211 End.");
    reply.send(ctrl).await
}
