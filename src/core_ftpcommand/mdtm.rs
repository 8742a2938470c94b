use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::core_storage::datetime::{make_date_time_str, parse_date_time};
use crate::session::Session;

/// Handles the MDTM FTP command (RFC 3659), both forms:
///
/// - `MDTM <name>` reports the modification time as `YYYYMMDDHHMMSS`;
/// - `MDTM YYYYMMDDHHMMSS <name>` sets it.
pub async fn handle_mdtm_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let (set_time, name) = match parse_date_time(arg) {
        Some((packed, consumed)) => (Some(packed), &arg[consumed..]),
        None => (None, arg),
    };

    if name.is_empty() {
        return Reply::send_line(ctrl, "501 No file name").await;
    }
    let path = match make_path_from(&session.cwd, name) {
        Ok(p) => p,
        Err(_) => return Reply::send_line(ctrl, "500 Command line too long").await,
    };
    if !session.storage.exists(&path).await {
        let mut reply = Reply::begin("550 File ");
        reply.append(name).append(" not found");
        return reply.send(ctrl).await;
    }

    match set_time {
        None => match session.storage.modify_time(&path).await {
            Ok((date, time)) => {
                let mut reply = Reply::begin("213 ");
                reply.append(&make_date_time_str(date, time));
                reply.send(ctrl).await
            }
            Err(_) => Reply::send_line(ctrl, "550 Unable to retrieve time").await,
        },
        Some((date, time)) => match session.storage.set_modify_time(&path, date, time).await {
            Ok(()) => Reply::send_line(ctrl, "200 Ok").await,
            Err(_) => Reply::send_line(ctrl, "550 Unable to modify time").await,
        },
    }
}
