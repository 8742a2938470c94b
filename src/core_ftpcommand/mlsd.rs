//! MLSD (RFC 3659): machine-readable directory listing over the data
//! connection, one `Type=…;Size=…;Modify=…; name` fact line per entry.

use log::{info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::core_storage::datetime::make_date_time_str;
use crate::core_transfer::open_data_stream;
use crate::session::Session;

pub async fn handle_mlsd_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let path = if arg.is_empty() {
        session.cwd.clone()
    } else {
        match make_path_from(&session.cwd, arg) {
            Ok(p) => p,
            Err(_) => return Reply::send_line(ctrl, "500 Command line too long").await,
        }
    };

    let entries = match session.storage.read_dir(&path).await {
        Ok(e) => e,
        Err(_) => {
            let mut reply = Reply::begin("550 Can't open directory ");
            reply.append(&path);
            return reply.send(ctrl).await;
        }
    };

    let Some(mut data_stream) = open_data_stream(ctrl, session).await? else {
        return Ok(());
    };
    Reply::send_line(ctrl, "150 Accepted data connection").await?;

    let mut count = 0usize;
    for entry in &entries {
        if entry.name.starts_with('.') {
            continue;
        }
        let kind = if entry.is_dir { "dir" } else { "file" };
        let mut line = format!("Type={};Size={}", kind, entry.size);
        if entry.fdate != 0 {
            line.push_str(";Modify=");
            line.push_str(&make_date_time_str(entry.fdate, entry.ftime));
        }
        line.push_str(&format!("; {}\r\n", entry.name));
        // A broken data socket aborts the listing, not the session.
        if let Err(e) = data_stream.write_all(line.as_bytes()).await {
            warn!("slot {}: data write error: {}", session.num, e);
            break;
        }
        count += 1;
    }
    drop(data_stream);
    session.data.close();

    info!("slot {}: mlsd {} ({} entries)", session.num, path, count);
    let mut reply = Reply::begin("226-options: -a -l\r\n226 ");
    reply.append(&count.to_string()).append(" matches total");
    reply.send(ctrl).await
}
