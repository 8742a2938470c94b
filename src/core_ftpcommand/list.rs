//! LIST and NLST: directory listings over the data connection.
//!
//! LIST sends EPLF-style lines (`+/,` for directories, `+r,s<size>,` for
//! files); NLST sends bare names. Dot entries are skipped in both.

use log::{info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::utils::make_path_from;
use crate::core_transfer::open_data_stream;
use crate::session::Session;

pub async fn handle_list_command(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    send_listing(ctrl, config, session, arg, false).await
}

pub async fn handle_nlst_command(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    send_listing(ctrl, config, session, arg, true).await
}

async fn send_listing(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
    names_only: bool,
) -> io::Result<()> {
    // Listing flags like "-l" are accepted and ignored.
    let path = if arg.is_empty() || arg.starts_with('-') {
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
        let line = if names_only {
            format!("{}\r\n", entry.name)
        } else if entry.is_dir {
            format!("+/,\t{}\r\n", entry.name)
        } else {
            format!("+r,s{},\t{}\r\n", entry.size, entry.name)
        };
        // A broken data socket aborts the listing, not the session.
        if let Err(e) = data_stream.write_all(line.as_bytes()).await {
            warn!("slot {}: data write error: {}", session.num, e);
            break;
        }
        count += 1;
    }
    drop(data_stream);
    session.data.close();

    info!("slot {}: listed {} ({} entries)", session.num, path, count);
    Reply::send_line(ctrl, "226 Directory send OK.").await
}
