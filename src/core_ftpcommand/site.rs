use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Handles the SITE FTP command. `SITE FREE` reports the free and total
/// capacity of the disk holding the chroot; anything else is unknown.
pub async fn handle_site_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.eq_ignore_ascii_case("FREE") {
        let storage = session.storage.clone();
        let (free, capacity) = tokio::task::spawn_blocking(move || storage.free_space())
            .await
            .unwrap_or((0, 0));
        let mut reply = Reply::begin("211 ");
        reply
            .append(&free.to_string())
            .append(" MB free of ")
            .append(&capacity.to_string())
            .append(" MB capacity");
        reply.send(ctrl).await
    } else {
        let mut reply = Reply::begin("500 Unknown SITE command ");
        reply.append(arg);
        reply.send(ctrl).await
    }
}
