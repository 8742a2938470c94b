use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Handles the FEAT FTP command: advertises the RFC 3659 extensions.
pub async fn handle_feat_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    _session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    let reply = Reply::begin(
        "211-Extensions supported:\r\n MDTM\r\n MLSD\r\n SIZE\r\n SITE FREE\r\n211 End.",
    );
    reply.send(ctrl).await
}
