use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

pub async fn handle_noop_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    _session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    Reply::send_line(ctrl, "200 Zzz...").await
}
