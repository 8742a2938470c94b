use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

pub async fn handle_syst_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    _session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    Reply::send_line(ctrl, "215 UNIX Type: L8").await
}
