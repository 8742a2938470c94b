//! MODE, STRU and TYPE: transfer-parameter commands.
//!
//! Only the stream/file/binary-or-ASCII subset is supported; anything
//! else is answered with 504.

use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

pub async fn handle_mode_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    _session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg == "S" {
        Reply::send_line(ctrl, "200 S Ok").await
    } else {
        Reply::send_line(ctrl, "504 Only S(tream) is supported").await
    }
}

pub async fn handle_stru_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    _session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg == "F" {
        Reply::send_line(ctrl, "200 F Ok").await
    } else {
        Reply::send_line(ctrl, "504 Only F(ile) is supported").await
    }
}

pub async fn handle_type_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    _session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    match arg {
        "A" => Reply::send_line(ctrl, "200 TYPE is now ASCII").await,
        "I" => Reply::send_line(ctrl, "200 TYPE is now 8-bit binary").await,
        _ => Reply::send_line(ctrl, "504 Unknown TYPE").await,
    }
}
