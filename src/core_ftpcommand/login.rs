//! USER/PASS login phase.
//!
//! Runs before the command loop: the client gets one shot at the
//! configured credentials, with a short timeout on each line. Any
//! malformed line, wrong credential or timeout ends the session after at
//! most one rejecting reply.

use log::{debug, info, warn};
use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::parser;
use crate::core_ftpcommand::reply::Reply;

/// Returns `Ok(true)` when the session is authenticated, `Ok(false)` when
/// it must close.
pub async fn login(ctrl: &mut TcpStream, config: &Arc<Config>, num: usize) -> io::Result<bool> {
    let window = config.login_timeout();

    let cmd = match parser::read_command(ctrl, window).await {
        Ok(cmd) => cmd,
        Err(e) => {
            debug!("slot {}: login aborted: {}", num, e);
            return Ok(false);
        }
    };
    if cmd.name() != "USER" {
        Reply::send_line(ctrl, "500 Syntax error").await?;
        return Ok(false);
    }
    if cmd.params() != config.server.username {
        warn!("slot {}: rejected unknown user {:?}", num, cmd.params());
        Reply::send_line(ctrl, "530 Login incorrect.").await?;
        return Ok(false);
    }
    Reply::send_line(ctrl, "331 OK. Password required").await?;

    let cmd = match parser::read_command(ctrl, window).await {
        Ok(cmd) => cmd,
        Err(e) => {
            debug!("slot {}: login aborted: {}", num, e);
            return Ok(false);
        }
    };
    if cmd.name() != "PASS" {
        Reply::send_line(ctrl, "500 Syntax error").await?;
        return Ok(false);
    }
    if cmd.params() != config.server.password {
        warn!("slot {}: wrong password for {}", num, config.server.username);
        Reply::send_line(ctrl, "530 Login incorrect.").await?;
        return Ok(false);
    }
    Reply::send_line(ctrl, "230 OK.").await?;
    info!("slot {}: user {} logged in", num, config.server.username);
    Ok(true)
}
