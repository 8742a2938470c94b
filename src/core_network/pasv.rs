use log::{info, warn};
use std::io;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Handles the PASV FTP command: bind the slot's data port and advertise
/// it in the `(h1,h2,h3,h4,p1,p2)` form.
pub async fn handle_pasv_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    // A pending data socket from an earlier negotiation is stale now.
    session.data.close();

    if let Err(e) = session.data.listen().await {
        warn!("slot {}: passive bind failed: {}", session.num, e);
        return Reply::send_line(ctrl, "425 Can't set connection management to passive").await;
    }
    session.data.set_passive();

    let port = session.data.data_port();
    info!(
        "slot {}: entering passive mode on port {}",
        session.num, port
    );
    let mut reply = Reply::begin("227 Entering Passive Mode (");
    reply
        .append(&pasv_host_port(session.server_ip, port))
        .append(").");
    reply.send(ctrl).await
}

/// `h1,h2,h3,h4,p1,p2` for the 227 reply. Non-IPv4 control connections
/// advertise 0,0,0,0 since the form cannot carry them.
fn pasv_host_port(ip: IpAddr, port: u16) -> String {
    let octets = match ip {
        IpAddr::V4(v4) => v4.octets(),
        IpAddr::V6(_) => [0, 0, 0, 0],
    };
    format!(
        "{},{},{},{},{},{}",
        octets[0],
        octets[1],
        octets[2],
        octets[3],
        port >> 8,
        port & 0xff
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn formats_ip_and_split_port() {
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 40));
        assert_eq!(pasv_host_port(ip, 55601), "192,168,1,40,217,49");
    }
}
