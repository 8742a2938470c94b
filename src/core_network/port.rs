use log::info;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Handles the PORT FTP command: parse the client-advertised address and
/// switch the data connection to active mode.
pub async fn handle_port_command(
    ctrl: &mut TcpStream,
    _config: &Arc<Config>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    // Any previously negotiated data socket is stale now.
    session.data.close();

    match parse_port_argument(arg) {
        Some(addr) => {
            info!("slot {}: active mode, client data at {}", session.num, addr);
            session.data.set_active(addr);
            Reply::send_line(ctrl, "200 PORT command successful").await
        }
        None => Reply::send_line(ctrl, "501 Can't interpret parameters").await,
    }
}

/// Parse `h1,h2,h3,h4,p1,p2` into a socket address. Exactly six decimal
/// fields, each 0..=255.
pub fn parse_port_argument(arg: &str) -> Option<SocketAddr> {
    let mut fields = [0u8; 6];
    let mut count = 0;
    for part in arg.split(',') {
        if count == 6 {
            return None;
        }
        fields[count] = part.trim().parse().ok()?;
        count += 1;
    }
    if count != 6 {
        return None;
    }
    let ip = IpAddr::V4(Ipv4Addr::new(fields[0], fields[1], fields[2], fields[3]));
    let port = u16::from(fields[4]) << 8 | u16::from(fields[5]);
    Some(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_address_and_port() {
        let addr = parse_port_argument("192,168,1,2,217,49").unwrap();
        assert_eq!(addr.ip(), IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2)));
        assert_eq!(addr.port(), 217 * 256 + 49);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(parse_port_argument("192,168,1,2,217").is_none());
        assert!(parse_port_argument("192,168,1,2,217,49,3").is_none());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(parse_port_argument("300,168,1,2,217,49").is_none());
        assert!(parse_port_argument("192,168,1,2,-1,49").is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_port_argument("").is_none());
        assert!(parse_port_argument("a,b,c,d,e,f").is_none());
    }
}
