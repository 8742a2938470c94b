//! Data-connection manager.
//!
//! Each session owns exactly one `DataConn`. PASV and PORT negotiate the
//! mode; the next data-bearing command calls [`DataConn::connect`], streams
//! over the socket, and ends with [`DataConn::close`] on every path.

use log::debug;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time;

use crate::constants::PASV_ACCEPT_TIMEOUT_MS;
use crate::error::DataConnError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataConnMode {
    Unset,
    Passive,
    Active,
}

pub struct DataConn {
    mode: DataConnMode,
    /// Passive-mode listener, created once per session and kept until teardown.
    listener: Option<TcpListener>,
    stream: Option<TcpStream>,
    /// The slot's assigned passive port, used for binding only.
    slot_port: u16,
    /// Port reported on the control channel; tracks the negotiated mode.
    data_port: u16,
    /// Client-advertised address for active mode.
    client_addr: Option<SocketAddr>,
}

impl DataConn {
    pub fn new(slot_port: u16) -> Self {
        Self {
            mode: DataConnMode::Unset,
            listener: None,
            stream: None,
            slot_port,
            data_port: slot_port,
            client_addr: None,
        }
    }

    pub fn mode(&self) -> DataConnMode {
        self.mode
    }

    /// Port named in the PASV reply and the transfer notices: the slot's
    /// own data port in passive mode, the client-advertised port after
    /// PORT.
    pub fn data_port(&self) -> u16 {
        self.data_port
    }

    pub fn set_passive(&mut self) {
        self.mode = DataConnMode::Passive;
    }

    pub fn set_active(&mut self, addr: SocketAddr) {
        self.client_addr = Some(addr);
        self.data_port = addr.port();
        self.mode = DataConnMode::Active;
    }

    /// Bind and listen on the slot's data port. Idempotent: an existing
    /// listener is reused for the whole session.
    pub async fn listen(&mut self) -> Result<(), DataConnError> {
        if let Some(listener) = &self.listener {
            // Back in passive mode after a PORT overwrote the port.
            if let Ok(addr) = listener.local_addr() {
                self.data_port = addr.port();
            }
            return Ok(());
        }
        let listener = TcpListener::bind(("0.0.0.0", self.slot_port))
            .await
            .map_err(|source| DataConnError::Bind {
                port: self.slot_port,
                source,
            })?;
        // Port 0 asks the stack for an ephemeral port; advertise the real one.
        if let Ok(addr) = listener.local_addr() {
            self.data_port = addr.port();
        }
        self.listener = Some(listener);
        Ok(())
    }

    /// Establish the data socket for the next transfer.
    pub async fn connect(&mut self) -> Result<(), DataConnError> {
        match self.mode {
            DataConnMode::Unset => Err(DataConnError::NoModeSet),
            DataConnMode::Passive => {
                let listener = self.listener.as_ref().ok_or(DataConnError::NoModeSet)?;
                let wait = Duration::from_millis(PASV_ACCEPT_TIMEOUT_MS);
                match time::timeout(wait, listener.accept()).await {
                    Err(_) => Err(DataConnError::AcceptTimeout),
                    Ok(Err(e)) => Err(DataConnError::Connect(e)),
                    Ok(Ok((stream, peer))) => {
                        debug!("accepted data connection from {}", peer);
                        self.stream = Some(stream);
                        Ok(())
                    }
                }
            }
            DataConnMode::Active => {
                let addr = self.client_addr.ok_or(DataConnError::NoModeSet)?;
                match TcpStream::connect(addr).await {
                    Err(e) => Err(DataConnError::Connect(e)),
                    Ok(stream) => {
                        debug!("connected data socket to {}", addr);
                        self.stream = Some(stream);
                        Ok(())
                    }
                }
            }
        }
    }

    /// Hand the established data socket to the transfer loop.
    pub fn take_stream(&mut self) -> Option<TcpStream> {
        self.stream.take()
    }

    /// Drop the data socket (if any) and fall back to no negotiated mode.
    /// Safe to call on every exit path.
    pub fn close(&mut self) {
        self.mode = DataConnMode::Unset;
        self.stream = None;
    }

    /// Full teardown at session end: also releases the passive listener.
    pub fn shutdown(&mut self) {
        self.close();
        self.listener = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn client(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
    }

    #[test]
    fn active_mode_reports_the_advertised_port() {
        let mut conn = DataConn::new(55_600);
        conn.set_active(client(50_010));
        assert_eq!(conn.mode(), DataConnMode::Active);
        assert_eq!(conn.data_port(), 50_010);
    }

    #[tokio::test]
    async fn listen_restores_the_passive_port_after_port_command() {
        let mut conn = DataConn::new(0);
        conn.listen().await.unwrap();
        let bound = conn.data_port();
        assert_ne!(bound, 0);

        conn.set_active(client(50_011));
        assert_eq!(conn.data_port(), 50_011);

        conn.listen().await.unwrap();
        assert_eq!(conn.data_port(), bound);
    }
}
