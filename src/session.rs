use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use crate::core_network::data::DataConn;
use crate::core_network::network::SlotTable;
use crate::core_storage::Storage;

/// Per-connection state, exclusively owned by the slot's worker for the
/// lifetime of the session.
pub struct Session {
    /// Slot index, also selects the data port in passive mode.
    pub num: usize,
    /// Current working directory, always an absolute virtual path.
    pub cwd: String,
    /// Source path stored by RNFR; empty means no rename is pending.
    pub rename_from: String,
    pub data: DataConn,
    pub storage: Storage,
    pub peer_addr: SocketAddr,
    /// Server-side IP of the control connection, advertised by PASV.
    pub server_ip: IpAddr,
    /// Bytes moved by the in-flight transfer.
    pub bytes_transferred: u64,
    pub transfer_start: Instant,
    /// Shared slot table, read by STAT for the connected-users count.
    pub slots: Arc<SlotTable>,
}

impl Session {
    pub fn new(
        num: usize,
        peer_addr: SocketAddr,
        server_ip: IpAddr,
        data_port: u16,
        storage: Storage,
        slots: Arc<SlotTable>,
    ) -> Self {
        Self {
            num,
            cwd: String::from("/"),
            rename_from: String::new(),
            data: DataConn::new(data_port),
            storage,
            peer_addr,
            server_ip,
            bytes_transferred: 0,
            transfer_start: Instant::now(),
            slots,
        }
    }

    /// Reset the transfer counters at the start of a RETR/STOR.
    pub fn begin_transfer(&mut self) {
        self.bytes_transferred = 0;
        self.transfer_start = Instant::now();
    }
}
