//! Client dispatcher: fixed slot table, accept loop, per-slot workers.
//!
//! Each of the `max_clients` slots is a long-lived worker task parked on a
//! capacity-1 channel. The accept loop only accepts when a slot is free;
//! when all slots are busy it sleeps for the poll interval, so surplus
//! connections wait in the kernel backlog instead of being turned away.

use chrono::Local;
use log::{debug, error, info, warn};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time;

use crate::config::Config;
use crate::constants::SLOT_POLL_INTERVAL_MS;
use crate::core_ftpcommand::handlers::{process_command, Flow};
use crate::core_ftpcommand::login;
use crate::core_ftpcommand::parser;
use crate::core_ftpcommand::reply::Reply;
use crate::core_log;
use crate::core_storage::Storage;
use crate::error::CommandError;
use crate::session::Session;

/// Occupancy flags for the worker slots, the only state shared between
/// workers. Claimed by the accept loop, released by the owning worker,
/// counted by STAT.
pub struct SlotTable {
    flags: Vec<AtomicBool>,
}

impl SlotTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            flags: (0..capacity).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.flags.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|f| f.load(Ordering::Acquire))
            .count()
    }

    /// Index of the first free slot, without claiming it.
    pub fn first_free(&self) -> Option<usize> {
        self.flags
            .iter()
            .position(|f| !f.load(Ordering::Acquire))
    }

    /// Claim a specific slot. Fails if it is already occupied.
    pub fn claim(&self, num: usize) -> bool {
        self.flags[num]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self, num: usize) {
        self.flags[num].store(false, Ordering::Release);
    }
}

pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
    slots: Arc<SlotTable>,
}

impl Server {
    /// Bind the control listener. Serving starts with [`Server::serve`].
    pub async fn bind(config: Config) -> io::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", config.server.listen_port)).await?;
        let slots = Arc::new(SlotTable::new(config.server.max_clients));
        Ok(Self {
            listener,
            config: Arc::new(config),
            slots,
        })
    }

    /// Actual bound address, useful when the configured port was 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop forever.
    pub async fn serve(self) -> io::Result<()> {
        info!(
            "listening on {}, {} client slot(s)",
            self.local_addr()?,
            self.slots.capacity()
        );

        let mut workers = Vec::with_capacity(self.slots.capacity());
        for num in 0..self.slots.capacity() {
            // Capacity 1: the accept loop hands over at most one pending
            // stream per slot, everything else stays in the backlog.
            let (tx, rx) = mpsc::channel::<(TcpStream, SocketAddr)>(1);
            let config = Arc::clone(&self.config);
            let slots = Arc::clone(&self.slots);
            tokio::spawn(slot_worker(num, rx, config, slots));
            workers.push(tx);
        }

        loop {
            let Some(num) = self.slots.first_free() else {
                time::sleep(Duration::from_millis(SLOT_POLL_INTERVAL_MS)).await;
                continue;
            };
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            };
            // The accept loop is the only claimer, so this cannot fail.
            if !self.slots.claim(num) {
                continue;
            }
            info!("slot {}: connection from {}", num, peer);
            if workers[num].send((stream, peer)).await.is_err() {
                error!("slot {}: worker is gone", num);
                self.slots.release(num);
            }
        }
    }
}

/// One long-lived task per slot: wait for a handed-over connection, run
/// the session, release the slot, wait again.
async fn slot_worker(
    num: usize,
    mut rx: mpsc::Receiver<(TcpStream, SocketAddr)>,
    config: Arc<Config>,
    slots: Arc<SlotTable>,
) {
    while let Some((stream, peer)) = rx.recv().await {
        service(num, stream, peer, &config, &slots).await;
        slots.release(num);
        debug!("slot {}: released", num);
    }
}

/// Run one full session on a control connection, teardown included.
async fn service(
    num: usize,
    mut ctrl: TcpStream,
    peer: SocketAddr,
    config: &Arc<Config>,
    slots: &Arc<SlotTable>,
) {
    let started_at = Local::now();

    let server_ip: IpAddr = match config.server.pasv_address.parse::<IpAddr>() {
        Ok(ip) if !ip.is_unspecified() => ip,
        _ => match ctrl.local_addr() {
            Ok(addr) => addr.ip(),
            Err(e) => {
                warn!("slot {}: no local address: {}", num, e);
                return;
            }
        },
    };

    let data_port = if config.server.data_port_base == 0 {
        0
    } else {
        config.server.data_port_base + num as u16
    };
    let storage = Storage::new(&config.server.chroot_dir);
    let mut session = Session::new(num, peer, server_ip, data_port, storage, Arc::clone(slots));

    if let Err(e) = run_session(&mut ctrl, config, &mut session).await {
        debug!("slot {}: session ended with error: {}", num, e);
    }

    session.data.shutdown();
    info!("slot {}: disconnected {}", num, peer);
    core_log::log_session(&config.server.log_dir, peer.ip(), started_at);
}

async fn run_session(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
) -> io::Result<()> {
    let mut greeting = Reply::begin("220---   Welcome to petitftpd!   ---\r\n220 Version ");
    greeting.append(env!("CARGO_PKG_VERSION"));
    greeting.send(ctrl).await?;

    if !login::login(ctrl, config, session.num).await? {
        return Ok(());
    }

    let window = config.idle_timeout();
    loop {
        let parsed = match parser::read_command(ctrl, window).await {
            Ok(parsed) => parsed,
            Err(CommandError::Timeout) => {
                debug!("slot {}: idle timeout", session.num);
                return Ok(());
            }
            Err(e) => {
                debug!("slot {}: control read failed: {}", session.num, e);
                return Ok(());
            }
        };
        match process_command(ctrl, config, session, &parsed).await? {
            Flow::Continue => {}
            Flow::Terminate => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_claim_and_release() {
        let slots = SlotTable::new(2);
        assert_eq!(slots.first_free(), Some(0));
        assert!(slots.claim(0));
        assert!(!slots.claim(0));
        assert_eq!(slots.first_free(), Some(1));
        assert!(slots.claim(1));
        assert_eq!(slots.first_free(), None);
        assert_eq!(slots.occupied_count(), 2);
        slots.release(0);
        assert_eq!(slots.first_free(), Some(0));
        assert_eq!(slots.occupied_count(), 1);
    }
}
