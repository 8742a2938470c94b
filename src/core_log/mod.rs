//! Per-peer session audit log.
//!
//! One file per client IP under the configured log directory, one line per
//! session with the connect time and duration. Appended fire-and-forget
//! from session teardown; a failed write is logged and never fails the
//! session.

use chrono::{DateTime, Local};
use log::warn;
use std::net::IpAddr;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub fn log_session(log_dir: &str, peer_ip: IpAddr, started_at: DateTime<Local>) {
    let dir = PathBuf::from(log_dir);
    tokio::spawn(async move {
        if let Err(e) = append_session_line(dir.clone(), peer_ip, started_at).await {
            warn!("audit log write failed for {}: {}", peer_ip, e);
        }
    });
}

async fn append_session_line(
    dir: PathBuf,
    peer_ip: IpAddr,
    started_at: DateTime<Local>,
) -> std::io::Result<()> {
    fs::create_dir_all(&dir).await?;
    let path = dir.join(format!("{}.log", peer_ip));

    let duration = (Local::now() - started_at)
        .to_std()
        .unwrap_or_default()
        .as_secs();
    let line = format!(
        "Connected at {} for {:02}:{:02}:{:02}\n",
        started_at.format("%Y/%m/%d %H:%M:%S"),
        duration / 3600,
        (duration / 60) % 60,
        duration % 60
    );

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await?;
    file.write_all(line.as_bytes()).await
}
