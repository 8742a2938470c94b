//! Transfer engine: streams bytes between the data socket and the
//! filesystem, with byte/time accounting and the throughput summary.

use log::{info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::Config;
use crate::constants::RATE_KBYTES_THRESHOLD;
use crate::core_ftpcommand::reply::Reply;
use crate::session::Session;

/// Establish the data connection negotiated by PASV/PORT and hand back the
/// socket, or answer `425` and abort the pending command. The caller gets
/// `None` exactly when the reply has already been sent.
pub async fn open_data_stream(
    ctrl: &mut TcpStream,
    session: &mut Session,
) -> io::Result<Option<TcpStream>> {
    if let Err(e) = session.data.connect().await {
        warn!("slot {}: data connection failed: {}", session.num, e);
        Reply::send_line(ctrl, "425 No data connection").await?;
        session.data.close();
        return Ok(None);
    }
    match session.data.take_stream() {
        Some(stream) => Ok(Some(stream)),
        None => {
            Reply::send_line(ctrl, "425 No data connection").await?;
            session.data.close();
            Ok(None)
        }
    }
}

/// RETR body: file to data socket.
pub async fn download(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
    path: &str,
    param: &str,
) -> io::Result<()> {
    if !session.storage.exists(path).await {
        let mut reply = Reply::begin("550 File ");
        reply.append(param).append(" not found");
        return reply.send(ctrl).await;
    }
    let mut file = match session.storage.open_read(path).await {
        Ok(f) => f,
        Err(e) => {
            warn!("slot {}: can't open {}: {}", session.num, path, e);
            let mut reply = Reply::begin("450 Can't open ");
            reply.append(param);
            return reply.send(ctrl).await;
        }
    };
    let size = match file.metadata().await {
        Ok(m) => m.len(),
        Err(_) => 0,
    };

    let Some(mut data_stream) = open_data_stream(ctrl, session).await? else {
        return Ok(());
    };

    info!("slot {}: sending {}", session.num, path);
    let mut reply = Reply::begin("150-Connected to port ");
    reply
        .append(&session.data.data_port().to_string())
        .append("\r\n150 ")
        .append(&size.to_string())
        .append(" bytes to download");
    reply.send(ctrl).await?;

    session.begin_transfer();
    let mut buf = vec![0u8; config.transfer_buffer_size()];
    loop {
        let n = match file.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("slot {}: file read error: {}", session.num, e);
                break;
            }
        };
        if let Err(e) = data_stream.write_all(&buf[..n]).await {
            warn!("slot {}: data write error: {}", session.num, e);
            break;
        }
        session.bytes_transferred += n as u64;
    }

    drop(file);
    drop(data_stream);
    close_transfer(ctrl, session).await?;
    session.data.close();
    Ok(())
}

/// STOR body: data socket to file.
///
/// A filesystem write error is latched (first error wins) while the
/// socket keeps draining, so the client and server stay in step on the
/// protocol; the latched error is reported after the loop, followed by
/// the usual completion summary.
pub async fn upload(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
    path: &str,
    param: &str,
) -> io::Result<()> {
    let mut file = match session.storage.create(path).await {
        Ok(f) => f,
        Err(e) => {
            warn!("slot {}: can't create {}: {}", session.num, path, e);
            let mut reply = Reply::begin("451 Can't open/create ");
            reply.append(param);
            return reply.send(ctrl).await;
        }
    };

    let Some(mut data_stream) = open_data_stream(ctrl, session).await? else {
        // The file was already created; leave the empty file behind and
        // abort, the data connection reply has been sent.
        return Ok(());
    };

    info!("slot {}: receiving {}", session.num, path);
    let mut reply = Reply::begin("150 Connected to port ");
    reply.append(&session.data.data_port().to_string());
    reply.send(ctrl).await?;

    session.begin_transfer();
    let chunk = config.transfer_buffer_size();
    let mut netbuf = vec![0u8; chunk];
    let mut filebuf: Vec<u8> = Vec::with_capacity(chunk);
    let mut file_err: Option<io::Error> = None;
    let mut comm_err: Option<io::Error> = None;

    loop {
        let n = match data_stream.read(&mut netbuf).await {
            Ok(0) => break, // clean close, end of upload
            Ok(n) => n,
            Err(e) => {
                comm_err = Some(e);
                break;
            }
        };
        let mut rest = &netbuf[..n];
        while !rest.is_empty() {
            let take = (chunk - filebuf.len()).min(rest.len());
            filebuf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if filebuf.len() == chunk {
                if file_err.is_none() {
                    if let Err(e) = file.write_all(&filebuf).await {
                        file_err = Some(e);
                    }
                }
                filebuf.clear();
            }
        }
        session.bytes_transferred += n as u64;
    }

    // Flush the partial buffer left over at end-of-stream.
    if !filebuf.is_empty() && file_err.is_none() {
        if let Err(e) = file.write_all(&filebuf).await {
            file_err = Some(e);
        }
    }
    if file_err.is_none() {
        if let Err(e) = file.flush().await {
            file_err = Some(e);
        }
    }
    drop(file);

    if let Some(e) = comm_err {
        warn!("slot {}: receive error during upload: {}", session.num, e);
        let mut reply = Reply::begin("451 Requested action aborted: communication error ");
        reply.append(&e.kind().to_string());
        reply.send(ctrl).await?;
    }
    if let Some(e) = file_err {
        warn!("slot {}: file error during upload: {}", session.num, e);
        let mut reply = Reply::begin("451 Requested action aborted: file error ");
        reply.append(&e.kind().to_string());
        reply.send(ctrl).await?;
    }

    drop(data_stream);
    session.data.close();
    close_transfer(ctrl, session).await?;
    Ok(())
}

/// Send the completion summary with elapsed time and throughput. Without
/// usable timing (instant transfer or nothing moved) the summary is the
/// bare success line.
pub async fn close_transfer(ctrl: &mut TcpStream, session: &mut Session) -> io::Result<()> {
    let elapsed_ms = session.transfer_start.elapsed().as_millis() as u64;
    let bytes = session.bytes_transferred;
    if elapsed_ms == 0 || bytes == 0 {
        return Reply::send_line(ctrl, "226 File successfully transferred").await;
    }

    let bps = bytes_per_second(bytes, elapsed_ms);
    let mut reply = Reply::begin("226-File successfully transferred\r\n226 ");
    reply.append(&elapsed_ms.to_string()).append(" ms, ");
    if bps > RATE_KBYTES_THRESHOLD {
        reply.append(&(bps / 1000).to_string()).append(" kbytes/s");
    } else {
        reply.append(&bps.to_string()).append(" bytes/s");
    }
    reply.send(ctrl).await
}

/// Bytes/s from a byte count and a millisecond duration, dividing first
/// when the scaled product would overflow.
fn bytes_per_second(bytes: u64, elapsed_ms: u64) -> u64 {
    const MS_PER_SEC: u64 = 1000;
    if bytes < u64::MAX / MS_PER_SEC {
        bytes * MS_PER_SEC / elapsed_ms
    } else {
        (bytes / elapsed_ms) * MS_PER_SEC
    }
}
