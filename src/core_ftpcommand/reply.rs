//! Bounded reply builder for the control connection.
//!
//! Replies are assembled in a buffer capped at [`FTP_REPLY_SIZE`] bytes;
//! text past the cap is truncated, and the trailing CRLF is appended only
//! if two bytes of capacity remain. All control-channel bytes go through
//! here so the wire format stays in one place.

use log::debug;
use std::io;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::constants::FTP_REPLY_SIZE;

pub struct Reply {
    buf: String,
}

impl Reply {
    pub fn begin(text: &str) -> Self {
        let mut reply = Self {
            buf: String::with_capacity(FTP_REPLY_SIZE),
        };
        reply.push_bounded(text);
        reply
    }

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.push_bounded(text);
        self
    }

    pub async fn send(&self, stream: &mut TcpStream) -> io::Result<()> {
        let mut wire = Vec::with_capacity(self.buf.len() + 2);
        wire.extend_from_slice(self.buf.as_bytes());
        if wire.len() + 2 <= FTP_REPLY_SIZE {
            wire.extend_from_slice(b"\r\n");
        }
        stream.write_all(&wire).await?;
        debug!(">>> {}", self.buf.trim_end());
        Ok(())
    }

    /// One-shot helper for single-line replies.
    pub async fn send_line(stream: &mut TcpStream, text: &str) -> io::Result<()> {
        Reply::begin(text).send(stream).await
    }

    fn push_bounded(&mut self, text: &str) {
        let room = FTP_REPLY_SIZE.saturating_sub(self.buf.len());
        if text.len() <= room {
            self.buf.push_str(text);
            return;
        }
        let mut cut = room;
        while cut > 0 && !text.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&text[..cut]);
    }

    #[cfg(test)]
    fn as_str(&self) -> &str {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order() {
        let mut reply = Reply::begin("257 \"");
        reply.append("/music").append("\" is your current directory");
        assert_eq!(reply.as_str(), "257 \"/music\" is your current directory");
    }

    #[test]
    fn truncates_at_capacity() {
        let long = "x".repeat(FTP_REPLY_SIZE * 2);
        let mut reply = Reply::begin("550 ");
        reply.append(&long);
        assert_eq!(reply.as_str().len(), FTP_REPLY_SIZE);
        assert!(reply.as_str().starts_with("550 "));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut reply = Reply::begin(&"a".repeat(FTP_REPLY_SIZE - 1));
        reply.append("é");
        assert_eq!(reply.as_str().len(), FTP_REPLY_SIZE - 1);
    }
}
