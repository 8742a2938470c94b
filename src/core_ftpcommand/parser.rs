//! Bounded command-line parsing for the control connection.
//!
//! One line is `<mnemonic> <parameters><CR|LF>`: up to four leading ASCII
//! letters form the mnemonic (anything else is a boundary), a run of
//! spaces separates it from the parameters, and the parameters end at the
//! first CR or LF. A line with no space after the mnemonic is a command
//! without parameters. Everything is held in fixed-capacity buffers; lines
//! or parameters that do not fit fail the read and close the session.

use log::debug;
use std::io;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time;

use crate::constants::{FTP_CMD_SIZE, FTP_LINE_SIZE, FTP_PARAM_SIZE};
use crate::error::CommandError;

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    command: String,
    params: String,
}

impl ParsedCommand {
    /// Mnemonic, uppercased (commands are case-insensitive).
    pub fn name(&self) -> &str {
        &self.command
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

/// Read one command line within `window`, then parse it.
///
/// The window bounds each socket read; an idle client fails with
/// [`CommandError::Timeout`], a broken or closed transport with
/// [`CommandError::Communication`].
pub async fn read_command(
    stream: &mut TcpStream,
    window: Duration,
) -> Result<ParsedCommand, CommandError> {
    let mut buf = [0u8; FTP_LINE_SIZE];
    let mut len = 0;

    loop {
        if len == buf.len() {
            return Err(CommandError::LineTooLong);
        }
        let n = match time::timeout(window, stream.read(&mut buf[len..])).await {
            Err(_) => return Err(CommandError::Timeout),
            Ok(Ok(0)) => {
                return Err(CommandError::Communication(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "client closed the control connection",
                )))
            }
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(CommandError::Communication(e)),
        };
        len += n;
        if buf[..len].iter().any(|&b| b == b'\r' || b == b'\n') {
            break;
        }
    }

    let parsed = parse_command_line(&buf[..len])?;
    debug!("<<< {} {}", parsed.name(), parsed.params());
    Ok(parsed)
}

/// Parse one received line. Pure; see the module docs for the grammar.
pub fn parse_command_line(line: &[u8]) -> Result<ParsedCommand, CommandError> {
    let mut i = 0;
    while i < line.len() && i < FTP_CMD_SIZE && line[i].is_ascii_alphabetic() {
        i += 1;
    }
    let command = String::from_utf8_lossy(&line[..i]).to_ascii_uppercase();

    // No space after the mnemonic: a command without parameters.
    if line.get(i) != Some(&b' ') {
        return Ok(ParsedCommand {
            command,
            params: String::new(),
        });
    }
    while i < line.len() && line[i] == b' ' {
        i += 1;
    }

    let start = i;
    let mut end = None;
    while i < line.len() {
        if line[i] == b'\r' || line[i] == b'\n' {
            end = Some(i);
            break;
        }
        i += 1;
    }
    let end = end.ok_or(CommandError::LineTooLong)?;
    if end - start >= FTP_PARAM_SIZE {
        return Err(CommandError::ParameterTooLong);
    }

    Ok(ParsedCommand {
        command,
        params: String::from_utf8_lossy(&line[start..end]).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<ParsedCommand, CommandError> {
        parse_command_line(line.as_bytes())
    }

    #[test]
    fn command_with_parameters() {
        let cmd = parse("RETR foo.txt\r\n").unwrap();
        assert_eq!(cmd.name(), "RETR");
        assert_eq!(cmd.params(), "foo.txt");
    }

    #[test]
    fn command_without_parameters() {
        let cmd = parse("QUIT\r\n").unwrap();
        assert_eq!(cmd.name(), "QUIT");
        assert_eq!(cmd.params(), "");
    }

    #[test]
    fn mnemonic_is_case_insensitive() {
        let cmd = parse("retr foo\r\n").unwrap();
        assert_eq!(cmd.name(), "RETR");
    }

    #[test]
    fn mnemonic_stops_at_four_letters() {
        // The fifth letter is a boundary, not part of the mnemonic, and
        // without a following space the parameters are empty.
        let cmd = parse("ABCDE x\r\n").unwrap();
        assert_eq!(cmd.name(), "ABCD");
        assert_eq!(cmd.params(), "");
    }

    #[test]
    fn unknown_mnemonic_still_parses() {
        let cmd = parse("XYZW extra\r\n").unwrap();
        assert_eq!(cmd.name(), "XYZW");
        assert_eq!(cmd.params(), "extra");
    }

    #[test]
    fn runs_of_spaces_are_skipped() {
        let cmd = parse("CWD    /music\r\n").unwrap();
        assert_eq!(cmd.params(), "/music");
    }

    #[test]
    fn missing_terminator_is_line_too_long() {
        assert!(matches!(
            parse("RETR foo.txt"),
            Err(CommandError::LineTooLong)
        ));
    }

    #[test]
    fn oversized_parameter_is_rejected() {
        let line = format!("RETR {}\r\n", "a".repeat(FTP_PARAM_SIZE));
        assert!(matches!(
            parse(&line),
            Err(CommandError::ParameterTooLong)
        ));
    }

    #[test]
    fn bare_terminator_is_an_empty_command() {
        let cmd = parse("\r\n").unwrap();
        assert_eq!(cmd.name(), "");
        assert_eq!(cmd.params(), "");
    }
}
