//! Fixed capacities and timing knobs. Buffers are sized once and never
//! grow beyond these caps.

/// Longest command mnemonic (RFC 959 keeps them at four letters).
pub const FTP_CMD_SIZE: usize = 4;
/// Cap on one command's parameter string.
pub const FTP_PARAM_SIZE: usize = 256;
/// Cap on a resolved path, current directory included.
pub const FTP_CWD_SIZE: usize = 256;
/// Cap on one control-channel reply, CRLF included.
pub const FTP_REPLY_SIZE: usize = 512;
/// Default transfer chunk size.
pub const FTP_BUF_SIZE: usize = 512;
/// One full command line: mnemonic, separator, parameters and slack for
/// the terminator.
pub const FTP_LINE_SIZE: usize = FTP_CMD_SIZE + 1 + FTP_PARAM_SIZE + 8;

/// How long a passive listener waits for the client's data connection.
pub const PASV_ACCEPT_TIMEOUT_MS: u64 = 500;
/// Accept-loop sleep while every worker slot is occupied.
pub const SLOT_POLL_INTERVAL_MS: u64 = 300;
/// Throughput above this many bytes/s is reported in kbytes/s.
pub const RATE_KBYTES_THRESHOLD: u64 = 10_000;
