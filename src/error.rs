use std::io;
use thiserror::Error;

/// Failures while reading or parsing one control-channel command line.
/// All of them close the session.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("timed out waiting for a command")]
    Timeout,
    #[error("control connection failed: {0}")]
    Communication(#[from] io::Error),
    #[error("command line does not fit the line buffer")]
    LineTooLong,
    #[error("command parameter does not fit the parameter buffer")]
    ParameterTooLong,
}

/// Failures establishing a data connection. Each is answered with a
/// single `425` on the control channel and the session continues.
#[derive(Debug, Error)]
pub enum DataConnError {
    #[error("no data connection mode negotiated")]
    NoModeSet,
    #[error("can't bind data port {port}: {source}")]
    Bind { port: u16, source: io::Error },
    #[error("timed out waiting for the client's data connection")]
    AcceptTimeout,
    #[error("data connection failed: {0}")]
    Connect(io::Error),
}

/// A resolved path does not fit the fixed path buffer.
#[derive(Debug, Error)]
#[error("path does not fit the path buffer")]
pub struct PathTooLong;
