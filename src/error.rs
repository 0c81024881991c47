use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LsnetError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid address length: {0} hex characters (expected 8 or 32)")]
    AddressLength(usize),
    #[error("Invalid hex address: {0}")]
    InvalidHex(String),
    #[error("Unknown connection state code: {0}")]
    UnknownState(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Platform error: {0}")]
    Platform(String),
    #[allow(dead_code)]
    #[error("Unsupported platform: procfs is required")]
    Unsupported,
}

impl LsnetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LsnetError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LsnetError>;
