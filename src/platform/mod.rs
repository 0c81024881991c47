use std::path::PathBuf;

use crate::error::Result;
use crate::model::{ConnectionRecord, ProcessIdentity, Protocol};

pub trait PlatformProvider: Send + Sync {
    /// All rows of the selected connection tables, in table order.
    fn connection_tables(&self) -> Result<Vec<ConnectionRecord>>;
    /// Every live process with the socket inodes it holds.
    fn list_processes(&self) -> Result<Vec<ProcessIdentity>>;
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub proc_root: PathBuf,
    /// Tables to read, in this order.
    pub protocols: Vec<Protocol>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            protocols: Protocol::ALL.to_vec(),
        }
    }
}

#[cfg(target_os = "linux")]
mod linux;

pub fn create_provider(config: ProviderConfig) -> Result<Box<dyn PlatformProvider>> {
    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::LinuxProvider::new(config)))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = config;
        Err(crate::error::LsnetError::Unsupported)
    }
}
