use std::io::ErrorKind;

use tracing::debug;

use super::{PlatformProvider, ProviderConfig};
use crate::error::{LsnetError, Result};
use crate::model::{ConnectionRecord, ProcessIdentity};
use crate::net::read_table;
use crate::process::ProcessInspector;

pub struct LinuxProvider {
    config: ProviderConfig,
    inspector: ProcessInspector,
}

impl LinuxProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let inspector = ProcessInspector::new(&config.proc_root);
        Self { config, inspector }
    }
}

impl PlatformProvider for LinuxProvider {
    fn connection_tables(&self) -> Result<Vec<ConnectionRecord>> {
        let net_dir = self.config.proc_root.join("net");
        let mut records = Vec::new();

        for &protocol in &self.config.protocols {
            let path = net_dir.join(protocol.table_name());
            match read_table(&path, protocol) {
                Ok(rows) => records.extend(rows),
                // Kernels without IPv6 have no tcp6/udp6.
                Err(LsnetError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "connection table absent");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }

    fn list_processes(&self) -> Result<Vec<ProcessIdentity>> {
        let all_procs = procfs::process::all_processes_with_root(&self.config.proc_root)
            .map_err(|e| LsnetError::Platform(e.to_string()))?;

        let mut processes = Vec::new();
        for proc_result in all_procs {
            let proc = match proc_result {
                Ok(p) => p,
                Err(_) => continue,
            };
            processes.push(self.inspector.inspect(&proc));
        }

        debug!(count = processes.len(), "inspected processes");
        Ok(processes)
    }
}
