use std::collections::HashMap;

use tracing::debug;

use crate::model::ProcessIdentity;

/// Lookup from socket inode to the process holding it open.
///
/// Built once from a full process scan and never modified afterwards.
#[derive(Debug, Default)]
pub struct OwnershipIndex {
    processes: Vec<ProcessIdentity>,
    by_inode: HashMap<u64, usize>,
}

impl OwnershipIndex {
    /// Index every socket inode of every process.
    ///
    /// An inode held by more than one process (a descriptor inherited
    /// across `fork`) is attributed to the process listed last.
    pub fn build(processes: Vec<ProcessIdentity>) -> Self {
        let mut by_inode = HashMap::new();
        for (slot, process) in processes.iter().enumerate() {
            for &inode in &process.open_socket_inodes {
                if let Some(prev) = by_inode.insert(inode, slot) {
                    let prev: &ProcessIdentity = &processes[prev];
                    if prev.pid != process.pid {
                        debug!(inode, previous = prev.pid, pid = process.pid, "socket shared between processes");
                    }
                }
            }
        }
        Self {
            processes,
            by_inode,
        }
    }

    pub fn owner(&self, inode: u64) -> Option<&ProcessIdentity> {
        self.by_inode.get(&inode).map(|&slot| &self.processes[slot])
    }

    /// Number of indexed inodes.
    pub fn len(&self) -> usize {
        self.by_inode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_inode.is_empty()
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }
}
