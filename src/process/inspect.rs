use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use procfs::process::{FDTarget, Process};
use procfs::ProcResult;
use tracing::debug;

use crate::model::ProcessIdentity;

/// Reads what a single `/proc/<pid>` directory says about its process.
///
/// Nothing here is fatal: a process may exit or deny access at any point
/// during the scan, in which case the identity is simply left partial.
#[derive(Debug, Clone)]
pub struct ProcessInspector {
    proc_root: PathBuf,
}

/// The two fields taken from `/proc/<pid>/status`.
#[derive(Debug, Default, PartialEq, Eq)]
struct StatusFields {
    name: Option<String>,
    uid: Option<u32>,
}

impl ProcessInspector {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    pub fn inspect(&self, process: &Process) -> ProcessIdentity {
        let pid = process.pid as u32;
        let status_path = self.proc_root.join(pid.to_string()).join("status");

        let status = match fs::read_to_string(&status_path) {
            Ok(text) => parse_status(&text),
            Err(e) => {
                debug!(pid, error = %e, "status unreadable");
                StatusFields::default()
            }
        };

        let open_socket_inodes = match socket_inodes(process) {
            Ok(inodes) => inodes,
            Err(e) => {
                debug!(pid, error = %e, "fd directory unreadable");
                BTreeSet::new()
            }
        };

        ProcessIdentity {
            pid,
            name: status.name,
            uid: status.uid,
            open_socket_inodes,
        }
    }
}

fn parse_status(text: &str) -> StatusFields {
    let mut fields = StatusFields::default();
    for line in text.lines() {
        if fields.name.is_none() {
            if let Some(rest) = line.strip_prefix("Name:") {
                let name = rest.trim();
                if !name.is_empty() {
                    fields.name = Some(name.to_string());
                }
                continue;
            }
        }
        if fields.uid.is_none() {
            if let Some(rest) = line.strip_prefix("Uid:") {
                // Real, effective, saved and filesystem uid; the first is the real one.
                fields.uid = rest.split_whitespace().next().and_then(|t| t.parse().ok());
            }
        }
        if fields.name.is_some() && fields.uid.is_some() {
            break;
        }
    }
    fields
}

/// Collect the inodes of every socket descriptor the process holds.
///
/// Only failing to list the fd directory is reported; descriptors that
/// close or become unreadable mid-scan are skipped.
fn socket_inodes(process: &Process) -> ProcResult<BTreeSet<u64>> {
    let mut inodes = BTreeSet::new();
    for fd_info in process.fd()? {
        let fd_info = match fd_info {
            Ok(fi) => fi,
            Err(_) => continue,
        };
        if let FDTarget::Socket(inode) = fd_info.target {
            inodes.insert(inode);
        }
    }
    Ok(inodes)
}
