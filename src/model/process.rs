use std::collections::BTreeSet;
use std::fmt;

/// What one process exposes about itself and the sockets it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub pid: u32,
    pub name: Option<String>,
    pub uid: Option<u32>,
    pub open_socket_inodes: BTreeSet<u64>,
}

impl ProcessIdentity {
    pub fn new(pid: u32) -> Self {
        ProcessIdentity {
            pid,
            ..Default::default()
        }
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name.as_deref().unwrap_or("?"), self.pid)
    }
}
