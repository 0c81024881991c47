#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

const HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";

/// A throwaway directory laid out like `/proc`.
pub struct FakeProc {
    dir: TempDir,
}

impl FakeProc {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("net")).expect("create net dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `net/<name>` with a header and the given rows.
    pub fn table(&self, name: &str, rows: &[String]) -> &Self {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        fs::write(self.path().join("net").join(name), text).expect("write table");
        self
    }

    /// Create `<pid>/status` and one `socket:[inode]` fd link per inode.
    pub fn process(&self, pid: u32, name: &str, uid: u32, inodes: &[u64]) -> &Self {
        let dir = self.path().join(pid.to_string());
        fs::create_dir_all(dir.join("fd")).expect("create fd dir");
        fs::write(
            dir.join("status"),
            format!("Name:\t{name}\nState:\tS (sleeping)\nPid:\t{pid}\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\n"),
        )
        .expect("write status");
        symlink("/dev/null", dir.join("fd").join("0")).expect("link fd 0");
        for (i, inode) in inodes.iter().enumerate() {
            symlink(format!("socket:[{inode}]"), dir.join("fd").join((i + 3).to_string()))
                .expect("link socket fd");
        }
        self
    }

    pub fn lsnet(&self) -> Command {
        let mut cmd = Command::cargo_bin("lsnet").expect("binary built");
        cmd.env_remove("RUST_LOG")
            .env_remove("LSNET_PROC_ROOT")
            .arg("--proc-root")
            .arg(self.path());
        cmd
    }
}

/// One table row in the kernel's layout.
pub fn row(slot: u32, local: &str, remote: &str, state: &str, uid: u32, inode: u64) -> String {
    format!(
        "{slot:4}: {local} {remote} {state} 00000000:00000000 00:00000000 00000000 {uid:5}        0 {inode} 1 0000000000000000 100 0 0 10 0"
    )
}

/// Parse the JSON array printed by `lsnet -J`.
pub fn json_records(stdout: &[u8]) -> Vec<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_slice(stdout).expect("valid JSON");
    value.as_array().expect("JSON array").clone()
}
