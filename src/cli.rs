use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "lsnet",
    version,
    about = "List TCP/UDP connections together with the process that owns each socket"
)]
pub struct CliArgs {
    /// Root of the proc filesystem
    #[arg(long = "proc-root", value_name = "DIR", env = "LSNET_PROC_ROOT", default_value = "/proc")]
    pub proc_root: PathBuf,

    /// Show TCP sockets
    #[arg(short = 't', long = "tcp")]
    pub tcp: bool,

    /// Show UDP sockets
    #[arg(short = 'u', long = "udp")]
    pub udp: bool,

    /// Only IPv4 sockets
    #[arg(short = '4', long = "ipv4")]
    pub ipv4: bool,

    /// Only IPv6 sockets
    #[arg(short = '6', long = "ipv6")]
    pub ipv6: bool,

    /// States to show (comma-separated, default ESTABLISHED,LISTEN)
    #[arg(short = 's', long = "state", value_name = "STATES", conflicts_with = "all_states")]
    pub states: Option<String>,

    /// Show sockets in every state
    #[arg(short = 'a', long = "all")]
    pub all_states: bool,

    /// Select by PID (comma-separated, prefix ^ to exclude)
    #[arg(short = 'p', long = "pid", value_name = "PID")]
    pub pid: Option<String>,

    /// Select by process name (prefix match, prefix ^ to exclude)
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    pub command: Option<String>,

    /// Select by local or remote port
    #[arg(short = 'P', long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// List UID numbers instead of login names
    #[arg(short = 'l')]
    pub list_uid: bool,

    /// Print a JSON array instead of a table
    #[arg(short = 'J', long = "json")]
    pub json: bool,
}
