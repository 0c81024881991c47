use std::collections::BTreeSet;

use crate::cli::CliArgs;
use crate::correlate::{default_states, CorrelatedConnection};
use crate::error::{LsnetError, Result};
use crate::model::{ConnectionState, IpVersion, Protocol};

/// Selection criteria built from CLI arguments.
#[derive(Debug)]
pub struct FilterConfig {
    pub states: BTreeSet<ConnectionState>,
    pub protocols: Vec<Protocol>,
    pub pids: Option<PidFilter>,
    pub commands: Option<CommandFilter>,
    pub port: Option<u16>,
}

/// PID-based filter with include/exclude lists.
#[derive(Debug, Default)]
pub struct PidFilter {
    pub include: Vec<u32>,
    pub exclude: Vec<u32>,
}

/// Process-name filter with include/exclude lists (prefix match).
#[derive(Debug, Default)]
pub struct CommandFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse a PID filter string.
///
/// Format: comma-separated PIDs, prefix `^` to exclude.
/// Examples: "1234,5678", "^1234", "1234,^5678"
fn parse_pid_filter(s: &str) -> Result<PidFilter> {
    let mut filter = PidFilter::default();
    for token in s.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (list, digits) = match token.strip_prefix('^') {
            Some(rest) => (&mut filter.exclude, rest),
            None => (&mut filter.include, token),
        };
        let pid: u32 = digits
            .parse()
            .map_err(|_| LsnetError::InvalidFilter(format!("invalid PID: {}", digits)))?;
        list.push(pid);
    }
    Ok(filter)
}

fn parse_command_filter(s: &str) -> CommandFilter {
    let mut filter = CommandFilter::default();
    let token = s.trim();
    if token.is_empty() {
        return filter;
    }
    if let Some(rest) = token.strip_prefix('^') {
        filter.exclude.push(rest.to_string());
    } else {
        filter.include.push(token.to_string());
    }
    filter
}

/// Parse a comma-separated list of state names.
fn parse_states(s: &str) -> Result<BTreeSet<ConnectionState>> {
    let states = s
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.parse::<ConnectionState>())
        .collect::<Result<BTreeSet<_>>>()?;
    if states.is_empty() {
        return Err(LsnetError::InvalidFilter("empty state list".to_string()));
    }
    Ok(states)
}

/// Tables to read for the given protocol and family flags.
/// With neither flag of a pair set, both sides are selected.
fn select_protocols(tcp: bool, udp: bool, v4: bool, v6: bool) -> Vec<Protocol> {
    let any_proto = !tcp && !udp;
    let any_family = !v4 && !v6;
    Protocol::ALL
        .into_iter()
        .filter(|p| any_proto || if p.is_tcp() { tcp } else { udp })
        .filter(|p| {
            any_family
                || match p.version() {
                    IpVersion::V4 => v4,
                    IpVersion::V6 => v6,
                }
        })
        .collect()
}

impl FilterConfig {
    /// Build a `FilterConfig` from parsed CLI arguments.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let states = if args.all_states {
            ConnectionState::ALL.into_iter().collect()
        } else {
            match &args.states {
                Some(s) => parse_states(s)?,
                None => default_states(),
            }
        };

        let pids = match &args.pid {
            Some(s) => Some(parse_pid_filter(s)?),
            None => None,
        };

        Ok(FilterConfig {
            states,
            protocols: select_protocols(args.tcp, args.udp, args.ipv4, args.ipv6),
            pids,
            commands: args.command.as_deref().map(parse_command_filter),
            port: args.port,
        })
    }

    /// Check a correlated connection against the PID, command and port
    /// filters. Every active filter must match.
    pub fn matches(&self, conn: &CorrelatedConnection<'_>) -> bool {
        self.check_pid(conn) && self.check_command(conn) && self.check_port(conn)
    }

    // -- private helpers --

    fn check_pid(&self, conn: &CorrelatedConnection<'_>) -> bool {
        match &self.pids {
            None => true,
            Some(f) => {
                let pid = conn.owner.pid;
                if f.exclude.contains(&pid) {
                    return false;
                }
                f.include.is_empty() || f.include.contains(&pid)
            }
        }
    }

    fn check_command(&self, conn: &CorrelatedConnection<'_>) -> bool {
        match &self.commands {
            None => true,
            Some(f) => {
                let name = conn.owner.name.as_deref().unwrap_or("");
                if f.exclude.iter().any(|c| name.starts_with(c.as_str())) {
                    return false;
                }
                f.include.is_empty() || f.include.iter().any(|c| name.starts_with(c.as_str()))
            }
        }
    }

    fn check_port(&self, conn: &CorrelatedConnection<'_>) -> bool {
        match self.port {
            None => true,
            Some(port) => conn.connection.local_port == port || conn.connection.remote_port == port,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
