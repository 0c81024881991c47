use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use super::{decode_address, map_state};
use crate::error::{LsnetError, Result};
use crate::model::{Address, ConnectionRecord, Protocol};

// Token positions after splitting a row on whitespace:
//   sl local rem st tx:rx tr:tm retrnsmt uid timeout inode ...
const COL_SLOT: usize = 0;
const COL_LOCAL: usize = 1;
const COL_REMOTE: usize = 2;
const COL_STATE: usize = 3;
const COL_UID: usize = 7;
const COL_INODE: usize = 9;
const MIN_COLUMNS: usize = COL_INODE + 1;

/// Read one connection table file.
///
/// Failure to open or read the file is fatal; malformed rows are skipped.
pub fn read_table(path: &Path, protocol: Protocol) -> Result<Vec<ConnectionRecord>> {
    let file = File::open(path).map_err(|e| LsnetError::io(path, e))?;
    let records = parse_table(BufReader::new(file), protocol)
        .map_err(|e| match e {
            LsnetError::Io { source, .. } => LsnetError::io(path, source),
            other => other,
        })?;
    debug!(path = %path.display(), count = records.len(), "read connection table");
    Ok(records)
}

/// Parse a connection table from any line source, in a single pass.
pub fn parse_table<R: BufRead>(reader: R, protocol: Protocol) -> Result<Vec<ConnectionRecord>> {
    let mut records = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| LsnetError::io(protocol.table_name(), e))?;
        match parse_line(&line, protocol) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(LineError::Malformed(reason)) => {
                warn!(table = protocol.table_name(), line = lineno + 1, reason, "skipping malformed row");
            }
            Err(LineError::Fatal(e)) => return Err(e),
        }
    }
    Ok(records)
}

enum LineError {
    /// The row is unusable but the rest of the table is fine.
    Malformed(&'static str),
    Fatal(LsnetError),
}

impl From<LsnetError> for LineError {
    fn from(e: LsnetError) -> Self {
        LineError::Fatal(e)
    }
}

/// Parse one row. `Ok(None)` for the header and for blank lines.
fn parse_line(line: &str, protocol: Protocol) -> std::result::Result<Option<ConnectionRecord>, LineError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(slot) = tokens.get(COL_SLOT) else {
        return Ok(None);
    };

    let Ok(slot_number) = slot.trim_end_matches(':').parse::<u32>() else {
        // The column header starts with "sl".
        return Ok(None);
    };
    if tokens.len() < MIN_COLUMNS {
        return Err(LineError::Malformed("too few columns"));
    }

    let (local_address, local_port) = parse_endpoint(tokens[COL_LOCAL], protocol)?;
    let (remote_address, remote_port) = parse_endpoint(tokens[COL_REMOTE], protocol)?;
    let state = map_state(tokens[COL_STATE])?;
    let owner_uid = tokens[COL_UID]
        .parse::<u32>()
        .map_err(|_| LineError::Malformed("invalid uid"))?;
    let inode = tokens[COL_INODE]
        .parse::<u64>()
        .map_err(|_| LineError::Malformed("invalid inode"))?;

    Ok(Some(ConnectionRecord {
        protocol,
        slot_number,
        local_address,
        local_port,
        remote_address,
        remote_port,
        state,
        owner_uid,
        inode,
    }))
}

/// Split `ADDR:PORT` (both hex) into a decoded address and port.
/// The address family must match the table's.
fn parse_endpoint(token: &str, protocol: Protocol) -> std::result::Result<(Address, u16), LineError> {
    let (addr, port) = token
        .split_once(':')
        .ok_or(LineError::Malformed("endpoint without port"))?;
    let address = decode_address(addr)?;
    if address.version != protocol.version() {
        return Err(LineError::Malformed("address family does not match table"));
    }
    let port = u16::from_str_radix(port, 16).map_err(|_| LineError::Malformed("invalid port"))?;
    Ok((address, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionState, IpVersion};
    use std::io::Cursor;

    const HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode";

    fn row(local: &str, remote: &str, state: &str, uid: u32, inode: u64) -> String {
        format!(
            "   0: {} {} {} 00000000:00000000 00:00000000 00000000  {}        0 {} 1 0000000000000000 100 0 0 10 0",
            local, remote, state, uid, inode
        )
    }

    fn parse(text: &str, protocol: Protocol) -> Result<Vec<ConnectionRecord>> {
        parse_table(Cursor::new(text.to_string()), protocol)
    }

    #[test]
    fn test_loopback_http_row() {
        let text = format!("{}\n{}\n", HEADER, row("0100007F:0050", "00000000:0000", "0A", 0, 12345));
        let records = parse(&text, Protocol::Tcp).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.local_address.text, "127.0.0.1");
        assert_eq!(r.local_port, 80);
        assert_eq!(r.remote_address.text, "0.0.0.0");
        assert_eq!(r.remote_port, 0);
        assert_eq!(r.state, ConnectionState::Listen);
        assert_eq!(r.owner_uid, 0);
        assert_eq!(r.inode, 12345);
        assert_eq!(r.slot_number, 0);
        assert_eq!(r.protocol, Protocol::Tcp);
    }

    #[test]
    fn test_v6_row() {
        let text = format!(
            "{}\n{}\n",
            HEADER,
            row(
                "00000000000000000000000000000001:1F90",
                "FE800000000000000200F8FFFE2167CF:C350",
                "01",
                1000,
                42
            )
        );
        let records = parse(&text, Protocol::Tcp6).unwrap();
        let r = &records[0];
        assert_eq!(r.local_address.version, IpVersion::V6);
        assert_eq!(r.local_address.text, "::1");
        assert_eq!(r.local_port, 8080);
        assert_eq!(r.remote_address.text, "fe80::200:f8ff:fe21:67cf");
        assert_eq!(r.remote_port, 50000);
        assert_eq!(r.owner_uid, 1000);
    }

    #[test]
    fn test_header_only() {
        assert!(parse(HEADER, Protocol::Udp).unwrap().is_empty());
        assert!(parse("", Protocol::Udp).unwrap().is_empty());
    }

    #[test]
    fn test_short_row_skipped() {
        let text = format!(
            "{}\n   0: 0100007F:0050 00000000:0000 0A\n{}\n",
            HEADER,
            row("0100007F:0016", "00000000:0000", "0A", 0, 7)
        );
        let records = parse(&text, Protocol::Tcp).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].local_port, 22);
    }

    #[test]
    fn test_bad_numeric_fields_skipped() {
        let text = [
            row("0100007F:XYZ", "00000000:0000", "0A", 0, 1),
            row("0100007F:10000", "00000000:0000", "0A", 0, 2),
            row("0100007F0050", "00000000:0000", "0A", 0, 3),
            row("0100007F:0050", "00000000:0000", "0A", 0, 4).replace(" 4 1 ", " nope 1 "),
            row("0100007F:0050", "00000000:0000", "01", 0, 5),
        ]
        .join("\n");
        let records = parse(&text, Protocol::Tcp).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].inode, 5);
    }

    #[test]
    fn test_family_mismatch_skipped() {
        let text = [
            // IPv4 local address in a tcp6 table.
            row("0100007F:0050", "00000000000000000000000000000000:0000", "0A", 0, 1),
            row(
                "00000000000000000000000000000001:0050",
                "00000000000000000000000000000000:0000",
                "0A",
                0,
                2,
            ),
        ]
        .join("\n");
        let records = parse(&text, Protocol::Tcp6).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].inode, 2);
        assert_eq!(records[0].local_address.version, IpVersion::V6);

        // IPv6 remote address in a tcp table.
        let text = row("0100007F:0050", "00000000000000000000000000000000:0000", "01", 0, 3);
        assert!(parse(&text, Protocol::Tcp).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_state_is_fatal() {
        let text = format!("{}\n{}\n", HEADER, row("0100007F:0050", "00000000:0000", "0D", 0, 1));
        assert!(matches!(
            parse(&text, Protocol::Tcp),
            Err(LsnetError::UnknownState(_))
        ));
    }

    #[test]
    fn test_bad_address_length_is_fatal() {
        let text = row("0100007F00:0050", "00000000:0000", "01", 0, 1);
        assert!(matches!(
            parse(&text, Protocol::Tcp),
            Err(LsnetError::AddressLength(10))
        ));
    }

    #[test]
    fn test_order_preserved() {
        let text = (1..=5)
            .map(|i| row("0100007F:0050", "00000000:0000", "01", 0, i))
            .collect::<Vec<_>>()
            .join("\n");
        let inodes: Vec<u64> = parse(&text, Protocol::Tcp)
            .unwrap()
            .iter()
            .map(|r| r.inode)
            .collect();
        assert_eq!(inodes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcp");
        let err = read_table(&path, Protocol::Tcp).unwrap_err();
        assert!(matches!(err, LsnetError::Io { ref path, .. } if path.ends_with("tcp")));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("udp");
        std::fs::write(
            &path,
            format!("{}\n{}\n", HEADER, row("00000000:0035", "00000000:0000", "07", 101, 9)),
        )
        .unwrap();
        let records = read_table(&path, Protocol::Udp).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].state, ConnectionState::Close);
        assert_eq!(records[0].local_port, 53);
    }
}
