use std::io::{self, Write};

use serde::Serialize;

use crate::cli::CliArgs;
use crate::correlate::CorrelatedConnection;

/// Formats correlated connections as a table or as JSON.
pub struct OutputFormatter {
    /// `-l` flag: list UID numbers instead of login names.
    pub list_uid: bool,
    /// `-J` flag: one JSON array instead of the table.
    pub json: bool,
}

/// One JSON array element.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct JsonConnection<'a> {
    slot: u32,
    proto: String,
    src_addr: &'a str,
    src_port: u16,
    dst_addr: &'a str,
    dst_port: u16,
    state: &'static str,
    process: String,
    process_uid: Option<u32>,
}

impl<'a> From<&CorrelatedConnection<'a>> for JsonConnection<'a> {
    fn from(c: &CorrelatedConnection<'a>) -> Self {
        let conn = c.connection;
        JsonConnection {
            slot: conn.slot_number,
            proto: conn.protocol.to_string(),
            src_addr: &conn.local_address.text,
            src_port: conn.local_port,
            dst_addr: &conn.remote_address.text,
            dst_port: conn.remote_port,
            state: conn.state.label(),
            process: c.owner.to_string(),
            process_uid: c.owner.uid,
        }
    }
}

const HEADERS: [&str; 6] = ["PROTO", "LOCAL ADDRESS", "REMOTE ADDRESS", "STATE", "USER", "PROCESS"];

impl OutputFormatter {
    /// Build an `OutputFormatter` from parsed CLI arguments.
    pub fn from_cli(args: &CliArgs) -> Self {
        OutputFormatter {
            list_uid: args.list_uid,
            json: args.json,
        }
    }

    /// Print to stdout in the configured format.
    pub fn print(&self, conns: &[CorrelatedConnection<'_>]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if self.json {
            self.write_json(&mut out, conns)
        } else {
            self.write_table(&mut out, conns)
        }
    }

    pub fn write_json<W: Write>(&self, out: &mut W, conns: &[CorrelatedConnection<'_>]) -> io::Result<()> {
        let records: Vec<JsonConnection<'_>> = conns.iter().map(JsonConnection::from).collect();
        serde_json::to_writer(&mut *out, &records)?;
        writeln!(out)
    }

    /// Column-aligned table, one line per connection.
    pub fn write_table<W: Write>(&self, out: &mut W, conns: &[CorrelatedConnection<'_>]) -> io::Result<()> {
        let rows: Vec<[String; 6]> = conns.iter().map(|c| self.table_row(c)).collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        write_row(out, &HEADERS, &widths)?;
        for row in &rows {
            write_row(out, row, &widths)?;
        }
        Ok(())
    }

    fn table_row(&self, c: &CorrelatedConnection<'_>) -> [String; 6] {
        let conn = c.connection;
        [
            conn.protocol.to_string(),
            conn.local_address.with_port(conn.local_port),
            conn.remote_address.with_port(conn.remote_port),
            conn.state.to_string(),
            self.user_display(conn.owner_uid),
            c.owner.to_string(),
        ]
    }

    fn user_display(&self, uid: u32) -> String {
        if self.list_uid {
            return uid.to_string();
        }
        users::get_user_by_uid(uid)
            .map(|u| u.name().to_string_lossy().to_string())
            .unwrap_or_else(|| uid.to_string())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write cells left-aligned to `widths`, without trailing padding on the
/// last column.
fn write_row<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            writeln!(out, "{}", cell.as_ref())?;
        } else {
            write!(out, "{:<width$} ", cell.as_ref(), width = width)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
