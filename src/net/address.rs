use std::net::Ipv4Addr;

use crate::error::{LsnetError, Result};
use crate::model::Address;

/// Decode a packed hex address from a connection table.
///
/// 8 hex characters are an IPv4 address stored least-significant byte
/// first. 32 hex characters are an IPv6 address read as eight 16-bit
/// groups in the order given. Any other length is an error.
pub fn decode_address(hex: &str) -> Result<Address> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(LsnetError::InvalidHex(hex.to_string()));
    }

    match hex.len() {
        8 => Ok(Address::v4(decode_v4(hex)?.to_string())),
        32 => Ok(Address::v6(format_v6(&decode_v6_groups(hex)?))),
        n => Err(LsnetError::AddressLength(n)),
    }
}

fn decode_v4(hex: &str) -> Result<Ipv4Addr> {
    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = parse_hex_u8(&hex[i * 2..i * 2 + 2], hex)?;
    }
    octets.reverse();
    Ok(Ipv4Addr::from(octets))
}

fn decode_v6_groups(hex: &str) -> Result<[u16; 8]> {
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = u16::from_str_radix(&hex[i * 4..i * 4 + 4], 16)
            .map_err(|_| LsnetError::InvalidHex(hex.to_string()))?;
    }
    Ok(groups)
}

fn parse_hex_u8(pair: &str, whole: &str) -> Result<u8> {
    u8::from_str_radix(pair, 16).map_err(|_| LsnetError::InvalidHex(whole.to_string()))
}

/// Canonical text for eight IPv6 groups.
///
/// The first longest run of zero groups collapses to `::`; every other
/// group is printed in lowercase hex without leading zeros.
fn format_v6(groups: &[u16; 8]) -> String {
    let join = |slice: &[u16]| {
        slice
            .iter()
            .map(|g| format!("{:x}", g))
            .collect::<Vec<_>>()
            .join(":")
    };

    match longest_zero_run(groups) {
        Some((start, len)) => format!(
            "{}::{}",
            join(&groups[..start]),
            join(&groups[start + len..])
        ),
        None => join(groups),
    }
}

/// `(start, len)` of the first maximal run of zero groups, if any.
fn longest_zero_run(groups: &[u16]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut run_start = None;

    for (i, &g) in groups.iter().enumerate() {
        if g == 0 {
            let start = *run_start.get_or_insert(i);
            let len = i - start + 1;
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((start, len));
            }
        } else {
            run_start = None;
        }
    }

    best
}
