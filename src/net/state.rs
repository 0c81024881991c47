use crate::error::{LsnetError, Result};
use crate::model::ConnectionState;

/// Map the hex `st` column of a connection table to a state.
pub fn map_state(hex: &str) -> Result<ConnectionState> {
    u8::from_str_radix(hex, 16)
        .ok()
        .and_then(ConnectionState::from_code)
        .ok_or_else(|| LsnetError::UnknownState(hex.to_string()))
}
