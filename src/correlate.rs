use std::collections::BTreeSet;

use crate::model::{ConnectionRecord, ConnectionState, ProcessIdentity};
use crate::process::OwnershipIndex;

/// A connection together with the process that owns its socket.
#[derive(Debug, Clone, Copy)]
pub struct CorrelatedConnection<'a> {
    pub connection: &'a ConnectionRecord,
    pub owner: &'a ProcessIdentity,
}

/// The states reported when none are requested explicitly.
pub fn default_states() -> BTreeSet<ConnectionState> {
    BTreeSet::from([ConnectionState::Established, ConnectionState::Listen])
}

/// Join connections against the ownership index by inode.
///
/// Connections without an owner are dropped, as are those whose state is
/// not in `wanted_states`. Input order is preserved.
pub fn correlate<'a>(
    connections: &'a [ConnectionRecord],
    index: &'a OwnershipIndex,
    wanted_states: &BTreeSet<ConnectionState>,
) -> Vec<CorrelatedConnection<'a>> {
    connections
        .iter()
        .filter_map(|connection| {
            let owner = index.owner(connection.inode)?;
            wanted_states
                .contains(&connection.state)
                .then_some(CorrelatedConnection { connection, owner })
        })
        .collect()
}
