//! Decoding of the kernel's `/proc/net/{tcp,tcp6,udp,udp6}` tables.

pub mod address;
pub mod state;
pub mod table;

pub use address::decode_address;
pub use state::map_state;
pub use table::read_table;
