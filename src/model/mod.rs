pub mod address;
pub mod connection;
pub mod process;

pub use address::{Address, IpVersion};
pub use connection::{ConnectionRecord, ConnectionState, Protocol};
pub use process::ProcessIdentity;
