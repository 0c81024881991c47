pub mod index;
#[cfg(target_os = "linux")]
pub mod inspect;

pub use index::OwnershipIndex;
#[cfg(target_os = "linux")]
pub use inspect::ProcessInspector;
