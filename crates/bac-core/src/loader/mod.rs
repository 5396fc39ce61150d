pub mod loader;

pub use loader::{offer, version, BytecodeLoader, VERSION_MAJOR, VERSION_MINOR};
