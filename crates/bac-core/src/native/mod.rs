pub mod registry;

pub use registry::{NativeFn, NativeRegistry};
