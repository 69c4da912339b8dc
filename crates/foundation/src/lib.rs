pub mod math;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use time::*;
