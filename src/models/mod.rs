pub mod signal;
pub mod snapshot;

pub use signal::*;
pub use snapshot::*;
