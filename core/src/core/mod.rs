pub mod bus;
pub mod engine;
pub mod error;

/// Emulated CPU clock cycles.
pub type Cycles = u64;
