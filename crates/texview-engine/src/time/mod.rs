//! Time subsystem.
//!
//! Deadline bookkeeping for the runtime's delayed callbacks, kept free of the
//! event loop so it can be driven with explicit `Instant`s in tests.

mod timer;

pub use timer::Timer;
