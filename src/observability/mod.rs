//! Observability subsystem.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! host's decision. `logging::init` is the default used by the bundled CLI.

pub mod logging;
