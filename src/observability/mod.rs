//! Observability.
//!
//! # Design Decisions
//! - The library only emits `tracing` events; installing a subscriber is left
//!   to binaries, through [`logging::init`]
//! - Introspection and cache fills log at debug, soft conversion failures at
//!   trace, migrations and saves at info

pub mod logging;
