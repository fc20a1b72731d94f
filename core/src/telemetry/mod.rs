//! telemetry/mod.rs
//! Codec counters returned by package and project encodes.

pub mod counters;

pub use counters::CodecCounters;
