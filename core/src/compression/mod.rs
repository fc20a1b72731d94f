//! compression/mod.rs
//! Entropy coding of token and payload streams.
//!
//! Design notes:
//! - Backends are looked up by wire name; the name and the canonical model
//!   digest are bound into package metadata.
//! - Models are pure data (`ModelSpec`) so they serialize into the
//!   compression section and digest deterministically.
//! - Modes are presets over backend, precision, token optimisation and
//!   sharing scope.

pub mod chunked;
pub mod config;
pub mod fse;
pub mod optimisation;
pub mod project;
pub mod rans;
pub mod registry;
pub mod types;

pub use chunked::ChunkedRansBackend;
pub use fse::FseBackend;
pub use config::{
    available_modes, CompressionConfig, CompressionExtras, CompressionMode, SharingScope,
    TokenOptimisation,
};
pub use optimisation::{OptimisationMetadata, TokenOptimisationPlan};
pub use project::{ProjectAssets, ProjectCompressionPlanner};
pub use rans::{RansCodec, RansTable};
pub use registry::{
    available_backends, get_backend, resolve, BackendInfo, BackendOptions, RansBackend,
    BACKEND_CHUNKED_RANS, BACKEND_DUDA, BACKEND_FSE, BACKEND_FSE_PRODUCTION, BACKEND_RANS,
};
pub use types::*;
