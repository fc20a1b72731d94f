//! Package assembly, sealing and decoding.
//!
//! Responsibilities:
//! - Section payload formats inside the `MCS\0` payload frame
//! - Metadata binding and the `QYN1` wrapper document
//! - Single-file and project-wide encode, authenticated decode
//!
//! Non-responsibilities:
//! - Entropy coding (see `compression`)
//! - Key derivation and AEAD primitives (see `crypto`)

pub mod assemble;
pub mod metadata;
pub mod project;
pub mod sections;
pub mod wrapper;

pub use assemble::{
    assemble_payload, decode_package, encode_package, encode_package_with, encode_source,
    inspect_package, seal_descriptor, DecodedPackage, EncodedPackage, PackageDescriptor,
    PackageInfo,
};
pub use metadata::{utc_timestamp, PackageMetadata};
pub use project::{encode_project, ProjectEncodeReport};
pub use sections::{ChannelBlob, CompressionSection, PayloadRecord, StreamHeader};
pub use wrapper::{read_wrapper, WrapperDocument};
