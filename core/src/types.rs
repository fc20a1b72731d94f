use crate::{
    compression::CompressionError,
    crypto::CryptoError,
    dictionary::DictionaryError,
    framing::FrameError,
    limits::LimitError,
    model::ModelError,
    syntax::SyntaxError,
    utils::VarintError,
    versioning::VersionError,
};

/// Unified package error covering framing, dictionary, model, compression,
/// crypto and validation failures.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Every AEAD failure surfaces as `Crypto(CryptoError::DecryptionFailed)`.
#[derive(Debug)]
pub enum PackageError {
    Frame(FrameError),
    Dictionary(DictionaryError),
    Version(VersionError),
    Compression(CompressionError),
    Crypto(CryptoError),
    Model(ModelError),
    Syntax(SyntaxError),
    Limit(LimitError),
    Varint(VarintError),
    Json(serde_json::Error),
    Base64(base64::DecodeError),

    /// Wrapper and payload disagree on the advertised feature set.
    FeatureMismatch { wrapper: Vec<String>, payload: Vec<String> },

    /// A recorded value disagrees with the value it is bound to.
    Mismatch { field: &'static str, expected: String, found: String },

    MissingSection(&'static str),

    /// Generic high-level validation with a descriptive message.
    Validation(String),
}

impl PackageError {
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, PackageError::Crypto(CryptoError::DecryptionFailed))
    }

    pub(crate) fn mismatch(
        field: &'static str,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        PackageError::Mismatch {
            field,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

impl std::fmt::Display for PackageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageError::Frame(e) => write!(f, "frame error: {}", e),
            PackageError::Dictionary(e) => write!(f, "dictionary error: {}", e),
            PackageError::Version(e) => write!(f, "version error: {}", e),
            PackageError::Compression(e) => write!(f, "compression error: {}", e),
            PackageError::Crypto(e) => write!(f, "crypto error: {}", e),
            PackageError::Model(e) => write!(f, "payload error: {}", e),
            PackageError::Syntax(e) => write!(f, "syntax error: {}", e),
            PackageError::Limit(e) => write!(f, "{}", e),
            PackageError::Varint(e) => write!(f, "varint error: {}", e),
            PackageError::Json(e) => write!(f, "json error: {}", e),
            PackageError::Base64(e) => write!(f, "base64 error: {}", e),
            PackageError::FeatureMismatch { wrapper, payload } => write!(
                f,
                "feature mismatch: wrapper [{}], payload [{}]",
                wrapper.join(", "),
                payload.join(", ")
            ),
            PackageError::Mismatch { field, expected, found } => {
                write!(f, "{} mismatch: expected {}, found {}", field, expected, found)
            }
            PackageError::MissingSection(name) => write!(f, "missing {} section", name),
            PackageError::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for PackageError {}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for PackageError {
                fn from(e: $source) -> Self {
                    PackageError::$variant(e)
                }
            }
        )*
    };
}

impl_from! {
    FrameError => Frame,
    DictionaryError => Dictionary,
    VersionError => Version,
    CompressionError => Compression,
    CryptoError => Crypto,
    ModelError => Model,
    SyntaxError => Syntax,
    LimitError => Limit,
    VarintError => Varint,
    serde_json::Error => Json,
    base64::DecodeError => Base64,
}
