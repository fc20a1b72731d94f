//! package/assemble.rs
//! Token stream <-> sealed QYN1 package.
//!
//! Design notes:
//! - Assembly (sections + payload frame + metadata) is split from sealing so a
//!   descriptor can be re-encrypted without being re-assembled.
//! - Decode checks run in a fixed order; every check that needs the plaintext
//!   runs after the AEAD has authenticated it.
//! - Any AEAD failure surfaces as `CryptoError::DecryptionFailed`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::compression::{
    get_backend, BackendOptions, CompressionConfig, CompressionExtras, ProjectAssets, RansBackend,
    TokenOptimisation, TokenOptimisationPlan, BACKEND_FSE,
};
use crate::config::{DecodeOptions, EncodeOptions};
use crate::constants::{channel_bits, PAYLOAD_MAGIC};
use crate::crypto::{build_metadata_aad, open, seal, AeadAlgorithm, KdfParameters};
use crate::dictionary::{DictionaryRegistry, MorphemeDictionary};
use crate::framing::{
    decode_sections, encode_sections, index_sections, read_frame, write_frame, FeatureFlags,
    Section, SectionId, SectionView,
};
use crate::limits::ResourceBudget;
use crate::model::{PayloadChannels, SourceMap, StringTable, TokenStream};
use crate::package::metadata::{utc_timestamp, PackageMetadata};
use crate::package::sections::{
    blob_section, read_blob, ChannelBlob, CompressionSection, PayloadRecord, StreamHeader,
};
use crate::package::wrapper::{read_wrapper, WrapperDocument};
use crate::syntax::{SourceFrontEnd, StreamEncoder};
use crate::telemetry::counters::CodecCounters;
use crate::types::PackageError;
use crate::utils::canonical_json;
use crate::versioning::{negotiate_version, parse_any_version, Version, CURRENT_PACKAGE_VERSION};

/// An assembled, not yet encrypted, package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    pub payload_version: Version,
    pub features: FeatureFlags,
    pub metadata: PackageMetadata,
    pub payload_frame: Vec<u8>,
    pub counters: CodecCounters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPackage {
    pub bytes: Vec<u8>,
    pub counters: CodecCounters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPackage {
    pub stream: TokenStream,
    pub metadata: PackageMetadata,
    pub package_version: Version,
    pub payload_version: Version,
    pub features: FeatureFlags,
    pub extras: Option<CompressionExtras>,
}

/// What can be learned from a package without the passphrase.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    pub package_version: Version,
    pub payload_version: Version,
    pub features: Vec<String>,
    pub metadata: PackageMetadata,
    pub aead: AeadAlgorithm,
    pub kdf_parameters: KdfParameters,
}

// -----------------------------------------------------------------------------
// Encode
// -----------------------------------------------------------------------------

fn token_plan(
    stream: &TokenStream,
    config: &CompressionConfig,
    assets: &ProjectAssets,
) -> Option<Arc<TokenOptimisationPlan>> {
    match config.token_optimisation {
        TokenOptimisation::None => None,
        TokenOptimisation::FrequencyDense => match (&assets.token_plan, config.project_token_plan) {
            (Some(shared), true) => Some(Arc::clone(shared)),
            _ => TokenOptimisationPlan::build(&stream.tokens).map(Arc::new),
        },
    }
}

fn string_table(
    stream: &TokenStream,
    config: &CompressionConfig,
    assets: &ProjectAssets,
) -> Arc<StringTable> {
    match (&assets.string_table, config.shared_string_table) {
        (Some(shared), true) => Arc::clone(shared),
        _ => {
            let mut values = Vec::new();
            stream.payloads.collect_strings(&mut values);
            Arc::new(StringTable::build(values))
        }
    }
}

fn channel_sections(
    payloads: &PayloadChannels,
    table: &StringTable,
    precision_bits: u32,
) -> Result<Vec<Section>, PackageError> {
    let backend = RansBackend::new(precision_bits)?;
    let bits = payloads.channel_bits();
    let mut sections = Vec::new();

    if bits & channel_bits::IDENTIFIERS != 0 {
        let indices = payloads
            .identifiers
            .iter()
            .map(|s| table.index_for(s).map(|i| i as u64))
            .collect::<Result<Vec<_>, _>>()?;
        sections.push(
            ChannelBlob::encode_varints(&backend, indices, false)?
                .to_section(SectionId::ChannelIdentifiers)?,
        );
    }
    if bits & channel_bits::STRINGS != 0 {
        let indices = payloads
            .strings
            .iter()
            .map(|s| table.index_for(s).map(|i| i as u64))
            .collect::<Result<Vec<_>, _>>()?;
        sections.push(
            ChannelBlob::encode_varints(&backend, indices, false)?
                .to_section(SectionId::ChannelStrings)?,
        );
    }
    if bits & channel_bits::NUMBERS != 0 {
        sections.push(
            ChannelBlob::encode_signed(&backend, &payloads.numbers)?
                .to_section(SectionId::ChannelNumbers)?,
        );
    }
    if bits & channel_bits::COUNTS != 0 {
        sections.push(
            ChannelBlob::encode_varints(&backend, payloads.counts.iter().copied(), false)?
                .to_section(SectionId::ChannelCounts)?,
        );
    }
    if bits & channel_bits::FLAGS != 0 {
        sections.push(
            ChannelBlob::encode_flags(&backend, &payloads.flags)?
                .to_section(SectionId::ChannelFlags)?,
        );
    }
    Ok(sections)
}

/// Build the payload frame and metadata for one stream.
pub fn assemble_payload(
    stream: &TokenStream,
    dictionary: &MorphemeDictionary,
    config: &CompressionConfig,
    assets: &ProjectAssets,
    options: &EncodeOptions,
) -> Result<PackageDescriptor, PackageError> {
    stream.validate()?;
    if stream.dictionary_version != dictionary.version() {
        return Err(PackageError::mismatch(
            "dictionary_version",
            dictionary.version(),
            &stream.dictionary_version,
        ));
    }
    // Also proves every token is in range.
    let raw_bits = dictionary.static_code_bits(&stream.tokens)?;
    let symbol_count = u32::try_from(stream.tokens.len()).map_err(|_| {
        PackageError::Validation(format!("{} tokens exceed u32", stream.tokens.len()))
    })?;
    let payload_version = negotiate_version(Some(options.preferred_versions.as_slice()))?;

    // --- Tokens ---
    let plan = token_plan(stream, config, assets);
    let (symbols, alphabet) = match &plan {
        Some(plan) => (plan.apply(&stream.tokens)?, plan.alphabet_size()),
        None => (stream.tokens.clone(), dictionary.len()),
    };
    let backend = config.backend()?;
    let (compressed, model) = backend.compress(&symbols, alphabet)?;
    debug!(
        backend = backend.name(),
        mode = %config.mode,
        symbols = symbols.len(),
        alphabet,
        compressed = compressed.len(),
        "tokens compressed"
    );
    let extras = CompressionExtras {
        mode: config.mode,
        scope: config.scope,
        optimisation: plan.as_ref().map(|p| p.to_metadata()),
    };
    let compression = CompressionSection::new(backend.name(), symbol_count, model, Some(extras))?;

    // --- Payloads ---
    let table = string_table(stream, config, assets);
    let structured = stream
        .payloads
        .structured
        .iter()
        .map(|v| table.encode_value(v))
        .collect::<Result<Vec<_>, _>>()?;
    let record = PayloadRecord::new(
        stream.payloads.channel_bits(),
        stream.payloads.entries.clone(),
        structured,
    );

    let metadata = PackageMetadata {
        package_version: payload_version.text(),
        dictionary_version: stream.dictionary_version.clone(),
        encoder_version: stream.encoder_version.clone(),
        source_language: stream.source_language.clone(),
        source_language_version: stream.source_language_version.clone(),
        source_hash: stream.source_hash.clone(),
        compression_backend: compression.backend.clone(),
        compression_model_digest: compression.digest(),
        symbol_count: u64::from(symbol_count),
        author: stream.author.clone(),
        license: stream.license.clone(),
        timestamp: stream
            .timestamp
            .clone()
            .or_else(|| options.record_timestamp.then(utc_timestamp)),
        source_encoding: stream.source_encoding.clone(),
        key_management: stream.key_management.clone(),
    };
    metadata.validate()?;

    let mut features = FeatureFlags::COMPRESSION_EXTRAS;
    if plan.is_some() {
        features |= FeatureFlags::COMPRESSION_OPTIMISATION;
    }
    if stream.source_map.is_some() {
        features |= FeatureFlags::PAYLOAD_SOURCE_MAP;
    }
    if compression.backend == BACKEND_FSE {
        features |= FeatureFlags::COMPRESSION_FSE;
    }

    // --- Sections, canonical order ---
    let header = StreamHeader {
        dictionary_version: stream.dictionary_version.clone(),
        encoder_version: stream.encoder_version.clone(),
        source_language: stream.source_language.clone(),
        source_language_version: stream.source_language_version.clone(),
        symbol_count,
        source_hash: stream.source_hash.clone(),
        has_source_map: stream.source_map.is_some(),
    };
    let mut sections = vec![
        header.to_section()?,
        compression.to_section()?,
        blob_section(SectionId::Tokens, &compressed)?,
        blob_section(SectionId::StringTable, &table.to_bytes()?)?,
        record.to_section()?,
    ];
    sections.extend(channel_sections(&stream.payloads, &table, config.precision_bits)?);
    if let Some(map) = &stream.source_map {
        sections.push(blob_section(SectionId::SourceMap, &map.to_bytes()?)?);
    }
    sections.push(blob_section(SectionId::Metadata, &canonical_json(&metadata)?)?);

    let body = encode_sections(&sections)?;
    let payload_frame = write_frame(PAYLOAD_MAGIC, payload_version, features, &body)?;
    debug!(
        version = %payload_version,
        sections = sections.len(),
        bytes = payload_frame.len(),
        "payload frame written"
    );

    let mut counters = CodecCounters::default();
    counters.add_payload(
        stream.tokens.len(),
        stream.payloads.len(),
        raw_bits,
        compressed.len(),
        payload_frame.len(),
    );

    Ok(PackageDescriptor {
        payload_version,
        features,
        metadata,
        payload_frame,
        counters,
    })
}

/// Encrypt an assembled descriptor with fresh randomness.
pub fn seal_descriptor(
    descriptor: &PackageDescriptor,
    passphrase: &[u8],
    aead: AeadAlgorithm,
    kdf: &KdfParameters,
) -> Result<EncodedPackage, PackageError> {
    let aad = build_metadata_aad(&descriptor.metadata)?;
    let envelope = seal(&descriptor.payload_frame, passphrase, &aad, aead, kdf)?;
    let document = WrapperDocument::new(
        CURRENT_PACKAGE_VERSION,
        descriptor.payload_version,
        descriptor.features,
        &descriptor.metadata,
        &envelope,
    )?;
    let bytes = document.to_frame(descriptor.features)?;
    let mut counters = descriptor.counters.clone();
    counters.add_wrapper(bytes.len());
    Ok(EncodedPackage { bytes, counters })
}

pub fn encode_package_with(
    stream: &TokenStream,
    passphrase: &[u8],
    options: &EncodeOptions,
    registry: &DictionaryRegistry,
    assets: &ProjectAssets,
) -> Result<EncodedPackage, PackageError> {
    let config = options.compression_config()?;
    let dictionary = registry.get(&stream.dictionary_version)?;
    let descriptor = assemble_payload(stream, &dictionary, &config, assets, options)?;
    seal_descriptor(&descriptor, passphrase, options.aead, &options.kdf)
}

/// Encode one stream into a sealed package using the shared dictionary registry.
pub fn encode_package(
    stream: &TokenStream,
    passphrase: &[u8],
    options: &EncodeOptions,
) -> Result<Vec<u8>, PackageError> {
    let encoded = encode_package_with(
        stream,
        passphrase,
        options,
        DictionaryRegistry::global(),
        &ProjectAssets::default(),
    )?;
    Ok(encoded.bytes)
}

/// Parse `source` with `front_end` and package the result.
pub fn encode_source(
    front_end: &dyn SourceFrontEnd,
    source: &str,
    dictionary_version: &str,
    passphrase: &[u8],
    options: &EncodeOptions,
    registry: &DictionaryRegistry,
) -> Result<EncodedPackage, PackageError> {
    let dictionary = registry.get(dictionary_version)?;
    let stream = StreamEncoder::new(dictionary)
        .strict(options.strict)
        .with_source_map(options.include_source_map)
        .encode_source(front_end, source)?;
    encode_package_with(&stream, passphrase, options, registry, &ProjectAssets::default())
}

// -----------------------------------------------------------------------------
// Decode
// -----------------------------------------------------------------------------

fn required<'a>(
    sections: &BTreeMap<SectionId, SectionView<'a>>,
    id: SectionId,
    name: &'static str,
) -> Result<SectionView<'a>, PackageError> {
    sections.get(&id).copied().ok_or(PackageError::MissingSection(name))
}

fn channel<'a>(
    sections: &BTreeMap<SectionId, SectionView<'a>>,
    bits: u32,
    bit: u32,
    id: SectionId,
    name: &'static str,
    budget: &ResourceBudget,
) -> Result<Option<ChannelBlob>, PackageError> {
    match (bits & bit != 0, sections.get(&id)) {
        (true, Some(view)) => Ok(Some(ChannelBlob::parse(view, budget)?)),
        (true, None) => Err(PackageError::MissingSection(name)),
        (false, Some(_)) => Err(PackageError::Validation(format!(
            "{} channel present but not advertised",
            name
        ))),
        (false, None) => Ok(None),
    }
}

fn strings_for(table: &StringTable, indices: Vec<u64>) -> Result<Vec<String>, PackageError> {
    indices
        .into_iter()
        .map(|i| -> Result<String, PackageError> {
            Ok(table.string_for_index(i as usize)?.to_string())
        })
        .collect()
}

fn check_extras(
    features: FeatureFlags,
    extras: Option<&CompressionExtras>,
) -> Result<(), PackageError> {
    let has_extras = extras.is_some();
    let has_plan = extras.map(|e| e.optimisation.is_some()).unwrap_or(false);
    if features.contains(FeatureFlags::COMPRESSION_EXTRAS) != has_extras {
        return Err(PackageError::mismatch(
            "compression:extras",
            features.contains(FeatureFlags::COMPRESSION_EXTRAS),
            has_extras,
        ));
    }
    if features.contains(FeatureFlags::COMPRESSION_OPTIMISATION) != has_plan {
        return Err(PackageError::mismatch(
            "compression:optimisation",
            features.contains(FeatureFlags::COMPRESSION_OPTIMISATION),
            has_plan,
        ));
    }
    Ok(())
}

/// Decode an authenticated payload frame body against the wrapper metadata.
fn decode_payload_body(
    body: &[u8],
    features: FeatureFlags,
    metadata: &PackageMetadata,
    registry: &DictionaryRegistry,
    budget: &ResourceBudget,
) -> Result<(TokenStream, Option<CompressionExtras>), PackageError> {
    let sections = index_sections(decode_sections(body)?)?;
    debug!(sections = sections.len(), "payload sections decoded");

    let metadata_view = required(&sections, SectionId::Metadata, "metadata")?;
    let embedded: PackageMetadata = serde_json::from_slice(read_blob("metadata", &metadata_view)?)?;
    if &embedded != metadata {
        return Err(PackageError::Validation(
            "metadata section disagrees with wrapper metadata".into(),
        ));
    }

    // --- Header and compression against metadata ---
    let header =
        StreamHeader::parse(&required(&sections, SectionId::StreamHeader, "stream header")?)?;
    let compression_view = required(&sections, SectionId::Compression, "compression")?;
    let compression = CompressionSection::parse(&compression_view, budget)?;
    if compression.backend != metadata.compression_backend {
        return Err(PackageError::mismatch(
            "compression_backend",
            &metadata.compression_backend,
            &compression.backend,
        ));
    }
    let digest = compression.digest();
    if digest != metadata.compression_model_digest {
        return Err(PackageError::mismatch(
            "compression_model_digest",
            &metadata.compression_model_digest,
            digest,
        ));
    }
    let counts = [
        ("symbol_count", header.symbol_count),
        ("compression symbol_count", compression.symbol_count),
    ];
    for (field, found) in counts {
        if u64::from(found) != metadata.symbol_count {
            return Err(PackageError::mismatch(field, metadata.symbol_count, found));
        }
    }
    let bound = [
        ("dictionary_version", &header.dictionary_version, &metadata.dictionary_version),
        ("encoder_version", &header.encoder_version, &metadata.encoder_version),
        ("source_language", &header.source_language, &metadata.source_language),
        (
            "source_language_version",
            &header.source_language_version,
            &metadata.source_language_version,
        ),
        ("source_hash", &header.source_hash, &metadata.source_hash),
    ];
    for (field, found, expected) in bound {
        if found != expected {
            return Err(PackageError::mismatch(field, expected, found));
        }
    }
    let has_map_section = sections.contains_key(&SectionId::SourceMap);
    let advertised_map = features.contains(FeatureFlags::PAYLOAD_SOURCE_MAP);
    if header.has_source_map != advertised_map || has_map_section != advertised_map {
        return Err(PackageError::Validation(
            "source map flag, feature and section disagree".into(),
        ));
    }
    check_extras(features, compression.extras.as_ref())?;

    let dictionary = registry.get(&header.dictionary_version)?;

    // --- Tokens ---
    let symbol_count = header.symbol_count as usize;
    budget.ensure_symbols(symbol_count)?;
    let token_bytes = read_blob("tokens", &required(&sections, SectionId::Tokens, "tokens")?)?;
    budget.ensure_compressed(token_bytes.len())?;
    let backend = get_backend(
        &compression.backend,
        BackendOptions {
            precision_bits: compression.model.precision_bits(),
            ..BackendOptions::default()
        },
    )?;
    let symbols = backend.decode(token_bytes, &compression.model, symbol_count)?;
    let plan = match compression.extras.as_ref().and_then(|e| e.optimisation.as_ref()) {
        Some(meta) => Some(TokenOptimisationPlan::from_metadata(meta)?),
        None => None,
    };
    let tokens = match &plan {
        Some(plan) => plan.restore(&symbols)?,
        None => symbols,
    };
    if let Some(bad) = tokens.iter().find(|t| **t as usize >= dictionary.len()) {
        return Err(PackageError::Validation(format!(
            "token {} outside dictionary '{}' of {} entries",
            bad,
            dictionary.version(),
            dictionary.len()
        )));
    }

    // --- String table, payload record, channels ---
    let table_view = required(&sections, SectionId::StringTable, "string table")?;
    let table_bytes = read_blob("string table", &table_view)?;
    budget.ensure_string_table(table_bytes.len())?;
    let table = StringTable::from_bytes_with_budget(table_bytes, budget)?;
    let record_view = required(&sections, SectionId::PayloadRecord, "payload record")?;
    let record = PayloadRecord::parse(&record_view, budget)?;
    let bits = record.channel_bits;

    let mut payloads = PayloadChannels::new();
    payloads.entries = record.entries;
    if let Some(blob) = channel(
        &sections,
        bits,
        channel_bits::IDENTIFIERS,
        SectionId::ChannelIdentifiers,
        "identifier",
        budget,
    )? {
        payloads.identifiers = strings_for(&table, blob.decode_varints(false, budget)?)?;
    }
    if let Some(blob) = channel(
        &sections,
        bits,
        channel_bits::STRINGS,
        SectionId::ChannelStrings,
        "string",
        budget,
    )? {
        payloads.strings = strings_for(&table, blob.decode_varints(false, budget)?)?;
    }
    if let Some(blob) = channel(
        &sections,
        bits,
        channel_bits::NUMBERS,
        SectionId::ChannelNumbers,
        "number",
        budget,
    )? {
        payloads.numbers = blob.decode_signed(budget)?;
    }
    if let Some(blob) = channel(
        &sections,
        bits,
        channel_bits::COUNTS,
        SectionId::ChannelCounts,
        "count",
        budget,
    )? {
        payloads.counts = blob.decode_varints(false, budget)?;
    }
    if let Some(blob) = channel(
        &sections,
        bits,
        channel_bits::FLAGS,
        SectionId::ChannelFlags,
        "flag",
        budget,
    )? {
        payloads.flags = blob.decode_flags(budget)?;
    }
    payloads.structured = record
        .structured_channel
        .iter()
        .map(|v| table.decode_value(v))
        .collect::<Result<Vec<_>, _>>()?;
    if payloads.channel_bits() != bits {
        return Err(PackageError::mismatch(
            "channel_bits",
            format!("0x{:02x}", bits),
            format!("0x{:02x}", payloads.channel_bits()),
        ));
    }

    // --- Source map ---
    let source_map = match sections.get(&SectionId::SourceMap) {
        Some(view) => {
            let blob = read_blob("source map", view)?;
            Some(SourceMap::from_bytes(blob, budget.max_payload_bytes)?)
        }
        None => None,
    };

    let stream = TokenStream {
        dictionary_version: header.dictionary_version,
        encoder_version: header.encoder_version,
        source_language: header.source_language,
        source_language_version: header.source_language_version,
        source_hash: header.source_hash,
        tokens,
        payloads,
        source_map,
        author: metadata.author.clone(),
        license: metadata.license.clone(),
        timestamp: metadata.timestamp.clone(),
        source_encoding: metadata.source_encoding.clone(),
        key_management: metadata.key_management.clone(),
    };
    stream.validate()?;
    Ok((stream, compression.extras))
}

/// Open, authenticate and decode a package.
pub fn decode_package(
    data: &[u8],
    passphrase: &[u8],
    registry: &DictionaryRegistry,
    options: &DecodeOptions,
) -> Result<DecodedPackage, PackageError> {
    let (wrapper_header, document) = read_wrapper(data)?;
    let metadata = document.parsed_metadata()?;
    let aad = build_metadata_aad(&document.metadata)?;
    let envelope = document.envelope()?;
    let payload = open(&envelope, passphrase, &aad)?;
    options.budget.ensure_payload(payload.len())?;

    let (frame, remainder) = read_frame(&payload, PAYLOAD_MAGIC)?;
    if !remainder.is_empty() {
        return Err(PackageError::Validation(format!(
            "{} unexpected bytes after payload frame",
            remainder.len()
        )));
    }
    if frame.header.features != wrapper_header.features {
        return Err(PackageError::FeatureMismatch {
            wrapper: wrapper_header.features.names(),
            payload: frame.header.features.names(),
        });
    }
    let payload_version = parse_any_version(&document.payload_version)?;
    if payload_version != frame.header.version {
        return Err(PackageError::mismatch(
            "payload_version",
            payload_version,
            frame.header.version,
        ));
    }
    let recorded = parse_any_version(&metadata.package_version)?;
    if recorded != payload_version {
        return Err(PackageError::mismatch("package_version", payload_version, recorded));
    }

    let (stream, extras) = decode_payload_body(
        frame.body,
        frame.header.features,
        &metadata,
        registry,
        &options.budget,
    )?;
    debug!(
        version = %payload_version,
        tokens = stream.tokens.len(),
        payloads = stream.payloads.len(),
        "package decoded"
    );
    Ok(DecodedPackage {
        stream,
        metadata,
        package_version: wrapper_header.version,
        payload_version,
        features: frame.header.features,
        extras,
    })
}

/// Read the clear-text wrapper fields.
pub fn inspect_package(data: &[u8]) -> Result<PackageInfo, PackageError> {
    let (header, document) = read_wrapper(data)?;
    let metadata = document.parsed_metadata()?;
    document.kdf_parameters.validate()?;
    Ok(PackageInfo {
        package_version: header.version,
        payload_version: parse_any_version(&document.payload_version)?,
        features: document.payload_features,
        metadata,
        aead: document.aead,
        kdf_parameters: document.kdf_parameters,
    })
}
