//! package/project.rs
//! Two-phase project encode.
//!
//! Phase 1 plans shared assets over every stream. Phase 2 assembles and
//! seals each file on a pool of scoped worker threads fed through bounded
//! crossbeam channels; results are re-ordered by input index.

use std::thread;

use crossbeam::channel::bounded;
use tracing::debug;

use crate::compression::ProjectCompressionPlanner;
use crate::config::EncodeOptions;
use crate::dictionary::DictionaryRegistry;
use crate::model::TokenStream;
use crate::package::assemble::{encode_package_with, EncodedPackage};
use crate::telemetry::counters::CodecCounters;
use crate::types::PackageError;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEncodeReport {
    /// Sealed packages, in input order.
    pub packages: Vec<Vec<u8>>,
    pub counters: CodecCounters,
    /// Whether phase 1 produced shared assets.
    pub shared_assets: bool,
}

pub fn encode_project(
    streams: &[TokenStream],
    passphrase: &[u8],
    options: &EncodeOptions,
    registry: &DictionaryRegistry,
) -> Result<ProjectEncodeReport, PackageError> {
    // ---- Phase 1: planning ----
    let config = options.compression_config()?;
    let planner = ProjectCompressionPlanner::new(config);
    let assets = planner.plan(streams);
    let workers = options.worker_count().min(streams.len()).max(1);
    debug!(
        files = streams.len(),
        workers,
        mode = %planner.config().mode,
        shared = !assets.is_empty(),
        "project phase 1 complete"
    );

    // ---- Phase 2: parallel encode ----
    let (job_tx, job_rx) = bounded::<(usize, &TokenStream)>(workers * 2);
    let (out_tx, out_rx) = bounded::<(usize, Result<EncodedPackage, PackageError>)>(workers * 2);

    let mut slots: Vec<Option<EncodedPackage>> = vec![None; streams.len()];
    let mut first_error: Option<(usize, PackageError)> = None;

    thread::scope(|scope| {
        scope.spawn(move || {
            for job in streams.iter().enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
        });

        for worker in 0..workers {
            let rx = job_rx.clone();
            let tx = out_tx.clone();
            let assets = &assets;
            scope.spawn(move || {
                for (index, stream) in rx.iter() {
                    let result = encode_package_with(stream, passphrase, options, registry, assets);
                    if tx.send((index, result)).is_err() {
                        break;
                    }
                }
                debug!(worker, "project worker finished");
            });
        }
        drop(job_rx);
        drop(out_tx);

        for (index, result) in out_rx.iter() {
            match result {
                Ok(encoded) => slots[index] = Some(encoded),
                Err(e) => {
                    // Keep the lowest failing index so errors are reproducible.
                    if first_error.as_ref().map(|(i, _)| index < *i).unwrap_or(true) {
                        first_error = Some((index, e));
                    }
                }
            }
        }
    });

    if let Some((index, error)) = first_error {
        debug!(index, %error, "project encode failed");
        return Err(error);
    }

    let mut counters = CodecCounters::default();
    let mut packages = Vec::with_capacity(streams.len());
    for (index, slot) in slots.into_iter().enumerate() {
        let encoded = slot.ok_or_else(|| {
            PackageError::Validation(format!("file {} produced no package", index))
        })?;
        counters += encoded.counters;
        packages.push(encoded.bytes);
    }
    debug!(
        files = packages.len(),
        wrapper_bytes = counters.bytes_wrapper,
        token_ratio = counters.token_ratio(),
        "project phase 2 complete"
    );

    Ok(ProjectEncodeReport {
        packages,
        counters,
        shared_assets: !assets.is_empty(),
    })
}
