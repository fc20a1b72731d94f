//! compression/rans.rs
//! Static range ANS over a normalised frequency table.
//!
//! Design notes:
//! - State is 32 bits, renormalised a byte at a time down to `1 << 24`.
//! - The final state is appended little-endian after the renormalisation
//!   bytes; decoding consumes those bytes back to front.
//! - Count scaling is deterministic so identical input always yields the
//!   identical model digest.

use tracing::trace;

use crate::compression::types::{CompressionError, RansModel};
use crate::constants::{DEFAULT_PRECISION_BITS, MAX_PRECISION_BITS, MIN_PRECISION_BITS};

const RANS_L: u64 = 1 << 24;
const INITIAL_STATE: u64 = 1 << 31;

pub fn ensure_precision(bits: u32) -> Result<(), CompressionError> {
    if !(MIN_PRECISION_BITS..=MAX_PRECISION_BITS).contains(&bits) {
        return Err(CompressionError::InvalidPrecision(bits));
    }
    Ok(())
}

/// Normalised table with cumulative offsets and a slot lookup.
#[derive(Debug, Clone)]
pub struct RansTable {
    precision_bits: u32,
    frequencies: Vec<u32>,
    cumulative: Vec<u32>,
    lookup: Vec<u32>,
}

impl RansTable {
    /// Build from frequencies that already sum to `1 << precision_bits`.
    pub fn from_frequencies(
        precision_bits: u32,
        frequencies: Vec<u32>,
    ) -> Result<Self, CompressionError> {
        ensure_precision(precision_bits)?;
        let total = 1u64 << precision_bits;
        let sum: u64 = frequencies.iter().map(|f| u64::from(*f)).sum();
        if sum != total {
            return Err(CompressionError::ModelMismatch(format!(
                "frequencies sum to {} instead of {}",
                sum, total
            )));
        }

        let mut cumulative = Vec::with_capacity(frequencies.len());
        let mut lookup = Vec::with_capacity(total as usize);
        let mut running = 0u32;
        for (symbol, freq) in frequencies.iter().enumerate() {
            cumulative.push(running);
            lookup.extend(std::iter::repeat(symbol as u32).take(*freq as usize));
            running += *freq;
        }

        Ok(Self { precision_bits, frequencies, cumulative, lookup })
    }

    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    pub fn frequencies(&self) -> &[u32] {
        &self.frequencies
    }

    pub fn alphabet_size(&self) -> usize {
        self.frequencies.len()
    }

    pub fn to_model(&self) -> RansModel {
        RansModel {
            precision_bits: self.precision_bits,
            frequencies: self.frequencies.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RansCodec {
    precision_bits: u32,
}

impl Default for RansCodec {
    fn default() -> Self {
        Self { precision_bits: DEFAULT_PRECISION_BITS }
    }
}

impl RansCodec {
    pub fn new(precision_bits: u32) -> Result<Self, CompressionError> {
        ensure_precision(precision_bits)?;
        Ok(Self { precision_bits })
    }

    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    /// Table for `symbols` with every alphabet entry seeded at one.
    pub fn build_table(
        &self,
        symbols: &[u32],
        alphabet_size: usize,
    ) -> Result<RansTable, CompressionError> {
        let total = 1usize << self.precision_bits;
        if alphabet_size == 0 || alphabet_size > total {
            return Err(CompressionError::AlphabetTooLarge { alphabet: alphabet_size, total });
        }
        let mut counts = vec![1u64; alphabet_size];
        for symbol in symbols {
            let slot = counts.get_mut(*symbol as usize).ok_or(CompressionError::SymbolOutOfRange {
                symbol: *symbol,
                alphabet: alphabet_size,
            })?;
            *slot += 1;
        }
        let frequencies = scale_counts(&counts, self.precision_bits)?;
        RansTable::from_frequencies(self.precision_bits, frequencies)
    }

    /// Rebuild a table from a stored model, renormalising when its
    /// frequencies do not sum to the model's table size.
    pub fn table_from_model(model: &RansModel) -> Result<RansTable, CompressionError> {
        let counts: Vec<u64> = model.frequencies.iter().map(|f| u64::from(*f)).collect();
        Self::table_from_counts(model.precision_bits, &counts)
    }

    /// Table for arbitrary non-negative weights. Weights that already sum to
    /// `1 << precision_bits` are used as is.
    pub fn table_from_counts(
        precision_bits: u32,
        counts: &[u64],
    ) -> Result<RansTable, CompressionError> {
        ensure_precision(precision_bits)?;
        let target = 1u64 << precision_bits;
        let sum: u128 = counts.iter().map(|c| u128::from(*c)).sum();
        if sum == u128::from(target) {
            let frequencies = counts.iter().map(|c| *c as u32).collect();
            return RansTable::from_frequencies(precision_bits, frequencies);
        }

        let denom = sum.max(1);
        let mut normalised: Vec<u64> = counts
            .iter()
            .map(|c| (u128::from(*c) * u128::from(target) / denom) as u64)
            .map(|f| f.max(1))
            .collect();
        let mut diff = target as i64 - normalised.iter().sum::<u64>() as i64;
        if diff > 0 {
            let n = (diff as usize).min(normalised.len());
            for slot in normalised.iter_mut().take(n) {
                *slot += 1;
            }
        } else if diff < 0 {
            for slot in normalised.iter_mut() {
                if diff == 0 {
                    break;
                }
                if *slot > 1 {
                    *slot -= 1;
                    diff += 1;
                }
            }
        }
        let frequencies = normalised.into_iter().map(|f| f as u32).collect();
        RansTable::from_frequencies(precision_bits, frequencies)
    }

    pub fn encode(&self, symbols: &[u32], table: &RansTable) -> Result<Vec<u8>, CompressionError> {
        let p = table.precision_bits;
        let mut state = INITIAL_STATE;
        let mut out = Vec::with_capacity(symbols.len() / 2 + 4);

        for symbol in symbols.iter().rev() {
            let s = *symbol as usize;
            let freq = *table.frequencies.get(s).ok_or(CompressionError::SymbolOutOfRange {
                symbol: *symbol,
                alphabet: table.frequencies.len(),
            })? as u64;
            if freq == 0 {
                return Err(CompressionError::ZeroFrequency(*symbol));
            }
            let cum = u64::from(table.cumulative[s]);
            let bound = freq << (32 - p);
            while state >= bound {
                out.push((state & 0xFF) as u8);
                state >>= 8;
            }
            state = ((state / freq) << p) + (state % freq) + cum;
        }

        out.extend_from_slice(&(state as u32).to_le_bytes());
        trace!(symbols = symbols.len(), bytes = out.len(), "rans encode");
        Ok(out)
    }

    pub fn decode(
        &self,
        data: &[u8],
        table: &RansTable,
        symbol_count: usize,
    ) -> Result<Vec<u32>, CompressionError> {
        if data.len() < 4 {
            return Err(CompressionError::StreamTooShort);
        }
        let p = table.precision_bits;
        let mask = (1u64 << p) - 1;
        let (body, tail) = data.split_at(data.len() - 4);
        let mut state = u64::from(u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]));
        let mut remaining = body.len();
        let mut out = Vec::with_capacity(symbol_count);

        for _ in 0..symbol_count {
            let slot = state & mask;
            let symbol = table.lookup[slot as usize];
            let freq = u64::from(table.frequencies[symbol as usize]);
            let cum = u64::from(table.cumulative[symbol as usize]);
            state = freq * (state >> p) + (slot - cum);
            while state < RANS_L {
                if remaining == 0 {
                    return Err(CompressionError::Exhausted);
                }
                remaining -= 1;
                state = (state << 8) | u64::from(body[remaining]);
            }
            out.push(symbol);
        }
        Ok(out)
    }
}

/// Scale raw counts to sum exactly `1 << precision_bits`, keeping every
/// entry at least one.
///
/// Shortfall goes to the rarest symbols first, excess comes off the most
/// frequent; ties keep ascending symbol order. Each adjustment is a single
/// pass, so a table that one pass cannot fix is rejected.
pub fn scale_counts(counts: &[u64], precision_bits: u32) -> Result<Vec<u32>, CompressionError> {
    let target = 1u64 << precision_bits;
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return Err(CompressionError::NormalisationFailed);
    }
    let mut scaled: Vec<u64> = counts.iter().map(|c| (c * target / total).max(1)).collect();
    let mut diff = target as i64 - scaled.iter().sum::<u64>() as i64;

    let mut order: Vec<usize> = (0..counts.len()).collect();
    if diff > 0 {
        order.sort_by_key(|i| counts[*i]);
        for i in order {
            if diff == 0 {
                break;
            }
            scaled[i] += 1;
            diff -= 1;
        }
    } else if diff < 0 {
        order.sort_by(|a, b| counts[*b].cmp(&counts[*a]));
        for i in order {
            if diff == 0 {
                break;
            }
            if scaled[i] > 1 {
                scaled[i] -= 1;
                diff += 1;
            }
        }
    }

    if scaled.iter().sum::<u64>() != target {
        return Err(CompressionError::NormalisationFailed);
    }
    Ok(scaled.into_iter().map(|f| f as u32).collect())
}
