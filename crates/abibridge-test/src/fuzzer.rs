//! Conversion fuzzer - Property checks over registered converters
//!
//! Tests:
//! - Field fidelity: every leaf arrives byte-identical
//! - Padding: destination bytes outside fields are never written
//! - Round-trip identity for converter pairs

use std::fmt;

use abibridge_core::{BridgeError, Direction, StructVersionKey};
use abibridge_layout::{ConverterPair, StructLayout, Transcribe};
use abibridge_registry::{Entry, Registry};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{mismatched_fields, padding_ranges, random_buffer};

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Random buffers per (struct, direction)
    pub iterations: usize,
    /// Byte pre-filled into destination buffers and source padding
    pub padding_byte: u8,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            iterations: 256,
            padding_byte: 0xcd,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            iterations: 16,
            ..Default::default()
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            iterations: 4096,
            ..Default::default()
        }
    }
}

/// One failed check
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckFailure {
    Conversion(BridgeError),
    FieldMismatch { direction: Direction, path: String },
    PaddingWritten { direction: Direction, offset: usize },
    NotIdentity { path: String },
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckFailure::Conversion(err) => write!(f, "conversion failed: {}", err),
            CheckFailure::FieldMismatch { direction, path } => {
                write!(f, "{} changed after {}", path, direction)
            }
            CheckFailure::PaddingWritten { direction, offset } => {
                write!(f, "padding byte {} written by {}", offset, direction)
            }
            CheckFailure::NotIdentity { path } => write!(f, "{} not preserved by round trip", path),
        }
    }
}

/// Transcribe `src` into a fresh destination and check every field and
/// padding byte
pub fn check_transcription<T: Transcribe + ?Sized>(
    transcriber: &T,
    src_layout: &StructLayout,
    dst_layout: &StructLayout,
    src: &[u8],
    padding_byte: u8,
) -> Result<Vec<u8>, CheckFailure> {
    let direction = transcriber.direction();
    let mut dst = vec![padding_byte; transcriber.destination_size()];
    transcriber
        .transcribe(src, &mut dst)
        .map_err(CheckFailure::Conversion)?;

    if let Some(path) = mismatched_fields(src_layout, src, dst_layout, &dst)
        .into_iter()
        .next()
    {
        return Err(CheckFailure::FieldMismatch { direction, path });
    }
    for range in padding_ranges(dst_layout) {
        if let Some(offset) = range.clone().find(|&i| dst[i] != padding_byte) {
            return Err(CheckFailure::PaddingWritten { direction, offset });
        }
    }
    Ok(dst)
}

/// Convert `src` in `direction` and back; every field must come back
/// unchanged
pub fn check_roundtrip(
    pair: &ConverterPair,
    direction: Direction,
    src: &[u8],
    padding_byte: u8,
) -> Result<(), CheckFailure> {
    let there = pair.direction(direction);
    let back = pair.direction(direction.reverse());
    let src_layout = pair.layout(direction.source());
    let mid_layout = pair.layout(direction.destination());

    let mid = check_transcription(&there, src_layout, mid_layout, src, padding_byte)?;
    let out = check_transcription(&back, mid_layout, src_layout, &mid, padding_byte)?;

    match mismatched_fields(src_layout, src, src_layout, &out)
        .into_iter()
        .next()
    {
        Some(path) => Err(CheckFailure::NotIdentity { path }),
        None => Ok(()),
    }
}

/// Fuzz results for one struct
#[derive(Clone, Debug)]
pub struct FuzzReport {
    pub key: StructVersionKey,
    pub checks: usize,
    pub failures: Vec<CheckFailure>,
}

impl FuzzReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Seeded fuzzer over every entry of a registry
pub struct ConversionFuzzer {
    config: FuzzerConfig,
    rng: StdRng,
}

impl ConversionFuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        ConversionFuzzer { config, rng }
    }

    pub fn config(&self) -> &FuzzerConfig {
        &self.config
    }

    /// Fuzz one entry in every direction it supports
    pub fn run_entry(&mut self, entry: &Entry) -> FuzzReport {
        let mut report = FuzzReport {
            key: entry.key(),
            checks: 0,
            failures: Vec::new(),
        };
        let pad = self.config.padding_byte;

        for direction in [Direction::ForeignToNative, Direction::NativeToForeign] {
            let Ok(transcriber) = entry.transcriber(direction) else {
                continue;
            };
            let src_layout = entry.layout(direction.source());
            let dst_layout = entry.layout(direction.destination());

            for _ in 0..self.config.iterations {
                let src = random_buffer(src_layout, pad, &mut self.rng);
                report.checks += 1;
                let result = match entry {
                    Entry::Pair(pair) => check_roundtrip(pair, direction, &src, pad),
                    Entry::Callback(_) => {
                        check_transcription(&transcriber, src_layout, dst_layout, &src, pad)
                            .map(drop)
                    }
                };
                if let Err(failure) = result {
                    report.failures.push(failure);
                }
            }
        }
        report
    }

    /// Fuzz every registered struct, in key order
    pub fn run(&mut self, registry: &Registry) -> Vec<FuzzReport> {
        registry
            .keys()
            .into_iter()
            .filter_map(|key| registry.get(key))
            .map(|entry| self.run_entry(entry))
            .collect()
    }
}
