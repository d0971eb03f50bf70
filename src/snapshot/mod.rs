//! In-memory checkpoints of a whole store.
//!
//! A snapshot is a bincode-encoded block: the record kind, compression
//! metrics, a CRC32 of the uncompressed payload and the payload itself.
//! Nothing here touches the filesystem; callers own the bytes.

use crate::ledger::compression::{CompressionAlgorithm, CompressionMetrics, Compressor};
use crate::ledger::entry::{Record, RecordKind};
use crate::ledger::table::TableState;
use bincode::{deserialize, serialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("Checksum mismatch: expected {expected:#010x}, found {found:#010x}")]
    ChecksumMismatch { expected: u32, found: u32 },
    #[error("Decompression failed: {0}")]
    Decompression(String),
    #[error("Snapshot holds {found} records, expected {expected}")]
    KindMismatch { expected: RecordKind, found: RecordKind },
    #[error("Inconsistent snapshot: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotBlock {
    kind: RecordKind,
    metrics: CompressionMetrics,
    checksum: u32,
    payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    block: SnapshotBlock,
}

impl Snapshot {
    pub(crate) fn capture<R: Record>(
        state: &TableState<R>,
        algorithm: CompressionAlgorithm,
    ) -> Result<Self, SnapshotError> {
        let raw = serialize(state)?;
        let checksum = crc32fast::hash(&raw);
        let (payload, metrics) = Compressor::new(algorithm).compress(&raw);
        debug!(
            kind = %R::KIND,
            records = state.records.len(),
            original_size = metrics.original_size,
            ratio = metrics.compression_ratio(),
            "snapshot captured"
        );

        Ok(Self {
            block: SnapshotBlock {
                kind: R::KIND,
                metrics,
                checksum,
                payload,
            },
        })
    }

    pub(crate) fn open<R: Record>(&self) -> Result<TableState<R>, SnapshotError> {
        if self.block.kind != R::KIND {
            return Err(SnapshotError::KindMismatch {
                expected: R::KIND,
                found: self.block.kind,
            });
        }

        let raw = Compressor::new(self.block.metrics.algorithm)
            .decompress(&self.block.payload)
            .map_err(SnapshotError::Decompression)?;

        let found = crc32fast::hash(&raw);
        if found != self.block.checksum {
            return Err(SnapshotError::ChecksumMismatch {
                expected: self.block.checksum,
                found,
            });
        }

        Ok(deserialize(&raw)?)
    }

    pub fn kind(&self) -> RecordKind {
        self.block.kind
    }

    pub fn metrics(&self) -> &CompressionMetrics {
        &self.block.metrics
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serialize(&self.block)?)
    }

    /// Decodes the outer block only; the checksum is verified on restore.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(Self {
            block: deserialize(bytes)?,
        })
    }
}
