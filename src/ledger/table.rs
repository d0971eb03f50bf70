use super::clock::BlockClock;
use super::config::LedgerConfig;
use super::entry::{BlockHeight, Record, RecordId};
use super::LedgerError;
use crate::snapshot::SnapshotError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Id-keyed records plus the counters a store needs to hand out ids and
/// stamp mutations.
#[derive(Debug, Clone)]
pub(crate) struct RecordTable<R> {
    records: BTreeMap<RecordId, R>,
    next_id: RecordId,
    clock: BlockClock,
}

/// Everything a snapshot captures about a table
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TableState<R> {
    pub next_id: RecordId,
    pub height: BlockHeight,
    pub records: Vec<(RecordId, R)>,
}

impl<R: Record> RecordTable<R> {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
            clock: BlockClock::new(config.genesis_height),
        }
    }

    /// Stores a record under the next sequential id.
    ///
    /// `restore` keeps `next_id == len + 1`, so the counter cannot overflow.
    pub fn insert(&mut self, record: R) -> RecordId {
        let id = self.next_id;
        self.records.insert(id, record);
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: RecordId) -> Result<&R, LedgerError> {
        self.records
            .get(&id)
            .ok_or(LedgerError::NotFound { kind: R::KIND, id })
    }

    pub fn get_mut(&mut self, id: RecordId) -> Result<&mut R, LedgerError> {
        self.records
            .get_mut(&id)
            .ok_or(LedgerError::NotFound { kind: R::KIND, id })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &R)> {
        self.records.iter().map(|(&id, record)| (id, record))
    }

    pub fn clock(&self) -> &BlockClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut BlockClock {
        &mut self.clock
    }

    pub fn state(&self) -> TableState<R> {
        TableState {
            next_id: self.next_id,
            height: self.clock.height(),
            records: self.iter().map(|(id, record)| (id, record.clone())).collect(),
        }
    }

    /// Replaces the table contents. Only states holding exactly ids
    /// `1..=n` with `next_id == n + 1` are accepted, which is the only
    /// shape sequential creation without deletion can produce.
    pub fn restore(&mut self, state: TableState<R>) -> Result<(), SnapshotError> {
        if state.height == 0 {
            return Err(SnapshotError::Inconsistent(
                "block height must be greater than 0".to_string(),
            ));
        }

        let expected_next = state.records.len() as RecordId + 1;
        if state.next_id != expected_next {
            return Err(SnapshotError::Inconsistent(format!(
                "next id {} does not follow {} records",
                state.next_id,
                state.records.len()
            )));
        }

        let mut records = BTreeMap::new();
        for (position, (id, record)) in state.records.into_iter().enumerate() {
            let expected = position as RecordId + 1;
            if id != expected {
                return Err(SnapshotError::Inconsistent(format!(
                    "record id {} where {} was expected",
                    id, expected
                )));
            }
            records.insert(id, record);
        }

        self.records = records;
        self.next_id = state.next_id;
        self.clock = BlockClock::new(state.height);
        Ok(())
    }
}
