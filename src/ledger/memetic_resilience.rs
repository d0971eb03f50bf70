use super::clock::BlockClock;
use super::config::{ConfigError, LedgerConfig};
use super::entry::{BlockHeight, Meme, RealityId, RecordId};
use super::table::RecordTable;
use super::LedgerError;
use crate::snapshot::{Snapshot, SnapshotError};
use tracing::{debug, warn};

/// Store backing the memetic resilience contract
#[derive(Debug, Clone)]
pub struct MemeStore {
    table: RecordTable<Meme>,
    config: LedgerConfig,
}

impl Default for MemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemeStore {
    pub fn new() -> Self {
        let config = LedgerConfig::default();
        Self {
            table: RecordTable::new(&config),
            config,
        }
    }

    pub fn with_config(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: RecordTable::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Registers a meme with zero popularity and returns its id
    pub fn create_meme(&mut self, content: impl Into<String>, resilience: u64) -> RecordId {
        let id = self.table.insert(Meme::new(content, resilience));
        debug!(id, resilience, "meme created");
        id
    }

    pub fn reinforce_meme(&mut self, id: RecordId) -> Result<(), LedgerError> {
        let height = self.table.clock().height();
        let meme = self.table.get_mut(id).map_err(|e| {
            warn!(id, "reinforce on missing meme");
            e
        })?;
        meme.reinforce(height);
        debug!(
            id,
            resilience = meme.resilience(),
            popularity = meme.popularity(),
            height,
            "meme reinforced"
        );
        Ok(())
    }

    pub fn get_meme(&self, id: RecordId) -> Result<&Meme, LedgerError> {
        self.table.get(id)
    }

    /// Resilience times popularity
    pub fn calculate_meme_strength(&self, id: RecordId) -> Result<u64, LedgerError> {
        self.table.get(id).map(Meme::strength)
    }

    /// Acknowledges a transfer of an existing meme into another reality.
    ///
    /// The meme stays in this store unchanged; only its existence is checked.
    pub fn transfer_meme_across_realities(
        &self,
        id: RecordId,
        target_reality: impl Into<RealityId>,
    ) -> Result<bool, LedgerError> {
        let target_reality = target_reality.into();
        self.table.get(id).map_err(|e| {
            warn!(id, target_reality = %target_reality, "transfer of missing meme");
            e
        })?;
        debug!(id, target_reality = %target_reality, "meme transferred");
        Ok(true)
    }

    pub fn clock(&self) -> &BlockClock {
        self.table.clock()
    }

    pub fn advance_block(&mut self) -> BlockHeight {
        self.table.clock_mut().advance()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.table.iter().map(|(id, _)| id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Meme)> {
        self.table.iter()
    }

    pub fn stats(&self) -> MemeStats {
        MemeStats {
            total_memes: self.table.len(),
            reinforced_memes: self.table.iter().filter(|(_, meme)| meme.is_reinforced()).count(),
            max_strength: self
                .table
                .iter()
                .map(|(_, meme)| meme.strength())
                .max()
                .unwrap_or(0),
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
        Snapshot::capture(&self.table.state(), self.config.snapshot_compression)
    }

    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let state = snapshot.open::<Meme>()?;
        self.table.restore(state)?;
        debug!(memes = self.table.len(), "meme store restored");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeStats {
    pub total_memes: usize,
    pub reinforced_memes: usize,
    pub max_strength: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::compression::CompressionAlgorithm;
    use crate::ledger::entry::RecordKind;

    #[test]
    fn test_create_meme() {
        let mut store = MemeStore::new();
        assert_eq!(store.create_meme("New meme", 1), 1);
        assert_eq!(store.create_meme("Second meme", 1), 2);
        assert_eq!(store.create_meme("Third meme", 1), 3);
    }

    #[test]
    fn test_get_meme() {
        let mut store = MemeStore::new();
        store.create_meme("Info meme", 2);

        let meme = store.get_meme(1).unwrap();
        assert_eq!(meme.content(), "Info meme");
        assert_eq!(meme.resilience(), 2);
        assert_eq!(meme.popularity(), 0);
        assert_eq!(meme.last_reinforcement(), 0);
    }

    #[test]
    fn test_reinforce_meme() {
        let mut store = MemeStore::new();
        store.create_meme("X", 1);
        store.reinforce_meme(1).unwrap();

        let meme = store.get_meme(1).unwrap();
        assert_eq!(meme, &{
            let mut expected = Meme::new("X", 1);
            expected.reinforce(1);
            expected
        });
        assert_eq!(meme.resilience(), 2);
        assert_eq!(meme.popularity(), 1);
        assert_eq!(meme.last_reinforcement(), 1);
    }

    #[test]
    fn test_strength_tracks_reinforcement() {
        let mut store = MemeStore::new();
        let id = store.create_meme("durable", 3);
        assert_eq!(store.calculate_meme_strength(id).unwrap(), 0);

        for k in 1..=4u64 {
            store.reinforce_meme(id).unwrap();
            let meme = store.get_meme(id).unwrap();
            assert_eq!(meme.resilience(), 3 + k);
            assert_eq!(meme.popularity(), k);
            assert_eq!(store.calculate_meme_strength(id).unwrap(), (3 + k) * k);
        }
    }

    #[test]
    fn test_transfer_leaves_meme_untouched() {
        let mut store = MemeStore::new();
        store.create_meme("Transferable meme", 1);
        let before = store.get_meme(1).unwrap().clone();

        assert!(store.transfer_meme_across_realities(1, 2u64).unwrap());
        assert_eq!(store.get_meme(1).unwrap(), &before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_transfer_accepts_any_reality_label() {
        let mut store = MemeStore::new();
        store.create_meme("Wandering meme", 1);
        assert!(store.transfer_meme_across_realities(1, "reality-b").unwrap());
        assert!(store.transfer_meme_across_realities(1, RealityId::default()).unwrap());
    }

    #[test]
    fn test_missing_meme() {
        let mut store = MemeStore::new();
        let not_found = LedgerError::NotFound { kind: RecordKind::Meme, id: 1 };
        assert_eq!(store.get_meme(1).unwrap_err(), not_found);
        assert_eq!(store.reinforce_meme(1).unwrap_err(), not_found);
        assert_eq!(store.calculate_meme_strength(1).unwrap_err(), not_found);
        assert_eq!(store.transfer_meme_across_realities(1, 2u64).unwrap_err(), not_found);
    }

    #[test]
    fn test_stats() {
        let mut store = MemeStore::new();
        store.create_meme("quiet", 5);
        let loud = store.create_meme("loud", 2);
        store.reinforce_meme(loud).unwrap();
        store.reinforce_meme(loud).unwrap();

        assert_eq!(
            store.stats(),
            MemeStats { total_memes: 2, reinforced_memes: 1, max_strength: 8 }
        );
    }

    #[test]
    fn test_snapshot_restore_with_lz4() {
        let mut store = MemeStore::new();
        store.create_meme("steady", 1);
        store.advance_block();
        store.reinforce_meme(1).unwrap();
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.metrics().algorithm, CompressionAlgorithm::LZ4);

        let mut other = MemeStore::new();
        other.restore(&snapshot).unwrap();
        assert_eq!(other.get_meme(1).unwrap().last_reinforcement(), 2);
        assert_eq!(other.clock().height(), 2);
        assert_eq!(other.create_meme("after", 1), 2);
    }

    #[test]
    fn test_restore_rejects_idea_snapshot() {
        let ideas = crate::ledger::idea_evolution::IdeaStore::new();
        let snapshot = ideas.snapshot().unwrap();

        let mut store = MemeStore::new();
        store.create_meme("survivor", 1);
        assert!(matches!(
            store.restore(&snapshot),
            Err(SnapshotError::KindMismatch { .. })
        ));
        assert_eq!(store.len(), 1);
    }
}
