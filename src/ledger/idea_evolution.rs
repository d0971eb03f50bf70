use super::clock::BlockClock;
use super::config::{ConfigError, LedgerConfig};
use super::entry::{BlockHeight, Idea, RecordId};
use super::table::RecordTable;
use super::LedgerError;
use crate::snapshot::{Snapshot, SnapshotError};
use tracing::{debug, warn};

/// Store backing the idea evolution contract
#[derive(Debug, Clone)]
pub struct IdeaStore {
    table: RecordTable<Idea>,
    config: LedgerConfig,
}

impl Default for IdeaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdeaStore {
    /// Creates an empty store with the default configuration
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

    /// Registers a new idea and returns its id
    pub fn create_idea(
        &mut self,
        content: impl Into<String>,
        complexity: u64,
        adaptability: u64,
    ) -> RecordId {
        let id = self.table.insert(Idea::new(content, complexity, adaptability));
        debug!(id, complexity, adaptability, "idea created");
        id
    }

    /// Replaces an idea's content, bumps its complexity and stamps the
    /// current block height.
    pub fn mutate_idea(
        &mut self,
        id: RecordId,
        new_content: impl Into<String>,
    ) -> Result<(), LedgerError> {
        let height = self.table.clock().height();
        let idea = self.table.get_mut(id).map_err(|e| {
            warn!(id, "mutate on missing idea");
            e
        })?;
        idea.mutate(new_content, height);
        debug!(id, complexity = idea.complexity(), height, "idea mutated");
        Ok(())
    }

    pub fn get_idea(&self, id: RecordId) -> Result<&Idea, LedgerError> {
        self.table.get(id)
    }

    /// Complexity plus adaptability
    pub fn calculate_evolution_score(&self, id: RecordId) -> Result<u64, LedgerError> {
        self.table.get(id).map(Idea::evolution_score)
    }

    pub fn clock(&self) -> &BlockClock {
        self.table.clock()
    }

    /// Moves the store to the next block; later mutations carry the new height
    pub fn advance_block(&mut self) -> BlockHeight {
        self.table.clock_mut().advance()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Ids in ascending order
    pub fn ids(&self) -> Vec<RecordId> {
        self.table.iter().map(|(id, _)| id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Idea)> {
        self.table.iter()
    }

    pub fn stats(&self) -> IdeaStats {
        IdeaStats {
            total_ideas: self.table.len(),
            mutated_ideas: self.table.iter().filter(|(_, idea)| idea.is_mutated()).count(),
            max_evolution_score: self
                .table
                .iter()
                .map(|(_, idea)| idea.evolution_score())
                .max()
                .unwrap_or(0),
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
        Snapshot::capture(&self.table.state(), self.config.snapshot_compression)
    }

    /// Replaces all ideas, the id counter and the clock with a snapshot's
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let state = snapshot.open::<Idea>()?;
        self.table.restore(state)?;
        debug!(ideas = self.table.len(), "idea store restored");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaStats {
    pub total_ideas: usize,
    pub mutated_ideas: usize,
    pub max_evolution_score: u64,
}
