use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential identifier handed out by a store, starting at 1
pub type RecordId = u64;
/// Logical block height; 0 means "never touched since creation"
pub type BlockHeight = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Idea,
    Meme,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Idea => f.write_str("idea"),
            RecordKind::Meme => f.write_str("meme"),
        }
    }
}

/// Label of the reality a meme is transferred into.
///
/// Transfers never look the target up, so any label is accepted, including
/// an empty one when the caller names no target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealityId(String);

impl RealityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for RealityId {
    fn from(id: u64) -> Self {
        RealityId(id.to_string())
    }
}

impl From<&str> for RealityId {
    fn from(label: &str) -> Self {
        RealityId(label.to_string())
    }
}

impl From<String> for RealityId {
    fn from(label: String) -> Self {
        RealityId(label)
    }
}

impl fmt::Display for RealityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value a store can hold and snapshot.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const KIND: RecordKind;
}

/// An idea tracked by the evolution contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    content: String,
    complexity: u64,
    adaptability: u64,  // fixed at creation
    last_mutation: BlockHeight,
}

impl Idea {
    /// Creates an idea that has never been mutated
    pub fn new(content: impl Into<String>, complexity: u64, adaptability: u64) -> Self {
        Self {
            content: content.into(),
            complexity,
            adaptability,
            last_mutation: 0,
        }
    }

    // Getters
    pub fn content(&self) -> &str { &self.content }
    pub fn complexity(&self) -> u64 { self.complexity }
    pub fn adaptability(&self) -> u64 { self.adaptability }
    pub fn last_mutation(&self) -> BlockHeight { self.last_mutation }

    pub fn is_mutated(&self) -> bool {
        self.last_mutation != 0
    }

    /// Replaces the content and bumps complexity by one
    pub fn mutate(&mut self, new_content: impl Into<String>, height: BlockHeight) {
        self.content = new_content.into();
        self.complexity = self.complexity.saturating_add(1);
        self.last_mutation = height;
    }

    pub fn evolution_score(&self) -> u64 {
        self.complexity.saturating_add(self.adaptability)
    }
}

impl Record for Idea {
    const KIND: RecordKind = RecordKind::Idea;
}

/// A meme tracked by the memetic resilience contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meme {
    content: String,
    resilience: u64,
    popularity: u64,
    last_reinforcement: BlockHeight,
}

impl Meme {
    /// Creates a meme with no popularity and no reinforcement
    pub fn new(content: impl Into<String>, resilience: u64) -> Self {
        Self {
            content: content.into(),
            resilience,
            popularity: 0,
            last_reinforcement: 0,
        }
    }

    pub fn content(&self) -> &str { &self.content }
    pub fn resilience(&self) -> u64 { self.resilience }
    pub fn popularity(&self) -> u64 { self.popularity }
    pub fn last_reinforcement(&self) -> BlockHeight { self.last_reinforcement }

    pub fn is_reinforced(&self) -> bool {
        self.last_reinforcement != 0
    }

    pub fn reinforce(&mut self, height: BlockHeight) {
        self.resilience = self.resilience.saturating_add(1);
        self.popularity = self.popularity.saturating_add(1);
        self.last_reinforcement = height;
    }

    /// Resilience times popularity, saturating at `u64::MAX`
    pub fn strength(&self) -> u64 {
        self.resilience.saturating_mul(self.popularity)
    }
}

impl Record for Meme {
    const KIND: RecordKind = RecordKind::Meme;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idea_creation() {
        let idea = Idea::new("Test idea", 2, 3);
        assert_eq!(idea.content(), "Test idea");
        assert_eq!(idea.complexity(), 2);
        assert_eq!(idea.adaptability(), 3);
        assert_eq!(idea.last_mutation(), 0);
        assert!(!idea.is_mutated());
    }

    #[test]
    fn test_idea_mutation() {
        let mut idea = Idea::new("Original idea", 1, 1);
        idea.mutate("Mutated idea", 1);
        assert_eq!(idea.content(), "Mutated idea");
        assert_eq!(idea.complexity(), 2);
        assert_eq!(idea.adaptability(), 1);
        assert_eq!(idea.last_mutation(), 1);
        assert_eq!(idea.evolution_score(), 3);
    }

    #[test]
    fn test_counters_saturate() {
        let mut idea = Idea::new("edge", u64::MAX, 1);
        idea.mutate("edge", 1);
        assert_eq!(idea.complexity(), u64::MAX);
        assert_eq!(idea.evolution_score(), u64::MAX);

        let mut meme = Meme::new("edge", u64::MAX);
        meme.reinforce(1);
        meme.reinforce(1);
        assert_eq!(meme.strength(), u64::MAX);
    }

    #[test]
    fn test_meme_reinforcement() {
        let mut meme = Meme::new("X", 1);
        assert_eq!(meme.strength(), 0);
        meme.reinforce(1);
        assert_eq!(meme.resilience(), 2);
        assert_eq!(meme.popularity(), 1);
        assert_eq!(meme.last_reinforcement(), 1);
        assert_eq!(meme.strength(), 2);
    }

    #[test]
    fn test_reality_labels() {
        assert_eq!(RealityId::from(2u64).as_str(), "2");
        assert_eq!(RealityId::from("reality-b").to_string(), "reality-b");
        assert_eq!(RealityId::default().as_str(), "");
    }

    #[test]
    fn test_records_serialize_with_contract_field_names() {
        let value = serde_json::to_value(Meme::new("Info meme", 2)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "content": "Info meme",
                "resilience": 2,
                "popularity": 0,
                "last_reinforcement": 0,
            })
        );
    }
}
