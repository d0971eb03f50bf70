use super::entry::BlockHeight;

/// Logical block height stamped onto mutated records.
///
/// Stands in for chain height; it only moves when [`BlockClock::advance`]
/// is called, never with wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockClock {
    height: BlockHeight,
}

impl BlockClock {
    pub fn new(genesis_height: BlockHeight) -> Self {
        Self { height: genesis_height }
    }

    pub fn height(&self) -> BlockHeight {
        self.height
    }

    /// Moves to the next block and returns its height
    pub fn advance(&mut self) -> BlockHeight {
        self.height = self.height.saturating_add(1);
        self.height
    }
}
