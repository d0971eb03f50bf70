//! In-process stand-ins for the idea evolution and memetic resilience
//! contracts.
//!
//! Each store owns its records, its identifier counter and its block clock.
//! Calls can be made through the typed store API or through [`Contract`],
//! which answers every call with a `{success, value | error}` envelope.

pub mod dispatch;
pub mod ledger;
pub mod snapshot;

pub use dispatch::{Contract, Envelope, ErrorValue};
pub use ledger::config::LedgerConfig;
pub use ledger::entry::{BlockHeight, Idea, Meme, RealityId, RecordId, RecordKind};
pub use ledger::idea_evolution::IdeaStore;
pub use ledger::memetic_resilience::MemeStore;
pub use ledger::LedgerError;
pub use snapshot::{Snapshot, SnapshotError};
