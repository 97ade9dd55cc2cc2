mod document_index;
mod inventory;
mod mutation_batch;
mod snapshot_builder;

#[doc(inline)]
pub use document_index::DocumentIndex;
#[doc(inline)]
pub use inventory::QueryInventory;
#[doc(inline)]
pub use mutation_batch::{CommitSummary, MutationBatcher, StagedMutation};
#[doc(inline)]
pub use snapshot_builder::SnapshotBuilder;
