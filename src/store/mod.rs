//! Persistence layer: draft storage for in-progress signups.

pub mod db;
pub mod drafts;
pub mod memory;
pub mod traits;

pub use db::Database;
pub use drafts::SqliteDraftStore;
pub use memory::MemoryDraftStore;
pub use traits::DraftStore;
