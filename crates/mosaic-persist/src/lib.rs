pub mod error;
pub mod reconciler;
pub mod snapshot;
pub mod store;

pub use error::{PersistError, Result};
pub use snapshot::{JsonFileSnapshot, MemorySnapshot, SnapshotStore};
pub use store::ThreadStore;
