//! Persistence boundary.
//!
//! Engines hand the session a serde `Record`; the session encodes it with
//! bincode and stores the bytes under the engine's key. Stores never
//! interpret what they hold.

mod error;
mod store;

pub use error::PersistError;
pub use store::{load_record, save_record, FileStore, MemoryStore, PersistenceService};
