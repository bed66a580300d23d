//! Memory match.
//!
//! Cards are dealt face down in pairs. A mismatch stays visible until the
//! caller sends `HideMismatch`, normally from a timer.

mod game;

pub use game::{MemoryAction, MemoryEvent, MemoryMatch, MemoryRecord, MemoryState};
