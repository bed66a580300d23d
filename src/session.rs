//! Session: one engine, its live state, its randomness, and a store.
//!
//! The host feeds actions one at a time through [`Session::dispatch`] and
//! renders [`Session::state`]. The engine's record is saved whenever its
//! encoding changes. Storage problems are logged and reported, never raised:
//! a missing or unreadable save starts a fresh game, and a failed save does
//! not undo the move.

use tracing::{debug, warn};

use crate::core::outcome::Outcome;
use crate::core::rng::RandomSource;
use crate::persist::{load_record, PersistError, PersistenceService};
use crate::rules::{GameEngine, GameResult};

/// Whether a dispatch wrote to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    /// The record encodes the same as the last save.
    Unchanged,
    Saved,
    /// The store refused the write; the new state is kept regardless.
    Failed,
}

/// Result of one dispatched action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatched<Ev> {
    pub outcome: Outcome<Ev>,
    pub save: SaveStatus,
}

/// Live game wired to its persistence.
pub struct Session<E: GameEngine, R, P> {
    engine: E,
    state: E::State,
    rng: R,
    store: P,
    last_saved: Option<Vec<u8>>,
}

impl<E, R, P> Session<E, R, P>
where
    E: GameEngine,
    R: RandomSource,
    P: PersistenceService,
{
    /// Resume from the store, or deal a fresh game if nothing usable is saved.
    pub fn open(engine: E, mut rng: R, store: P) -> Self {
        let key = E::STORAGE_KEY;
        let (state, last_saved) = match load_record::<_, E::Record>(&store, key) {
            Ok(Some(record)) => {
                debug!(key, "resuming saved game");
                let blob = bincode::serialize(&record).ok();
                (engine.restore(record, &mut rng), blob)
            }
            Ok(None) => {
                debug!(key, "no saved game");
                (engine.new_game(&mut rng), None)
            }
            Err(error) => {
                warn!(key, %error, "saved game unusable, starting fresh");
                (engine.new_game(&mut rng), None)
            }
        };
        Self {
            engine,
            state,
            rng,
            store,
            last_saved,
        }
    }

    /// Apply one action and persist the result if it changed.
    pub fn dispatch(&mut self, action: &E::Action) -> Dispatched<E::Event> {
        let (state, outcome) = self.engine.apply(&self.state, action, &mut self.rng).into_parts();
        self.state = state;
        let save = match outcome {
            Outcome::Rejected(_) | Outcome::Terminal => SaveStatus::Unchanged,
            Outcome::Applied(_) | Outcome::Exhausted(_) => self.persist(),
        };
        Dispatched { outcome, save }
    }

    /// Write the current record unconditionally.
    pub fn flush(&mut self) -> Result<(), PersistError> {
        let record = self.engine.record(&self.state);
        let blob = bincode::serialize(&record).map_err(|source| PersistError::Codec {
            key: E::STORAGE_KEY.to_string(),
            source,
        })?;
        self.store.save(E::STORAGE_KEY, &blob)?;
        self.last_saved = Some(blob);
        Ok(())
    }

    fn persist(&mut self) -> SaveStatus {
        let key = E::STORAGE_KEY;
        let record = self.engine.record(&self.state);
        let blob = match bincode::serialize(&record) {
            Ok(blob) => blob,
            Err(error) => {
                warn!(key, %error, "could not encode record");
                return SaveStatus::Failed;
            }
        };
        if self.last_saved.as_ref() == Some(&blob) {
            return SaveStatus::Unchanged;
        }
        match self.store.save(key, &blob) {
            Ok(()) => {
                self.last_saved = Some(blob);
                SaveStatus::Saved
            }
            Err(error) => {
                warn!(key, %error, "could not save record");
                SaveStatus::Failed
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &E::State {
        &self.state
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn store(&self) -> &P {
        &self.store
    }

    /// Finished game result, if any.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.engine.is_terminal(&self.state)
    }

    /// Give back the store, e.g. to open another session on it.
    pub fn into_store(self) -> P {
        self.store
    }
}
