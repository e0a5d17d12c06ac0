//! Persisted best altitude. Storage is best-effort: failures are logged and the
//! game carries on with defaults.

use crate::error::Result;

pub trait ScoreStore {
    fn load(&mut self) -> Result<Option<f64>>;
    fn save(&mut self, best: f64) -> Result<()>;
}

/// Best altitude from `store`, `0` if missing, unreadable or nonsense.
pub fn load_best(store: &mut dyn ScoreStore) -> u32 {
    match store.load() {
        Ok(Some(v)) if v.is_finite() && v >= 0.0 => v.floor().min(u32::MAX as f64) as u32,
        Ok(_) => 0,
        Err(err) => {
            log::warn!("could not read best altitude: {err}");
            0
        }
    }
}

pub fn save_best(store: &mut dyn ScoreStore, best: u32) {
    if let Err(err) = store.save(best as f64) {
        log::warn!("could not store best altitude: {err}");
    }
}

/// Store that lives as long as the process; used natively and in tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    pub value: Option<f64>,
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<f64>> {
        Ok(self.value)
    }

    fn save(&mut self, best: f64) -> Result<()> {
        self.value = Some(best);
        Ok(())
    }
}
