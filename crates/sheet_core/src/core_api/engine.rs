use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::classify::{CategorizedItems, classify};
use crate::derive::derive;
use crate::profile::CharacterProfile;
use crate::record::CharacterRecord;

use super::error::{CoreError, CoreErrorCode};
use super::types::DerivedStats;

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

/// One opened character: the untouched record plus everything computed from
/// it. Nothing is shared between sessions.
#[derive(Debug, Clone)]
pub struct Session {
    record: CharacterRecord,
    derived: DerivedStats,
    profile: CharacterProfile,
    items: CategorizedItems,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_path<P: AsRef<Path>>(&self, path: P) -> Result<Session, CoreError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        self.open_bytes(bytes)
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let record = CharacterRecord::from_json_bytes(bytes.as_ref())?;
        Ok(self.open_record(record))
    }

    pub fn open_value(&self, value: Value) -> Result<Session, CoreError> {
        let record = CharacterRecord::from_value(value)?;
        Ok(self.open_record(record))
    }

    pub fn open_record(&self, record: CharacterRecord) -> Session {
        let derived = derive(&record);
        let items = classify(record.items());
        let profile = CharacterProfile::from_record(&record, &derived);
        debug!(
            character = record.name(),
            items = record.items().len(),
            "opened character record"
        );

        Session {
            record,
            derived,
            profile,
            items,
        }
    }
}

impl Session {
    pub fn record(&self) -> &CharacterRecord {
        &self.record
    }

    pub fn derived(&self) -> &DerivedStats {
        &self.derived
    }

    pub fn profile(&self) -> &CharacterProfile {
        &self.profile
    }

    pub fn items(&self) -> &CategorizedItems {
        &self.items
    }
}
