// src/db/json_store.rs
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::db::deals::DealStore;
use crate::domain::deal::{Deal, DealDraft, DealPatch, DealRecord};
use crate::errors::ServerError;

/// Keeps every deal as one JSON array in a single file, read and rewritten
/// whole on each call. Meant for a single local user.
pub struct JsonFileDealStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDealStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// A missing file is an empty collection. Content that does not parse is
    /// a `StoreError`.
    fn load(&self) -> Result<Vec<DealRecord>, ServerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ServerError::StoreError(format!(
                    "read {} failed: {e}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_str(&raw).map_err(|e| {
            ServerError::StoreError(format!("{} is not a deal list: {e}", self.path.display()))
        })
    }

    /// Writes a sibling temp file and renames it over the store, so a failed
    /// write leaves the previous content in place.
    fn save(&self, records: &[DealRecord]) -> Result<(), ServerError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let file = File::create(&tmp)
            .map_err(|e| ServerError::StoreError(format!("create {} failed: {e}", tmp.display())))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)
            .map_err(|e| ServerError::StoreError(format!("write deals failed: {e}")))?;
        writer
            .into_inner()
            .map_err(|e| ServerError::StoreError(format!("flush deals failed: {e}")))?
            .sync_all()
            .map_err(|e| ServerError::StoreError(format!("sync deals failed: {e}")))?;

        fs::rename(&tmp, &self.path).map_err(|e| {
            ServerError::StoreError(format!("replace {} failed: {e}", self.path.display()))
        })
    }

    /// Read-only access. An unreadable file is logged and treated as empty.
    fn read<T>(&self, f: impl FnOnce(&[DealRecord]) -> T) -> Result<T, ServerError> {
        let _guard = self.lock.lock().map_err(|_| ServerError::InternalError)?;
        let records = self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "deal file unreadable, listing nothing");
            Vec::new()
        });
        Ok(f(&records))
    }

    /// Load, change, save. Refuses to touch a file it could not parse.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut Vec<DealRecord>) -> (T, bool),
    ) -> Result<T, ServerError> {
        let _guard = self.lock.lock().map_err(|_| ServerError::InternalError)?;
        let mut records = self.load()?;
        let (out, dirty) = f(&mut records);
        if dirty {
            self.save(&records)?;
        }
        Ok(out)
    }
}

impl DealStore for JsonFileDealStore {
    fn list(&self, owner_id: i64) -> Result<Vec<Deal>, ServerError> {
        self.read(|records| {
            let mut deals: Vec<Deal> = records
                .iter()
                .filter(|r| r.owner_id == owner_id)
                .cloned()
                .map(Deal::from)
                .collect();
            // stable sort keeps later appends first among equal timestamps
            deals.reverse();
            deals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            deals
        })
    }

    fn get(&self, owner_id: i64, id: &str) -> Result<Option<Deal>, ServerError> {
        self.read(|records| {
            records
                .iter()
                .find(|r| r.owner_id == owner_id && r.id == id)
                .cloned()
                .map(Deal::from)
        })
    }

    fn insert(
        &self,
        owner_id: i64,
        draft: DealDraft,
        now: DateTime<Utc>,
    ) -> Result<Deal, ServerError> {
        let deal = draft.into_deal(owner_id, now);
        self.write(|records| {
            records.push(DealRecord::from(&deal));
            ((), true)
        })?;
        Ok(deal)
    }

    fn update(
        &self,
        owner_id: i64,
        id: &str,
        patch: DealPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Deal>, ServerError> {
        self.write(|records| {
            let Some(slot) = records
                .iter_mut()
                .find(|r| r.owner_id == owner_id && r.id == id)
            else {
                return (None, false);
            };

            let mut deal = Deal::from(slot.clone());
            deal.apply(patch, now);
            *slot = DealRecord::from(&deal);
            (Some(deal), true)
        })
    }

    fn delete(&self, owner_id: i64, id: &str) -> Result<bool, ServerError> {
        self.write(|records| {
            let before = records.len();
            records.retain(|r| !(r.owner_id == owner_id && r.id == id));
            let removed = records.len() != before;
            (removed, removed)
        })
    }
}
