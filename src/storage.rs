//! History persistence.
//!
//! Records live as one JSON file each under `<data_dir>/history/<owner>/`. File names start with
//! a zero-padded creation stamp so a directory listing sorts chronologically.

use crate::error::StoreError;
use crate::model::{HistoryRecord, PlatformFormat};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngCore;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::OffsetDateTime;

/// Fields supplied by the workflow when appending a record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub owner_id: String,
    pub content: String,
    pub prompt: String,
    pub format: PlatformFormat,
}

/// Persistence capability: append a record; list records for a user.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: NewRecord) -> Result<HistoryRecord, StoreError>;

    /// Records for `owner_id`, newest first.
    async fn list(&self, owner_id: &str) -> Result<Vec<HistoryRecord>, StoreError>;

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError>;
}

/// Generate an opaque record id.
fn gen_record_id() -> String {
    let mut b = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut b);
    format!("{:016x}", u64::from_le_bytes(b))
}

/// Keep owner directory names filesystem-safe.
fn sanitize_owner(owner_id: &str) -> String {
    owner_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Creation stamps that strictly increase within one process.
struct StampClock {
    last_nanos: Mutex<i128>,
}

impl StampClock {
    fn new() -> Self {
        Self {
            last_nanos: Mutex::new(0),
        }
    }

    fn next(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let mut last = match self.last_nanos.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut nanos = now.unix_timestamp_nanos();
        if nanos <= *last {
            nanos = *last + 1;
        }
        *last = nanos;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(now)
    }
}

pub struct JsonFileStore {
    root: PathBuf,
    clock: StampClock,
}

impl JsonFileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            root: data_dir.join("history"),
            clock: StampClock::new(),
        }
    }

    fn owner_dir(&self, owner_id: &str) -> PathBuf {
        self.root.join(sanitize_owner(owner_id))
    }

    fn record_path(&self, record: &HistoryRecord) -> PathBuf {
        self.owner_dir(&record.owner_id).join(format!(
            "{:020}-{}.json",
            record.created_at.unix_timestamp_nanos(),
            record.id
        ))
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    async fn append(&self, new: NewRecord) -> Result<HistoryRecord, StoreError> {
        let record = HistoryRecord {
            id: gen_record_id(),
            owner_id: new.owner_id,
            format: new.format,
            prompt: new.prompt,
            content: new.content,
            created_at: self.clock.next(),
        };
        let dir = self.owner_dir(&record.owner_id);
        tokio::fs::create_dir_all(&dir).await?;
        let path = self.record_path(&record);
        let body = serde_json::to_vec_pretty(&record)?;
        tokio::fs::write(&path, body).await?;
        tracing::info!(id = %record.id, path = %path.display(), "history record saved");
        Ok(record)
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        let dir = self.owner_dir(owner_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut out = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<HistoryRecord>(&raw) {
                Ok(r) if r.owner_id == owner_id => out.push(r),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable history record");
                }
            }
        }
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(out)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        let dir = self.owner_dir(owner_id);
        let suffix = format!("-{id}.json");
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(&suffix) {
                tokio::fs::remove_file(entry.path()).await?;
                tracing::info!(id, "history record deleted");
                return Ok(());
            }
        }
        Err(StoreError::NotFound(id.to_string()))
    }
}

/// Write a record as pretty JSON to `path`.
pub fn export_json(path: &Path, record: &HistoryRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(record)?;
    std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
