//! In-memory ticket store
//!
//! Tickets live in a sharded concurrent map. When a snapshot path is
//! configured, every write rewrites a JSON file holding the whole store,
//! and the file is loaded back on startup.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use ticket_triage_core::{
    Result, StoreStats, TeamQueue, Ticket, TicketFilter, TicketMutation, TicketStore,
};

use crate::error::PersistenceError;

pub struct InMemoryTicketStore {
    tickets: DashMap<String, Ticket>,
    snapshot_path: Option<PathBuf>,
    /// Serializes snapshot writers so an older view never lands last
    snapshot_lock: Mutex<()>,
}

impl InMemoryTicketStore {
    /// Volatile store
    pub fn new() -> Self {
        Self {
            tickets: DashMap::new(),
            snapshot_path: None,
            snapshot_lock: Mutex::new(()),
        }
    }

    /// Store backed by a JSON snapshot file
    ///
    /// A missing file starts an empty store. A file that exists but does
    /// not parse is an error rather than silently discarded.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> std::result::Result<Self, PersistenceError> {
        let path = path.into();
        let tickets = DashMap::new();

        for ticket in read_snapshot(&path)? {
            tickets.insert(ticket.id.clone(), ticket);
        }

        if !tickets.is_empty() {
            tracing::info!(path = %path.display(), tickets = tickets.len(), "Loaded ticket snapshot");
        }

        Ok(Self {
            tickets,
            snapshot_path: Some(path),
            snapshot_lock: Mutex::new(()),
        })
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Insert tickets without touching `updated_at` or the snapshot
    ///
    /// Returns how many were inserted. Existing ids are left alone.
    pub fn insert_all(&self, tickets: impl IntoIterator<Item = Ticket>) -> usize {
        let mut inserted = 0;
        for ticket in tickets {
            if let dashmap::mapref::entry::Entry::Vacant(slot) = self.tickets.entry(ticket.id.clone()) {
                slot.insert(ticket);
                inserted += 1;
            }
        }
        inserted
    }

    fn collect(&self, keep: impl Fn(&Ticket) -> bool) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets
    }

    /// Rewrite the snapshot file. Failures are logged; the in-memory
    /// state stays authoritative.
    async fn write_snapshot(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };

        let _guard = self.snapshot_lock.lock().await;

        let mut tickets: Vec<Ticket> = self.tickets.iter().map(|e| e.value().clone()).collect();
        tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        if let Err(e) = write_atomic(path, &tickets).await {
            tracing::error!(path = %path.display(), error = %e, "Failed to write ticket snapshot");
        }
    }
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn save(&self, mut ticket: Ticket) -> Result<Ticket> {
        ticket.updated_at = Utc::now();
        self.tickets.insert(ticket.id.clone(), ticket.clone());
        self.write_snapshot().await;
        Ok(ticket)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Ticket>> {
        Ok(self.tickets.get(id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, id: &str, mutation: TicketMutation) -> Result<Option<Ticket>> {
        // The shard guard must be released before awaiting the snapshot
        let updated = {
            let Some(mut entry) = self.tickets.get_mut(id) else {
                return Ok(None);
            };
            mutation(entry.value_mut());
            entry.updated_at = Utc::now();
            entry.value().clone()
        };

        self.write_snapshot().await;
        Ok(Some(updated))
    }

    async fn list_all(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        Ok(self.collect(|t| filter.matches(t)))
    }

    async fn list_by_queue(&self, queue: TeamQueue) -> Result<Vec<Ticket>> {
        Ok(self.collect(|t| t.current_queue() == Some(queue)))
    }

    async fn stats(&self) -> Result<StoreStats> {
        let tickets: Vec<Ticket> = self.tickets.iter().map(|e| e.value().clone()).collect();
        Ok(StoreStats::from_tickets(&tickets))
    }

    fn is_persistent(&self) -> bool {
        self.snapshot_path.is_some()
    }
}

fn read_snapshot(path: &Path) -> std::result::Result<Vec<Ticket>, PersistenceError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PersistenceError::io(path, e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&bytes).map_err(|e| PersistenceError::CorruptSnapshot {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write to a sibling temp file, then rename over the target
async fn write_atomic(path: &Path, tickets: &[Ticket]) -> std::result::Result<(), PersistenceError> {
    let body = serde_json::to_vec_pretty(tickets)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PersistenceError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &body)
        .await
        .map_err(|e| PersistenceError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| PersistenceError::io(path, e))
}
