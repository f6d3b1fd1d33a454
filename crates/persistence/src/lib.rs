//! Ticket storage for the triage service
//!
//! Provides:
//! - An in-memory store with optional JSON snapshot persistence
//! - Demonstration tickets for empty deployments

pub mod error;
pub mod memory;
pub mod seed;

pub use error::PersistenceError;
pub use memory::InMemoryTicketStore;
pub use seed::{seed_ids, seed_tickets};

use ticket_triage_config::PersistenceConfig;

/// Initialize the ticket store from config
///
/// Loads the snapshot if one is configured, then inserts the
/// demonstration tickets when the store is empty and seeding is enabled.
pub fn init(config: &PersistenceConfig) -> Result<InMemoryTicketStore, PersistenceError> {
    let store = match config.snapshot_path.as_deref().map(str::trim) {
        Some(path) if !path.is_empty() => InMemoryTicketStore::with_snapshot(path)?,
        _ => InMemoryTicketStore::new(),
    };

    if config.load_seed_data && store.is_empty() {
        let inserted = store.insert_all(seed_tickets());
        tracing::info!(tickets = inserted, "Loaded demonstration tickets");
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_triage_core::{TicketFilter, TicketStore};

    #[tokio::test]
    async fn test_init_seeds_volatile_store() {
        let store = init(&PersistenceConfig::default()).unwrap();
        assert!(!store.is_persistent());
        let all = store.list_all(&TicketFilter::default()).await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].id, "seed-1");
    }

    #[tokio::test]
    async fn test_init_without_seed_data() {
        let config = PersistenceConfig {
            snapshot_path: Some("  ".to_string()),
            load_seed_data: false,
        };
        let store = init(&config).unwrap();
        assert!(store.is_empty());
        assert!(!store.is_persistent());
    }

    #[tokio::test]
    async fn test_init_does_not_reseed_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        let config = PersistenceConfig {
            snapshot_path: Some(path.display().to_string()),
            load_seed_data: true,
        };

        let first = init(&config).unwrap();
        assert_eq!(first.len(), 5);
        // Seeds are only written out with the next change
        let ticket = first.get_by_id("seed-3").await.unwrap().unwrap();
        first.save(ticket).await.unwrap();
        drop(first);

        let second = init(&config).unwrap();
        assert_eq!(second.len(), 5);
        assert!(second.is_persistent());
    }
}
