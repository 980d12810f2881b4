//! Debounced persistence of a board's elements.
//!
//! The manager watches the store revision. Bursts of mutations are
//! coalesced: a save happens once the revision has stayed put for the
//! debounce period.

use crate::config::EngineConfig;
use crate::element::Element;
use crate::storage::{Storage, StorageError, StorageResult};
use crate::store::ElementStore;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Load the saved elements of `board_id`.
///
/// Missing or unreadable data is logged and treated as an empty board.
pub async fn load_elements<S: Storage + ?Sized>(storage: &S, board_id: &str) -> Vec<Element> {
    match storage.load_elements(board_id).await {
        Ok(elements) => elements,
        Err(StorageError::NotFound(_)) => {
            log::debug!("No saved elements for board {board_id}");
            Vec::new()
        }
        Err(e) => {
            log::warn!("Failed to load board {board_id}: {e}");
            Vec::new()
        }
    }
}

/// Saves a board shortly after it stops changing.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    board_id: String,
    /// Quiet period before a save.
    debounce: Duration,
    /// Latest store revision seen.
    seen_revision: u64,
    /// Revision written by the last successful save.
    saved_revision: u64,
    /// When `seen_revision` last changed.
    last_change: Option<Instant>,
    last_save: Option<Instant>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>, board_id: impl Into<String>) -> Self {
        Self {
            storage,
            board_id: board_id.into(),
            debounce: Duration::from_millis(100),
            seen_revision: 0,
            saved_revision: 0,
            last_change: None,
            last_save: None,
        }
    }

    /// Manager for the board and debounce period named in `config`.
    pub fn from_config(storage: Arc<S>, config: &EngineConfig) -> Self {
        let mut manager = Self::new(storage, config.board_id.clone());
        manager.set_debounce(Duration::from_millis(config.autosave_debounce_ms));
        manager
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Record the store's current revision.
    pub fn observe(&mut self, revision: u64) {
        self.observe_at(revision, Instant::now());
    }

    pub fn observe_at(&mut self, revision: u64, now: Instant) {
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.last_change = Some(now);
        }
    }

    /// Check if there are changes the last save did not cover.
    pub fn is_dirty(&self) -> bool {
        self.seen_revision != self.saved_revision
    }

    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Dirty and quiet for at least the debounce period.
    pub fn should_save_at(&self, now: Instant) -> bool {
        if !self.is_dirty() {
            return false;
        }
        match self.last_change {
            Some(changed) => now.saturating_duration_since(changed) >= self.debounce,
            None => true,
        }
    }

    /// Save the store if it changed and has settled.
    /// Returns true if a save was performed.
    pub async fn maybe_save(&mut self, store: &ElementStore) -> StorageResult<bool> {
        self.observe(store.revision());
        if !self.should_save() {
            return Ok(false);
        }
        self.save(store).await?;
        Ok(true)
    }

    /// Save the store now.
    ///
    /// On failure the manager stays dirty so the next call retries; the
    /// store itself is untouched either way.
    pub async fn save(&mut self, store: &ElementStore) -> StorageResult<()> {
        self.observe(store.revision());
        let revision = self.seen_revision;
        let elements = store.snapshot();
        if let Err(e) = self.storage.save_elements(&self.board_id, &elements).await {
            log::warn!("Autosave of board {} failed: {e}", self.board_id);
            return Err(e);
        }
        log::debug!(
            "Saved {} elements of board {} at revision {revision}",
            elements.len(),
            self.board_id
        );
        self.saved_revision = revision;
        self.last_save = Some(Instant::now());
        Ok(())
    }

    /// Load this manager's board into `store`, replacing its contents.
    ///
    /// The loaded state counts as saved.
    pub async fn load_into(&mut self, store: &mut ElementStore) -> usize {
        let elements = load_elements(self.storage.as_ref(), &self.board_id).await;
        let count = elements.len();
        store.restore(elements);
        self.seen_revision = store.revision();
        self.saved_revision = self.seen_revision;
        self.last_change = None;
        count
    }

    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::element::{BoxShape, ElementBody, ElementPatch};
    use crate::storage::{BoxFuture, MemoryStorage};
    use kurbo::{Point, Vec2};
    use pollster::block_on;

    fn rect() -> ElementBody {
        ElementBody::Rectangle(BoxShape::new(Point::ZERO, 10.0, 10.0))
    }

    /// Backend whose writes always fail.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn save_elements(&self, _: &str, _: &[Element]) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk full".to_string())) })
        }

        fn load_elements(&self, _: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
            Box::pin(async { Err(StorageError::Serialization("garbage".to_string())) })
        }

        fn delete(&self, _: &str) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn exists(&self, _: &str) -> BoxFuture<'_, StorageResult<bool>> {
            Box::pin(async { Ok(false) })
        }
    }

    #[test]
    fn test_clean_manager_does_not_save() {
        let manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()), "b");
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
    }

    #[test]
    fn test_debounce_coalesces_bursts() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()), "b");
        let t0 = Instant::now();
        manager.observe_at(1, t0);
        manager.observe_at(2, t0 + Duration::from_millis(50));
        manager.observe_at(3, t0 + Duration::from_millis(90));
        assert!(!manager.should_save_at(t0 + Duration::from_millis(150)));
        assert!(manager.should_save_at(t0 + Duration::from_millis(190)));
        // Same revision again does not restart the quiet period.
        manager.observe_at(3, t0 + Duration::from_millis(180));
        assert!(manager.should_save_at(t0 + Duration::from_millis(190)));
    }

    #[test]
    fn test_save_writes_snapshot_and_clears_dirty() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(Arc::clone(&storage), "board");
        manager.set_debounce(Duration::ZERO);
        let mut store = ElementStore::new();
        let a = store.add(rect());
        store.update(&a.id, &ElementPatch::offset(Vec2::new(5.0, 0.0)));

        assert!(block_on(manager.maybe_save(&store)).unwrap());
        assert!(!manager.is_dirty());
        assert!(manager.last_save().is_some());
        assert!(!block_on(manager.maybe_save(&store)).unwrap());

        let saved = block_on(storage.load_elements("board")).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].bounds().origin(), Point::new(5.0, 0.0));
    }

    #[test]
    fn test_failed_save_keeps_state_and_stays_dirty() {
        let mut manager = AutoSaveManager::new(Arc::new(BrokenStorage), "board");
        let mut store = ElementStore::new();
        store.add(rect());

        assert!(block_on(manager.save(&store)).is_err());
        assert!(manager.is_dirty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_into_restores_without_dirtying() {
        let storage = Arc::new(MemoryStorage::new());
        let mut source = ElementStore::new();
        source.add(rect());
        source.add(rect());
        block_on(storage.save_elements("board", &source.snapshot())).unwrap();

        let mut manager = AutoSaveManager::new(storage, "board");
        let mut store = ElementStore::new();
        assert_eq!(block_on(manager.load_into(&mut store)), 2);
        assert_eq!(store.len(), 2);
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_load_elements_degrades_to_empty() {
        assert!(block_on(load_elements(&MemoryStorage::new(), "missing")).is_empty());
        assert!(block_on(load_elements(&BrokenStorage, "board")).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = EngineConfig::new("plans");
        let manager = AutoSaveManager::from_config(Arc::new(MemoryStorage::new()), &config);
        assert_eq!(manager.board_id(), "plans");
        assert_eq!(manager.debounce(), Duration::from_millis(100));
    }
}
