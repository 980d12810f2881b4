//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::element::Element;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, Vec<Element>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl Storage for MemoryStorage {
    fn save_elements(&self, board_id: &str, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>> {
        let board_id = board_id.to_string();
        let elements = elements.to_vec();
        Box::pin(async move {
            let mut boards = self.boards.write().map_err(lock_error)?;
            boards.insert(board_id, elements);
            Ok(())
        })
    }

    fn load_elements(&self, board_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        let board_id = board_id.to_string();
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            boards
                .get(&board_id)
                .cloned()
                .ok_or(StorageError::NotFound(board_id))
        })
    }

    fn delete(&self, board_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let board_id = board_id.to_string();
        Box::pin(async move {
            let mut boards = self.boards.write().map_err(lock_error)?;
            boards.remove(&board_id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            Ok(boards.keys().cloned().collect())
        })
    }

    fn exists(&self, board_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let board_id = board_id.to_string();
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            Ok(boards.contains_key(&board_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BoxShape, ElementBody};
    use kurbo::Point;
    use pollster::block_on;

    fn rect(id: &str) -> Element {
        Element {
            id: id.to_string(),
            created_by: None,
            created_at: 1,
            updated_at: 1,
            version: 0,
            body: ElementBody::Rectangle(BoxShape::new(Point::ZERO, 10.0, 10.0)),
        }
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        block_on(storage.save_elements("board", &[rect("a"), rect("b")])).unwrap();
        let loaded = block_on(storage.load_elements("board")).unwrap();
        let ids: Vec<&str> = loaded.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load_elements("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_exists() {
        let storage = MemoryStorage::new();
        assert!(!block_on(storage.exists("board")).unwrap());
        block_on(storage.save_elements("board", &[])).unwrap();
        assert!(block_on(storage.exists("board")).unwrap());
        block_on(storage.delete("board")).unwrap();
        assert!(!block_on(storage.exists("board")).unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        block_on(storage.save_elements("b1", &[rect("a")])).unwrap();
        block_on(storage.save_elements("b2", &[])).unwrap();
        let mut list = block_on(storage.list()).unwrap();
        list.sort();
        assert_eq!(list, ["b1", "b2"]);
    }
}
