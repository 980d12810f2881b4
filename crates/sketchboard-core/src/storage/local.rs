//! Browser localStorage implementation for WebAssembly.

use super::{BoxFuture, Storage, StorageError, StorageResult, decode_elements, encode_elements};
use crate::element::Element;

/// Prefix of every board key, as in `elements_<boardId>`.
const KEY_PREFIX: &str = "elements_";

/// Stores each board as a JSON array under `elements_<boardId>`.
///
/// The storage handle is looked up on every call; it is not thread-safe and
/// WASM is single-threaded anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn key(board_id: &str) -> String {
        format!("{KEY_PREFIX}{board_id}")
    }

    fn handle() -> StorageResult<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {e:?}")))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))
    }
}

impl Storage for LocalStorage {
    fn save_elements(&self, board_id: &str, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>> {
        let key = Self::key(board_id);
        let json = encode_elements(elements);
        Box::pin(async move {
            let json = json?;
            Self::handle()?
                .set_item(&key, &json)
                .map_err(|e| StorageError::Io(format!("Failed to write {key}: {e:?}")))
        })
    }

    fn load_elements(&self, board_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        let key = Self::key(board_id);
        let board_id = board_id.to_string();
        Box::pin(async move {
            let json = Self::handle()?
                .get_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to read {key}: {e:?}")))?
                .ok_or(StorageError::NotFound(board_id))?;
            decode_elements(&json)
        })
    }

    fn delete(&self, board_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = Self::key(board_id);
        Box::pin(async move {
            Self::handle()?
                .remove_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to delete {key}: {e:?}")))
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let storage = Self::handle()?;
            let len = storage
                .length()
                .map_err(|e| StorageError::Io(format!("Failed to list keys: {e:?}")))?;
            let mut ids = Vec::new();
            for index in 0..len {
                if let Ok(Some(key)) = storage.key(index) {
                    if let Some(id) = key.strip_prefix(KEY_PREFIX) {
                        ids.push(id.to_string());
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, board_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = Self::key(board_id);
        Box::pin(async move {
            let value = Self::handle()?
                .get_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to read {key}: {e:?}")))?;
            Ok(value.is_some())
        })
    }
}
