//! Storage abstraction for persisting board elements.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use autosave::{AutoSaveManager, load_elements};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::element::Element;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Backend holding the element list of each board.
///
/// On native platforms implementations must be Send + Sync. On WASM these
/// bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Replace the saved elements of a board.
    fn save_elements(&self, board_id: &str, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>>;

    /// Saved elements of a board in z-order.
    fn load_elements(&self, board_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>>;

    fn delete(&self, board_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Ids of every board with saved elements.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, board_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Backend holding the element list of each board (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Replace the saved elements of a board.
    fn save_elements(&self, board_id: &str, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>>;

    /// Saved elements of a board in z-order.
    fn load_elements(&self, board_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>>;

    fn delete(&self, board_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Ids of every board with saved elements.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, board_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Encode elements as the JSON array written by every backend.
pub fn encode_elements(elements: &[Element]) -> StorageResult<String> {
    serde_json::to_string(elements).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub fn decode_elements(json: &str) -> StorageResult<Vec<Element>> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
}
