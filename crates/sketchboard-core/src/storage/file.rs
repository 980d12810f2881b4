//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult, decode_elements, encode_elements};
use crate::element::Element;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each board as a JSON array in `<base>/<board>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StorageError::Io(format!("Failed to create storage directory: {e}")))?;
        }
        Ok(Self { base_path })
    }

    /// Storage under the user's local data directory:
    /// `<data_local_dir>/sketchboard/boards`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("sketchboard").join("boards"))
    }

    fn board_path(&self, board_id: &str) -> PathBuf {
        let safe_id: String = board_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save_elements(&self, board_id: &str, elements: &[Element]) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(board_id);
        let json = encode_elements(elements);
        Box::pin(async move {
            let json = json?;
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
        })
    }

    fn load_elements(&self, board_id: &str) -> BoxFuture<'_, StorageResult<Vec<Element>>> {
        let path = self.board_path(board_id);
        let board_id = board_id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(board_id));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
            decode_elements(&json)
        })
    }

    fn delete(&self, board_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(board_id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| StorageError::Io(format!("Failed to delete {}: {e}", path.display())))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries =
                fs::read_dir(&base).map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
            let mut ids = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        ids.push(stem.to_string());
                    }
                }
            }
            Ok(ids)
        })
    }

    fn exists(&self, board_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.board_path(board_id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementBody, SerializableColor, StickyNote};
    use kurbo::Point;
    use pollster::block_on;
    use tempfile::tempdir;

    fn sticky(id: &str, text: &str) -> Element {
        Element {
            id: id.to_string(),
            created_by: Some("u1".to_string()),
            created_at: 10,
            updated_at: 12,
            version: 2,
            body: ElementBody::Sticky(StickyNote::new(Point::new(5.0, 5.0), text)),
        }
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save_elements("board-1", &[sticky("s1", "groceries")])).unwrap();
        let loaded = block_on(storage.load_elements("board-1")).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].body.text(), Some("groceries"));
        assert_eq!(loaded[0].version, 2);
        match &loaded[0].body {
            ElementBody::Sticky(note) => assert_eq!(note.background, SerializableColor::sticky_yellow()),
            other => panic!("Expected sticky, got {other:?}"),
        }
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let result = block_on(storage.load_elements("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let result = block_on(storage.load_elements("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save_elements("b1", &[])).unwrap();
        block_on(storage.save_elements("b2", &[])).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut list = block_on(storage.list()).unwrap();
        list.sort();
        assert_eq!(list, ["b1", "b2"]);

        block_on(storage.delete("b1")).unwrap();
        assert!(!block_on(storage.exists("b1")).unwrap());
        assert!(block_on(storage.exists("b2")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.save_elements("team/board:1", &[sticky("s", "x")])).unwrap();
        assert!(dir.path().join("team_board_1.json").exists());
        let loaded = block_on(storage.load_elements("team/board:1")).unwrap();
        assert_eq!(loaded[0].id, "s");
    }
}
