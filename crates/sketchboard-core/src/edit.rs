//! Modal text editing of sticky notes.

use crate::element::ElementId;
use serde::{Deserialize, Serialize};

/// Keys that end an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKey {
    /// Ctrl+Enter (or Cmd+Enter).
    Save,
    /// Escape.
    Cancel,
}

impl EditKey {
    /// Map a DOM-style key name and modifier state to an edit action.
    pub fn from_key(key: &str, ctrl_or_meta: bool) -> Option<Self> {
        match key {
            "Enter" if ctrl_or_meta => Some(EditKey::Save),
            "Escape" => Some(EditKey::Cancel),
            _ => None,
        }
    }
}

/// Buffered text of the sticky note being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyEdit {
    pub element_id: ElementId,
    /// Text as typed so far.
    pub buffer: String,
    /// Text when editing started.
    pub original: String,
}

impl StickyEdit {
    pub fn new(element_id: ElementId, text: &str) -> Self {
        Self {
            element_id,
            buffer: text.to_string(),
            original: text.to_string(),
        }
    }

    pub fn is_modified(&self) -> bool {
        self.buffer != self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(EditKey::from_key("Enter", true), Some(EditKey::Save));
        assert_eq!(EditKey::from_key("Enter", false), None);
        assert_eq!(EditKey::from_key("Escape", false), Some(EditKey::Cancel));
        assert_eq!(EditKey::from_key("a", true), None);
    }

    #[test]
    fn test_modified() {
        let mut edit = StickyEdit::new("s".into(), "hello");
        assert!(!edit.is_modified());
        edit.buffer.push('!');
        assert!(edit.is_modified());
    }
}
