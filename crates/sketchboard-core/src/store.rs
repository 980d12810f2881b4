//! Ordered element collection with change notification.
//!
//! Iteration order is paint order: oldest first, newest (topmost) last.
//! Elements are shared as `Arc<Element>` and never mutated in place; an
//! update swaps in a fresh copy at the same position.

use crate::element::{Element, ElementDraft, ElementId, ElementPatch};
use crate::selection::SelectionSet;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};

/// What caused a store notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(ElementId),
    Updated(ElementId),
    Removed(ElementId),
}

impl StoreChange {
    pub fn element_id(&self) -> &ElementId {
        match self {
            StoreChange::Added(id) | StoreChange::Updated(id) | StoreChange::Removed(id) => id,
        }
    }
}

/// Notification payload: the change plus the complete current list.
#[derive(Debug)]
pub struct StoreEvent<'a> {
    pub change: StoreChange,
    pub elements: &'a [Arc<Element>],
    pub revision: u64,
}

/// Handle returned by [`ElementStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent<'_>)>;

/// The board's element collection and selection.
pub struct ElementStore {
    elements: Vec<Arc<Element>>,
    selection: SelectionSet,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    revision: u64,
    last_stamp: u64,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ElementStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementStore")
            .field("elements", &self.elements.len())
            .field("selection", &self.selection)
            .field("subscribers", &self.subscribers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl ElementStore {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            selection: SelectionSet::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
            revision: 0,
            last_stamp: 0,
        }
    }

    /// Register a callback invoked after every mutation.
    pub fn subscribe(&mut self, callback: impl FnMut(&StoreEvent<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Append a new element on top of the z-order.
    ///
    /// Assigns an id when the draft has none. If the id is already present
    /// nothing changes and the existing element is returned.
    pub fn add(&mut self, draft: impl Into<ElementDraft>) -> Arc<Element> {
        let draft = draft.into();
        if let Some(existing) = draft.id.as_deref().and_then(|id| self.get(id)) {
            log::debug!("Ignoring duplicate add for element {}", existing.id);
            return existing;
        }

        let now = self.stamp();
        let element = Arc::new(Element {
            id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
            version: 0,
            body: draft.body,
        });
        log::debug!("Added {:?} element {}", element.kind(), element.id);
        self.elements.push(Arc::clone(&element));
        self.notify(StoreChange::Added(element.id.clone()));
        element
    }

    /// Merge `patch` into the element with `id`, keeping its position.
    ///
    /// Returns the new value, or `None` if the id is unknown.
    pub fn update(&mut self, id: &str, patch: &ElementPatch) -> Option<Arc<Element>> {
        let index = self.index_of(id)?;
        let now = self.stamp();
        let mut next = Element::clone(&self.elements[index]);
        patch.apply(&mut next.body);
        next.updated_at = now;
        next.version += 1;
        let next = Arc::new(next);
        self.elements[index] = Arc::clone(&next);
        self.notify(StoreChange::Updated(next.id.clone()));
        Some(next)
    }

    /// Remove the element with `id` and drop it from the selection.
    pub fn remove(&mut self, id: &str) -> Option<Arc<Element>> {
        let index = self.index_of(id)?;
        let removed = self.elements.remove(index);
        self.selection.remove(id);
        log::debug!("Removed element {}", removed.id);
        self.notify(StoreChange::Removed(removed.id.clone()));
        Some(removed)
    }

    /// Remove every element one by one, then clear the selection.
    /// Returns how many elements were removed.
    pub fn clear_all(&mut self) -> usize {
        let ids: Vec<ElementId> = self.elements.iter().map(|e| e.id.clone()).collect();
        let mut removed = 0;
        for id in &ids {
            if self.remove(id).is_some() {
                removed += 1;
            }
        }
        self.selection.clear();
        removed
    }

    /// Replace the whole collection with previously saved elements.
    ///
    /// Used when a board is opened; subscribers are not notified since the
    /// content already matches what is stored. Duplicate ids keep the first
    /// occurrence.
    pub fn restore(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.clear();
        self.selection.clear();
        for element in elements {
            if self.index_of(&element.id).is_some() {
                log::warn!("Skipping duplicate element {} in saved board", element.id);
                continue;
            }
            self.last_stamp = self.last_stamp.max(element.updated_at);
            self.elements.push(Arc::new(element));
        }
    }

    /// Elements in z-order.
    pub fn list(&self) -> &[Arc<Element>] {
        &self.elements
    }

    /// Owned copy of every element, for persistence.
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.iter().map(|e| Element::clone(e)).collect()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Element>> {
        self.elements.iter().find(|e| e.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Incremented on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Make `id` the only selected element. Unknown ids clear the selection.
    pub fn select_only(&mut self, id: &str) {
        self.selection.clear();
        if self.contains(id) {
            self.selection.insert(id);
        }
    }

    /// Flip membership of `id`, leaving the rest of the selection alone.
    pub fn toggle_selected(&mut self, id: &str) {
        if self.contains(id) || self.selection.contains(id) {
            self.selection.toggle(id);
        }
    }

    /// Replace the selection, ignoring ids that are not in the store.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.clear();
        for id in ids {
            let id = id.as_ref();
            if self.contains(id) {
                self.selection.insert(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected elements in z-order.
    pub fn selected_elements(&self) -> Vec<Arc<Element>> {
        self.elements
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .cloned()
            .collect()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Wall-clock milliseconds, forced strictly past the previous stamp.
    ///
    /// Saturates at `u64::MAX`, which only a corrupt saved board can reach.
    fn stamp(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last_stamp = now.max(self.last_stamp.saturating_add(1));
        self.last_stamp
    }

    fn notify(&mut self, change: StoreChange) {
        self.revision += 1;
        let event = StoreEvent {
            change,
            elements: &self.elements,
            revision: self.revision,
        };
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BoxShape, ElementBody, StickyNote};
    use kurbo::Point;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rect(x: f64) -> ElementBody {
        ElementBody::Rectangle(BoxShape::new(Point::new(x, 0.0), 10.0, 10.0))
    }

    #[test]
    fn test_add_assigns_id_and_appends() {
        let mut store = ElementStore::new();
        let a = store.add(rect(0.0));
        let b = store.add(rect(10.0));
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(store.list()[1].id, b.id);
        assert!(a.created_at > 0);
    }

    #[test]
    fn test_duplicate_id_is_idempotent() {
        let mut store = ElementStore::new();
        let first = store.add(ElementDraft::new(rect(0.0)).with_id("x"));
        let again = store.add(ElementDraft::new(rect(99.0)).with_id("x"));
        assert_eq!(store.len(), 1);
        assert_eq!(first, again);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_update_is_copy_on_write() {
        let mut store = ElementStore::new();
        let before = store.add(rect(0.0));
        store.add(rect(50.0));
        let after = store
            .update(&before.id, &ElementPatch::offset(kurbo::Vec2::new(5.0, 0.0)))
            .unwrap();
        assert_eq!(before.bounds().x0, 0.0);
        assert_eq!(after.bounds().x0, 5.0);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.version, 1);
        assert_eq!(store.list()[0].id, before.id);
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let mut store = ElementStore::new();
        assert!(store.update("nope", &ElementPatch::default()).is_none());
        assert!(store.remove("nope").is_none());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = ElementStore::new();
        let a = store.add(rect(0.0));
        store.select_only(&a.id);
        assert!(store.selection().contains(&a.id));
        store.remove(&a.id);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_subscribers_see_full_list() {
        let mut store = ElementStore::new();
        let seen: Rc<RefCell<Vec<(StoreChange, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        store.subscribe(move |event| {
            sink.borrow_mut().push((event.change.clone(), event.elements.len()));
        });
        let a = store.add(rect(0.0));
        store.add(rect(1.0));
        store.remove(&a.id);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (StoreChange::Added(a.id.clone()), 1));
        assert_eq!(seen[1].1, 2);
        assert_eq!(seen[2], (StoreChange::Removed(a.id.clone()), 1));
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = ElementStore::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let id = store.subscribe(move |_| *c.borrow_mut() += 1);
        store.add(rect(0.0));
        assert!(store.unsubscribe(id));
        store.add(rect(1.0));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_clear_all_removes_individually() {
        let mut store = ElementStore::new();
        for i in 0..4 {
            store.add(rect(i as f64));
        }
        let removals = Rc::new(RefCell::new(0));
        let r = Rc::clone(&removals);
        store.subscribe(move |event| {
            if matches!(event.change, StoreChange::Removed(_)) {
                *r.borrow_mut() += 1;
            }
        });
        let first = store.list()[0].id.clone();
        store.select_only(&first);
        assert_eq!(store.clear_all(), 4);
        assert_eq!(*removals.borrow(), 4);
        assert!(store.is_empty());
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_restored_max_timestamp_does_not_overflow() {
        let mut store = ElementStore::new();
        let saved = Element {
            id: "s".to_string(),
            created_by: None,
            created_at: 0,
            updated_at: u64::MAX,
            version: 0,
            body: rect(0.0),
        };
        store.restore([saved]);

        let updated = store.update("s", &ElementPatch::offset(kurbo::Vec2::new(1.0, 0.0))).unwrap();
        assert_eq!(updated.updated_at, u64::MAX);
        assert_eq!(updated.version, 1);
        let added = store.add(rect(20.0));
        assert_eq!(added.created_at, u64::MAX);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_selection_ignores_unknown_ids() {
        let mut store = ElementStore::new();
        let a = store.add(rect(0.0));
        store.set_selection([a.id.as_str(), "ghost"]);
        assert_eq!(store.selection().len(), 1);
        store.toggle_selected("ghost");
        assert_eq!(store.selection().len(), 1);
        store.toggle_selected(&a.id);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_restore_dedupes_and_stays_silent() {
        let mut store = ElementStore::new();
        let calls = Rc::new(RefCell::new(0));
        let c = Rc::clone(&calls);
        store.subscribe(move |_| *c.borrow_mut() += 1);

        let note = Element {
            id: "s".to_string(),
            created_by: None,
            created_at: 5,
            updated_at: 5_000_000_000_000,
            version: 2,
            body: ElementBody::Sticky(StickyNote::new(Point::ZERO, "hi")),
        };
        store.restore(vec![note.clone(), note]);
        assert_eq!(store.len(), 1);
        assert_eq!(*calls.borrow(), 0);

        let updated = store.update("s", &ElementPatch::content("bye")).unwrap();
        assert!(updated.updated_at > 5_000_000_000_000);
    }
}
