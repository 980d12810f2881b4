//! The board engine: turns pointer input into element mutations.

use crate::config::EngineConfig;
use crate::edit::{EditKey, StickyEdit};
use crate::element::{BrushStroke, Element, ElementBody, ElementDraft, ElementId, ElementPatch};
use crate::frame::{EraseBlot, Frame, FrameSink};
use crate::hit::{element_at_point, elements_in_marquee};
use crate::input::PointerEvent;
use crate::presence::{Participant, PresenceSource, StaticRoster};
use crate::selection::{DragState, ResizeHandle, ResizeState, handles_for, hit_test_handles};
use crate::session::{InteractionSession, SessionSnapshot};
use crate::store::{ElementStore, StoreEvent, SubscriptionId};
use crate::tools::{ToolKind, ToolManager, ToolSettings, place_element};
use kurbo::{Point, Vec2};
use std::sync::Arc;

/// A single user's board: elements, selection, active tool and gesture.
///
/// Every call runs to completion synchronously and ends by presenting a
/// fresh [`Frame`] to the registered sinks.
pub struct Canvas {
    config: EngineConfig,
    store: ElementStore,
    tools: ToolManager,
    sticky_edit: Option<StickyEdit>,
    pending_blots: Vec<EraseBlot>,
    raster_cleared: bool,
    presence: Box<dyn PresenceSource>,
    sinks: Vec<Box<dyn FrameSink>>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("board_id", &self.config.board_id)
            .field("store", &self.store)
            .field("tool", &self.tools.current_tool)
            .field("session", &self.tools.session.name())
            .field("sticky_edit", &self.sticky_edit)
            .finish_non_exhaustive()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Canvas {
    /// Create an empty board with nobody else present.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_presence(config, Box::new(StaticRoster::empty()))
    }

    pub fn with_presence(config: EngineConfig, presence: Box<dyn PresenceSource>) -> Self {
        let tools = ToolManager::with_settings(config.default_tool, config.tool_settings.clone());
        Self {
            config,
            store: ElementStore::new(),
            tools,
            sticky_edit: None,
            pending_blots: Vec::new(),
            raster_cleared: false,
            presence,
            sinks: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Direct store access for hosts that mutate elements outside of
    /// pointer input.
    pub fn store_mut(&mut self) -> &mut ElementStore {
        &mut self.store
    }

    pub fn elements(&self) -> &[Arc<Element>] {
        self.store.list()
    }

    /// Register a store observer (persistence, replication).
    pub fn subscribe(&mut self, callback: impl FnMut(&StoreEvent<'_>) + 'static) -> SubscriptionId {
        self.store.subscribe(callback)
    }

    /// Register a render callback. It immediately receives the current frame.
    pub fn add_sink(&mut self, sink: impl FrameSink + 'static) {
        self.sinks.push(Box::new(sink));
        self.render();
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.presence.participants()
    }

    /// Load saved elements, replacing whatever is on the board.
    pub fn restore(&mut self, elements: Vec<Element>) {
        log::info!(
            "Restoring {} elements on board {}",
            elements.len(),
            self.config.board_id
        );
        self.tools.session = InteractionSession::Idle;
        self.sticky_edit = None;
        self.store.restore(elements);
        self.render();
    }

    // --- Tools ---

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Switch tools. Any gesture in progress is dropped, and leaving
    /// `select` drops the selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tools.current_tool && self.tools.session.is_idle() {
            return;
        }
        log::info!("Tool changed: {} -> {}", self.tools.current_tool, tool);
        self.tools.set_tool(tool);
        if tool != ToolKind::Select {
            self.store.clear_selection();
        }
        self.render();
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.tools.settings
    }

    /// Change tool settings; values are clamped to their ranges.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut ToolSettings)) {
        f(&mut self.tools.settings);
        self.tools.settings = self.tools.settings.clone().normalized();
    }

    pub fn session(&self) -> &InteractionSession {
        &self.tools.session
    }

    // --- Pointer input ---

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, additive } => self.pointer_down(position, additive),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    pub fn pointer_down(&mut self, point: Point, additive: bool) {
        let point = self.clamp(point);
        if !self.tools.session.is_idle() {
            // A down without an up; finish the old gesture first.
            self.finish_session();
        }

        match self.tools.current_tool {
            ToolKind::Select => self.select_down(point, additive),
            ToolKind::Brush => {
                self.tools.session = InteractionSession::Stroke { last_point: point };
            }
            ToolKind::Eraser => {
                self.erase_at(point);
                self.tools.session = InteractionSession::Erasing;
            }
            ToolKind::Delete => {
                self.tools.session = InteractionSession::DeleteDrag {
                    anchor: point,
                    previous: point,
                };
            }
            tool => self.place(tool, point),
        }
        log::debug!("Pointer down at {point:?}, session {}", self.tools.session.name());
        self.render();
    }

    pub fn pointer_move(&mut self, point: Point) {
        let point = self.clamp(point);
        if self.tools.session.is_idle() {
            return;
        }
        self.advance_session(point);
        self.render();
    }

    pub fn pointer_up(&mut self, point: Point) {
        let point = self.clamp(point);
        if !self.tools.session.is_idle() {
            self.advance_session(point);
            self.finish_session();
        }
        self.render();
    }

    /// Pointer left the surface: finishes the gesture like a release.
    pub fn pointer_leave(&mut self) {
        if !self.tools.session.is_idle() {
            self.finish_session();
        }
        self.render();
    }

    /// Start resizing `id` through `handle`.
    ///
    /// Only resizable elements that are currently selected can be grabbed.
    pub fn begin_resize(&mut self, id: &str, handle: ResizeHandle, point: Point) -> bool {
        let point = self.clamp(point);
        if !self.store.selection().contains(id) {
            return false;
        }
        let Some(frame) = self.store.get(id).and_then(|e| e.body.frame()) else {
            return false;
        };
        log::debug!("Resize {handle:?} on {id}");
        self.tools.session = InteractionSession::Resizing(ResizeState::new(id.to_string(), handle, point, frame));
        self.render();
        true
    }

    fn select_down(&mut self, point: Point, additive: bool) {
        let handles = handles_for(self.store.selected_elements().iter());
        if let Some(handle) = hit_test_handles(&handles, point, self.config.handle_tolerance) {
            let id = handle.element_id.clone();
            let kind = handle.kind;
            if let Some(frame) = self.store.get(&id).and_then(|e| e.body.frame()) {
                self.tools.session = InteractionSession::Resizing(ResizeState::new(id, kind, point, frame));
                return;
            }
        }

        let hit = element_at_point(self.store.list(), point, self.config.hit_tolerance).map(|e| e.id.clone());
        match hit {
            Some(id) => {
                let click_target = if additive {
                    self.store.toggle_selected(&id);
                    None
                } else if self.store.selection().contains(&id) {
                    // Keep a multi-selection for dragging; a click without
                    // movement narrows it on release.
                    Some(id.clone())
                } else {
                    self.store.select_only(&id);
                    None
                };
                if self.store.selection().contains(&id) {
                    let mut drag = DragState::new(point, self.store.selected_elements());
                    drag.click_target = click_target;
                    self.tools.session = InteractionSession::Dragging(drag);
                }
            }
            None => {
                if !additive {
                    self.store.clear_selection();
                }
                self.tools.session = InteractionSession::Marquee {
                    start: point,
                    current: point,
                };
            }
        }
    }

    fn advance_session(&mut self, point: Point) {
        match &mut self.tools.session {
            InteractionSession::Marquee { current, .. } => *current = point,
            InteractionSession::Dragging(drag) => drag.current_point = point,
            InteractionSession::Resizing(resize) => resize.current_point = point,
            InteractionSession::Idle
            | InteractionSession::Stroke { .. }
            | InteractionSession::DeleteDrag { .. }
            | InteractionSession::Erasing => {}
        }

        match self.tools.session.clone() {
            InteractionSession::Stroke { last_point } => {
                if last_point != point {
                    self.append_stroke(last_point, point);
                }
                self.tools.session = InteractionSession::Stroke { last_point: point };
            }
            InteractionSession::Erasing => self.erase_at(point),
            InteractionSession::DeleteDrag { anchor, .. } => {
                self.delete_crossed(anchor, point);
                self.tools.session = InteractionSession::DeleteDrag {
                    anchor: point,
                    previous: anchor,
                };
            }
            _ => {}
        }
    }

    fn finish_session(&mut self) {
        let session = self.tools.take_session();
        log::debug!("Finishing {} session", session.name());
        match session {
            InteractionSession::Marquee { start, current } => {
                let ids = elements_in_marquee(self.store.list(), start, current);
                self.store.set_selection(ids);
            }
            InteractionSession::Dragging(drag) => {
                let delta = drag.delta();
                if delta == Vec2::ZERO {
                    if let Some(id) = drag.click_target {
                        self.store.select_only(&id);
                    }
                } else {
                    let patch = ElementPatch::offset(delta);
                    for id in drag.originals.keys() {
                        self.store.update(id, &patch);
                    }
                }
            }
            InteractionSession::Resizing(resize) => {
                let frame = resize.frame(self.config.min_resize);
                if frame != resize.original_frame {
                    self.store.update(&resize.element_id, &ElementPatch::frame(frame));
                }
            }
            InteractionSession::Idle
            | InteractionSession::Stroke { .. }
            | InteractionSession::DeleteDrag { .. }
            | InteractionSession::Erasing => {}
        }
    }

    fn append_stroke(&mut self, from: Point, to: Point) {
        let settings = &self.tools.settings;
        let stroke = BrushStroke::new(from, to, settings.brush_size, settings.color)
            .with_style(settings.brush_style)
            .with_opacity(settings.opacity);
        let draft = self.draft(ElementBody::BrushStroke(stroke));
        self.store.add(draft);
    }

    fn erase_at(&mut self, point: Point) {
        self.pending_blots.push(EraseBlot {
            center: point,
            radius: self.tools.settings.brush_size,
        });
    }

    fn delete_crossed(&mut self, from: Point, to: Point) {
        let doomed: Vec<ElementId> = self
            .store
            .list()
            .iter()
            .filter(|e| e.crossed_by(from, to))
            .map(|e| e.id.clone())
            .collect();
        for id in doomed {
            log::info!("Delete tool removed element {id}");
            self.store.remove(&id);
        }
    }

    fn place(&mut self, tool: ToolKind, point: Point) {
        if let Some(body) = place_element(tool, point, &self.tools.settings) {
            let draft = self.draft(body);
            let element = self.store.add(draft);
            log::info!("Placed {tool} {} at {:?}", element.id, element.bounds().origin());
        }
    }

    fn draft(&self, body: ElementBody) -> ElementDraft {
        let draft = ElementDraft::new(body);
        match &self.config.user_id {
            Some(user) => draft.created_by(user.clone()),
            None => draft,
        }
    }

    fn clamp(&self, point: Point) -> Point {
        let size = self.config.surface;
        Point::new(
            point.x.clamp(0.0, size.width.max(0.0)),
            point.y.clamp(0.0, size.height.max(0.0)),
        )
    }

    // --- Selection and bulk edits ---

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
        self.render();
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids: Vec<ElementId> = self.store.selection().iter().cloned().collect();
        let mut removed = 0;
        for id in &ids {
            if self.store.remove(id).is_some() {
                removed += 1;
            }
        }
        self.store.clear_selection();
        log::info!("Deleted {removed} selected elements");
        self.render();
        removed
    }

    /// Remove every element one at a time, reset the selection and wipe the
    /// eraser layer.
    pub fn clear_canvas(&mut self) -> usize {
        self.tools.session = InteractionSession::Idle;
        self.sticky_edit = None;
        self.pending_blots.clear();
        self.raster_cleared = true;
        let removed = self.store.clear_all();
        log::info!("Cleared board {} ({removed} elements)", self.config.board_id);
        self.render();
        removed
    }

    // --- Sticky note editing ---

    /// Double click: opens the sticky note under `point` for editing.
    pub fn double_click(&mut self, point: Point) -> bool {
        let point = self.clamp(point);
        let target = element_at_point(self.store.list(), point, self.config.hit_tolerance)
            .filter(|e| matches!(e.body, ElementBody::Sticky(_)))
            .map(|e| e.id.clone());
        match target {
            Some(id) => self.begin_sticky_edit(&id),
            None => false,
        }
    }

    pub fn begin_sticky_edit(&mut self, id: &str) -> bool {
        let Some(element) = self.store.get(id) else {
            return false;
        };
        let ElementBody::Sticky(note) = &element.body else {
            return false;
        };
        log::debug!("Editing sticky note {id}");
        self.sticky_edit = Some(StickyEdit::new(element.id.clone(), &note.content));
        self.render();
        true
    }

    pub fn sticky_edit(&self) -> Option<&StickyEdit> {
        self.sticky_edit.as_ref()
    }

    /// Replace the edit buffer. Ignored when not editing.
    pub fn set_sticky_text(&mut self, text: &str) {
        if let Some(edit) = &mut self.sticky_edit {
            edit.buffer = text.to_string();
            self.render();
        }
    }

    /// Write the buffer to the note and leave edit mode.
    pub fn commit_sticky_edit(&mut self) -> bool {
        let Some(edit) = self.sticky_edit.take() else {
            return false;
        };
        let saved = self
            .store
            .update(&edit.element_id, &ElementPatch::content(edit.buffer))
            .is_some();
        self.render();
        saved
    }

    /// Leave edit mode without touching the note.
    pub fn cancel_sticky_edit(&mut self) {
        if self.sticky_edit.take().is_some() {
            self.render();
        }
    }

    pub fn handle_edit_key(&mut self, key: EditKey) {
        match key {
            EditKey::Save => {
                self.commit_sticky_edit();
            }
            EditKey::Cancel => self.cancel_sticky_edit(),
        }
    }

    // --- Rendering ---

    /// Present the current state to every sink.
    pub fn render(&mut self) {
        let mut sinks = std::mem::take(&mut self.sinks);
        if !sinks.is_empty() {
            {
                let frame = self.frame();
                for sink in sinks.iter_mut() {
                    sink.present(&frame);
                }
            }
            self.pending_blots.clear();
            self.raster_cleared = false;
        }
        sinks.append(&mut self.sinks);
        self.sinks = sinks;
    }

    /// Snapshot of the current state.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            elements: self.store.list(),
            selection: self.store.selection(),
            session: self.session_snapshot(),
            handles: handles_for(self.store.selected_elements().iter()),
            erase_blots: self.pending_blots.clone(),
            raster_cleared: self.raster_cleared,
            sticky_edit: self.sticky_edit.as_ref(),
            tool: self.tools.current_tool,
        }
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        self.tools.session.snapshot(self.config.min_resize)
    }
}
