//! Sketchboard Core Library
//!
//! Platform-agnostic element model, tool state machine and persistence for
//! the Sketchboard whiteboard.

pub mod canvas;
pub mod config;
pub mod edit;
pub mod element;
pub mod frame;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod presence;
pub mod selection;
pub mod session;
pub mod storage;
pub mod store;
pub mod tools;

pub use canvas::Canvas;
pub use config::{ConfigError, EngineConfig};
pub use edit::{EditKey, StickyEdit};
pub use element::{Element, ElementBody, ElementDraft, ElementId, ElementKind, ElementPatch, SerializableColor};
pub use frame::{EraseBlot, Frame, FrameSink};
pub use input::{ClickTracker, Modifiers, PointerEvent};
pub use presence::{Participant, PresenceSource, StaticRoster};
pub use selection::{Handle, ResizeHandle, SelectionSet};
pub use session::{InteractionSession, SessionSnapshot};
pub use store::{ElementStore, StoreChange, StoreEvent, SubscriptionId};
pub use tools::{ToolKind, ToolManager, ToolSettings};
