//! Shared desktop runtime: the window model, the UI command engine, user
//! interaction routing, the countdown tick, assistant context snapshots, and
//! persistence adapters.
//!
//! The runtime is renderer-agnostic. Hosts feed it parsed command batches
//! and user interactions, execute the returned [`engine::RuntimeEffect`]s,
//! and drive the 1 Hz tick and the deferred-task queue.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod context;
pub mod engine;
pub mod interact;
pub mod model;
pub mod persistence;
pub mod tick;

pub use context::AssistantContext;
pub use engine::{apply_commands, DesktopState, Notice, NoticeKind, RuntimeEffect};
pub use interact::{
    component_action, component_value_changed, image_generated, opponent_prompt,
    resolve_opponent_move,
};
pub use model::{Component, WindowCollection, WindowKind, WindowRecord, WindowState};
pub use persistence::load_desktop_state;
pub use tick::tick_second;
