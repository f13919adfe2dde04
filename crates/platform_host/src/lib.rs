//! Typed host-domain contracts shared by the runtime and concrete host adapters.
//!
//! This crate is the API-first boundary for platform services. It defines the
//! per-domain state store, the assistant and media-capture collaborator
//! traits, and the deferred-task queue. Concrete adapters (browser storage,
//! a real model backend, real capture devices) live outside this workspace;
//! the in-memory and no-op implementations here back tests and headless runs.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod assistant;
pub mod deferred;
pub mod media;
pub mod storage;

pub use assistant::{
    AssistantError, AssistantService, HostFuture, NoopAssistantService, ScriptedAssistantService,
};
pub use deferred::DeferredQueue;
pub use media::{
    FailingMediaCaptureService, MediaCaptureError, MediaCaptureService, MediaStreamHandle,
    RecordingMediaCaptureService,
};
pub use storage::{
    MemoryStateStore, NoopStateStore, StateDomain, StateStore, StateStoreFuture,
};
