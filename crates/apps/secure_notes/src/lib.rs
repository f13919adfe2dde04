//! Encrypted-note sessions and the secure-photo creator.
//!
//! Both flows mutate the vault through password-gated state machines. The
//! note session guards unlock/lock/edit on an existing vault item; the photo
//! creator walks a new item from image capture to a locked vault entry.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod note_session;
pub mod photo_creator;

pub use note_session::{apply_note_action, edit_note_content, NoteAction, NoteSessionError};
pub use photo_creator::{PhotoCreatorPhase, PhotoCreatorState, MAX_IMAGE_BYTES};
