//! Progression system: XP and levels, quests, achievements, and loot chests.
//!
//! All state here is plain data mutated through [`Progression`], which
//! reacts to activity events (words written, lines coded, focus sessions,
//! chest opening) and reports what happened as [`ProgressionEvent`]s so the
//! caller can surface notifications.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod engine;
pub mod model;

pub use engine::{Progression, ProgressionEvent};
pub use model::{
    default_achievements, Achievement, GamificationState, Quest, QuestCadence, QuestMetric,
    XP_PER_LINE_OF_CODE, XP_PER_LOOT_CHEST, XP_PER_SESSION_MINUTE, XP_PER_WORD,
};
