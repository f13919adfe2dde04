//! Calculator window engine.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod engine;

pub use engine::{BinaryOp, CalcAction, CalculatorState};
