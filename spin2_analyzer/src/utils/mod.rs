//! Shared primitive types used by every analyzer stage

pub mod span;

pub use span::{Position, SourceLines, Span};
