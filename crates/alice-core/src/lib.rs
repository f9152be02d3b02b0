//! Core types for the Alice UI layout engine.
//!
//! This crate provides the foundational types shared by the layout crates:
//! - The layout item model (controls, windows, glue, generators, sub-layouts)
//! - Integer geometry and axis helpers
//! - Error types

pub mod errors;
pub mod item;
pub mod types;

pub use errors::*;
pub use item::*;
pub use types::*;

pub use glam::IVec2;
