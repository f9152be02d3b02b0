//! Box-and-glue layout for Alice UI windows.
//!
//! This crate places the controls, nested windows and sub-layouts of a
//! window's layout tree and hands the results to the editor's renderer.
//!
//! # Architecture
//!
//! 1. **Cursor**: a flat, bidirectional view of a level's items in which
//!    generators expand to one slot per generated window
//! 2. **Measurement**: the space one slot takes along and across the flow
//! 3. **Box solver**: greedy run filling with rollback over no-break glue
//! 4. **Placement**: fill distribution, alignment and overlap, then recursion
//!    into windows and sub-layouts
//!
//! # Example
//!
//! ```ignore
//! use alice_layout::{LayoutEngine, LayoutOptions};
//!
//! let mut engine = LayoutEngine::new(LayoutOptions::default());
//! let tree = engine.render_window(&mut host, &layouts, window, IVec2::ZERO);
//!
//! let under_mouse = tree.probe(mouse_position);
//! ```

mod cache;
mod compute;
mod cursor;
mod host;
mod measure;
mod options;
mod place;
mod recording;
mod solver;
mod tree;

pub use cache::{CacheStats, ResolutionCache};
pub use compute::LayoutEngine;
pub use cursor::{Cursor, Position};
pub use host::{ControlIndex, LayoutHost, NoLayouts, WindowIndex, WindowLayouts};
pub use measure::{Classification, Measurement, Measurer};
pub use options::{FillPolicy, LayoutOptions};
pub use place::{cross_offset, LinePlan};
pub use recording::{DrawCommand, HostControl, HostWindow, RecordingHost};
pub use solver::{solve_run, RunBox};
pub use tree::{LayoutNode, LayoutNodeId, LayoutTree, MouseProbe, NodeKind};
