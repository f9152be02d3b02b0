//! Error types for the layout engine.
//!
//! A layout pass itself never fails; these errors are reported by the static
//! checks run when layouts and options are loaded.

use thiserror::Error;

/// Problems found while validating a layout tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Layout nesting depth exceeds the maximum of {max}")]
    NestingTooDeep { max: u32 },

    #[error("Negative {axis} size ({value}) on layout level")]
    NegativeSize { axis: &'static str, value: i32 },

    #[error("Negative {side} margin ({value})")]
    NegativeMargin { side: &'static str, value: i32 },

    #[error("Negative interline spacing ({value})")]
    NegativeSpacing { value: i32 },

    #[error("Glue at item {index} has negative amount {amount}")]
    NegativeGlue { index: usize, amount: i32 },

    #[error("Item {index} references an empty name")]
    EmptyName { index: usize },

    #[error("Generator at item {index} has no inserts")]
    EmptyGenerator { index: usize },
}

/// Invalid layout options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("UI scale must be finite and positive, got {scale}")]
    InvalidScale { scale: f32 },

    #[error("Grid size must not be negative, got {grid_size}")]
    NegativeGridSize { grid_size: i32 },

    #[error("Maximum nesting depth must be at least 1")]
    ZeroDepth,
}
