//! Layout pass configuration.

use alice_core::ConfigError;

/// What happens to sizes computed for filling items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillPolicy {
    /// Filled sizes only exist for the duration of the pass
    #[default]
    PassLocal,
    /// Filled sizes are written to the host. Control sizes persist; window
    /// sizes are restored once the window's own layout has been drawn.
    WriteBack,
}

/// Options for a layout pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Ambient UI scale passed to render callbacks
    pub scale: f32,
    /// Editor grid size; paged levels reserve two grid cells
    pub grid_size: i32,
    /// Deepest allowed nesting of sub-layouts and windows
    pub max_depth: u32,
    pub fill_policy: FillPolicy,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            grid_size: 8,
            max_depth: 32,
            fill_policy: FillPolicy::PassLocal,
        }
    }
}

impl LayoutOptions {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_grid_size(mut self, grid_size: i32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_fill_policy(mut self, fill_policy: FillPolicy) -> Self {
        self.fill_policy = fill_policy;
        self
    }

    /// Vertical space a paged level keeps free for page controls.
    pub fn page_reserve(&self) -> i32 {
        2 * self.grid_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale { scale: self.scale });
        }
        if self.grid_size < 0 {
            return Err(ConfigError::NegativeGridSize { grid_size: self.grid_size });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}
