//! An in-memory host that records draw calls.
//!
//! Useful for tools that want the placement of a window without a renderer,
//! and for tests.

use alice_core::{Rect, Size, TemplateId};

use crate::host::{ControlIndex, LayoutHost, WindowIndex};

/// A control owned by a [`HostWindow`].
#[derive(Debug, Clone, PartialEq)]
pub struct HostControl {
    pub name: String,
    pub size: Size,
}

/// A window known to a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct HostWindow {
    pub name: String,
    pub size: Size,
    pub controls: Vec<HostControl>,
    pub layout_template: Option<TemplateId>,
}

impl HostWindow {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            size,
            controls: Vec::new(),
            layout_template: None,
        }
    }

    pub fn with_control(mut self, name: impl Into<String>, size: Size) -> Self {
        self.controls.push(HostControl { name: name.into(), size });
        self
    }

    pub fn with_layout_template(mut self, template: TemplateId) -> Self {
        self.layout_template = Some(template);
        self
    }
}

/// A recorded host callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Control {
        window: WindowIndex,
        control: ControlIndex,
        rect: Rect,
        scale: f32,
    },
    Window {
        window: WindowIndex,
        rect: Rect,
        scale: f32,
    },
    Region {
        template: TemplateId,
        rect: Rect,
        layer: u32,
        scale: f32,
    },
}

/// Host backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub windows: Vec<HostWindow>,
    pub commands: Vec<DrawCommand>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window and return its index.
    pub fn add_window(&mut self, window: HostWindow) -> WindowIndex {
        self.windows.push(window);
        self.windows.len() - 1
    }

    /// Take the recorded commands, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Rectangles at which `window`'s control named `name` was drawn.
    pub fn control_rects(&self, window: WindowIndex, name: &str) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match *command {
                DrawCommand::Control { window: w, control, rect, .. }
                    if w == window && self.control_name(w, control) == Some(name) =>
                {
                    Some(rect)
                }
                _ => None,
            })
            .collect()
    }

    /// Rectangles at which the window named `name` was drawn.
    pub fn window_rects(&self, name: &str) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match *command {
                DrawCommand::Window { window, rect, .. } if self.window_name(window) == Some(name) => {
                    Some(rect)
                }
                _ => None,
            })
            .collect()
    }
}

impl LayoutHost for RecordingHost {
    fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn window_name(&self, window: WindowIndex) -> Option<&str> {
        self.windows.get(window).map(|w| w.name.as_str())
    }

    fn window_size(&self, window: WindowIndex) -> Size {
        self.windows.get(window).map_or(Size::ZERO, |w| w.size)
    }

    fn control_count(&self, window: WindowIndex) -> usize {
        self.windows.get(window).map_or(0, |w| w.controls.len())
    }

    fn control_name(&self, window: WindowIndex, control: ControlIndex) -> Option<&str> {
        self.windows
            .get(window)
            .and_then(|w| w.controls.get(control))
            .map(|c| c.name.as_str())
    }

    fn control_size(&self, window: WindowIndex, control: ControlIndex) -> Size {
        self.windows
            .get(window)
            .and_then(|w| w.controls.get(control))
            .map_or(Size::ZERO, |c| c.size)
    }

    fn set_window_size(&mut self, window: WindowIndex, size: Size) {
        if let Some(w) = self.windows.get_mut(window) {
            w.size = size;
        }
    }

    fn set_control_size(&mut self, window: WindowIndex, control: ControlIndex, size: Size) {
        if let Some(c) = self.windows.get_mut(window).and_then(|w| w.controls.get_mut(control)) {
            c.size = size;
        }
    }

    fn window_layout_template(&self, window: WindowIndex) -> Option<TemplateId> {
        self.windows.get(window).and_then(|w| w.layout_template)
    }

    fn render_control(&mut self, window: WindowIndex, control: ControlIndex, rect: Rect, scale: f32) {
        self.commands.push(DrawCommand::Control { window, control, rect, scale });
    }

    fn render_window(&mut self, window: WindowIndex, rect: Rect, scale: f32) {
        self.commands.push(DrawCommand::Window { window, rect, scale });
    }

    fn render_region(&mut self, template: TemplateId, rect: Rect, layer: u32, scale: f32) {
        self.commands.push(DrawCommand::Region { template, rect, layer, scale });
    }
}
