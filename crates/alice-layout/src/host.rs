//! Interfaces to the editor that owns windows, controls and rendering.

use std::collections::HashMap;

use alice_core::{LayoutLevel, Rect, Size, TemplateId};

/// Index of a window in the host's open-window list.
pub type WindowIndex = usize;

/// Index of a control in its window's child list.
pub type ControlIndex = usize;

/// The live objects a layout pass reads from and draws to.
///
/// Rectangles are in layout units; `scale` is the ambient UI scale the
/// renderer applies to reach screen space.
pub trait LayoutHost {
    fn window_count(&self) -> usize;

    fn window_name(&self, window: WindowIndex) -> Option<&str>;

    fn window_size(&self, window: WindowIndex) -> Size;

    fn control_count(&self, window: WindowIndex) -> usize;

    fn control_name(&self, window: WindowIndex, control: ControlIndex) -> Option<&str>;

    fn control_size(&self, window: WindowIndex, control: ControlIndex) -> Size;

    /// Find a window by name, scanning from the end of the list.
    fn find_window(&self, name: &str) -> Option<WindowIndex> {
        (0..self.window_count())
            .rev()
            .find(|&i| self.window_name(i) == Some(name))
    }

    /// Find a control of `window` by name, scanning from the end of the list.
    fn find_control(&self, window: WindowIndex, name: &str) -> Option<ControlIndex> {
        (0..self.control_count(window))
            .rev()
            .find(|&i| self.control_name(window, i) == Some(name))
    }

    /// Override a window's size. Only called under [`FillPolicy::WriteBack`].
    ///
    /// [`FillPolicy::WriteBack`]: crate::FillPolicy::WriteBack
    fn set_window_size(&mut self, _window: WindowIndex, _size: Size) {}

    /// Override a control's size. Only called under [`FillPolicy::WriteBack`].
    ///
    /// [`FillPolicy::WriteBack`]: crate::FillPolicy::WriteBack
    fn set_control_size(&mut self, _window: WindowIndex, _control: ControlIndex, _size: Size) {}

    /// Template used for layout regions of `window` that name none themselves.
    fn window_layout_template(&self, _window: WindowIndex) -> Option<TemplateId> {
        None
    }

    /// Draw a placed control.
    fn render_control(&mut self, window: WindowIndex, control: ControlIndex, rect: Rect, scale: f32);

    /// Draw a window's frame and background. Its layout is drawn afterwards.
    fn render_window(&mut self, window: WindowIndex, rect: Rect, scale: f32);

    /// Draw the background of a layout region.
    fn render_region(&mut self, _template: TemplateId, _rect: Rect, _layer: u32, _scale: f32) {}
}

/// Source of each window's root layout.
pub trait WindowLayouts {
    fn layout_of(&self, window: WindowIndex) -> Option<&LayoutLevel>;
}

impl WindowLayouts for [LayoutLevel] {
    fn layout_of(&self, window: WindowIndex) -> Option<&LayoutLevel> {
        self.get(window)
    }
}

impl WindowLayouts for Vec<LayoutLevel> {
    fn layout_of(&self, window: WindowIndex) -> Option<&LayoutLevel> {
        self.get(window)
    }
}

impl WindowLayouts for [Option<LayoutLevel>] {
    fn layout_of(&self, window: WindowIndex) -> Option<&LayoutLevel> {
        self.get(window).and_then(Option::as_ref)
    }
}

impl WindowLayouts for Vec<Option<LayoutLevel>> {
    fn layout_of(&self, window: WindowIndex) -> Option<&LayoutLevel> {
        self.as_slice().layout_of(window)
    }
}

impl<S: std::hash::BuildHasher> WindowLayouts for HashMap<WindowIndex, LayoutLevel, S> {
    fn layout_of(&self, window: WindowIndex) -> Option<&LayoutLevel> {
        self.get(&window)
    }
}

/// Windows without any layout of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLayouts;

impl WindowLayouts for NoLayouts {
    fn layout_of(&self, _window: WindowIndex) -> Option<&LayoutLevel> {
        None
    }
}
