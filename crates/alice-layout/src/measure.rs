//! Measurement of single layout slots.
//!
//! Measuring resolves names through the [`ResolutionCache`] and reads live
//! sizes from the host. Nothing else is mutated, so measuring the same slot
//! twice gives the same answer as long as the host has not changed.

use alice_core::{Axis, ElementRef, GlueKind, LayoutItem, LayoutLevel, Size};

use crate::cache::ResolutionCache;
use crate::cursor::Cursor;
use crate::host::{LayoutHost, WindowIndex};

/// How a measured slot takes part in run breaking and space distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    #[default]
    None,
    /// Absorbs a share of the leftover space
    SpaceConsumer,
    /// Ends the current run
    EndLine,
    /// Ends the current run and the page
    EndPage,
}

/// Space a slot occupies along and across the flow axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurement {
    pub primary: i32,
    pub cross: i32,
    pub class: Classification,
    /// Kind of the glue, for glue slots
    pub glue: Option<GlueKind>,
}

impl Measurement {
    pub const EMPTY: Measurement = Measurement {
        primary: 0,
        cross: 0,
        class: Classification::None,
        glue: None,
    };

    fn sized(axis: Axis, size: Size) -> Self {
        Self {
            primary: size.along(axis),
            cross: size.along(axis.cross()),
            ..Self::EMPTY
        }
    }

    pub fn is_glue(&self) -> bool {
        self.glue.is_some()
    }

    pub fn is_no_break(&self) -> bool {
        self.glue == Some(GlueKind::NoBreak)
    }

    pub fn is_space_consumer(&self) -> bool {
        self.class == Classification::SpaceConsumer
    }
}

/// Measures slots of a layout owned by one window.
pub struct Measurer<'a, H: ?Sized> {
    host: &'a H,
    cache: &'a mut ResolutionCache,
    owner: WindowIndex,
}

impl<'a, H: LayoutHost + ?Sized> Measurer<'a, H> {
    /// `owner` is the window whose controls the layout refers to.
    pub fn new(host: &'a H, cache: &'a mut ResolutionCache, owner: WindowIndex) -> Self {
        Self { host, cache, owner }
    }

    /// Measure the slot under `cursor` for a run flowing along `axis`.
    ///
    /// `cross_limit` is the extent available across the flow; items that fill
    /// across the flow take all of it.
    pub fn measure(&mut self, cursor: &Cursor<'_>, axis: Axis, cross_limit: i32) -> Measurement {
        let Some(item) = cursor.current() else {
            return Measurement::EMPTY;
        };

        match item {
            LayoutItem::Control(element) => {
                let size = self
                    .cache
                    .resolve_control(self.host, self.owner, &element.name)
                    .map(|control| self.host.control_size(self.owner, control));
                measure_element(element, size, axis, cross_limit)
            }
            LayoutItem::Window(element) => {
                let size = self
                    .cache
                    .resolve_window(self.host, &element.name)
                    .map(|window| self.host.window_size(window));
                measure_element(element, size, axis, cross_limit)
            }
            LayoutItem::Glue(glue) => {
                let (primary, class) = match glue.kind {
                    GlueKind::Standard | GlueKind::NoBreak => (glue.amount, Classification::None),
                    GlueKind::AtLeast => (glue.amount, Classification::SpaceConsumer),
                    GlueKind::LineBreak => (0, Classification::EndLine),
                    GlueKind::PageBreak => (0, Classification::EndPage),
                };
                Measurement {
                    primary,
                    cross: 0,
                    class,
                    glue: Some(glue.kind),
                }
            }
            LayoutItem::Generator(generator) => {
                let mut current = None;
                for (i, insert) in generator.inserts.iter().enumerate() {
                    let resolved = self.cache.resolve_window(self.host, &insert.window);
                    if i == cursor.position().sub_index {
                        current = resolved;
                    }
                }
                match current {
                    Some(window) => Measurement::sized(axis, self.host.window_size(window)),
                    None => Measurement::EMPTY,
                }
            }
            LayoutItem::SubLayout(level) => measure_sub_layout(level, axis, cross_limit),
        }
    }

    /// Resolve the window produced by the generator slot under `cursor`.
    pub fn generated_window(&mut self, cursor: &Cursor<'_>) -> Option<WindowIndex> {
        match cursor.current()? {
            LayoutItem::Generator(generator) => {
                let insert = generator.inserts.get(cursor.position().sub_index)?;
                self.cache.resolve_window(self.host, &insert.window)
            }
            _ => None,
        }
    }
}

fn measure_element(element: &ElementRef, size: Option<Size>, axis: Axis, cross_limit: i32) -> Measurement {
    let Some(size) = size else {
        return Measurement::EMPTY;
    };
    if element.is_absolute() {
        return Measurement::EMPTY;
    }

    let mut result = Measurement::sized(axis, size);
    for (fill, fill_axis) in [(element.fill_x, Axis::Horizontal), (element.fill_y, Axis::Vertical)] {
        if !fill {
            continue;
        }
        if fill_axis == axis {
            result.primary = 0;
            result.class = Classification::SpaceConsumer;
        } else {
            result.cross = cross_limit;
        }
    }
    result
}

fn measure_sub_layout(level: &LayoutLevel, axis: Axis, cross_limit: i32) -> Measurement {
    let mut result = Measurement::EMPTY;
    for (fixed, size_axis) in [(level.size_x, Axis::Horizontal), (level.size_y, Axis::Vertical)] {
        let extent = match fixed {
            Some(size) => size,
            None if size_axis == axis => {
                result.class = Classification::SpaceConsumer;
                0
            }
            None => cross_limit,
        };
        if size_axis == axis {
            result.primary = extent;
        } else {
            result.cross = extent;
        }
    }
    result
}
