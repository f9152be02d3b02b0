//! The layout item model.
//!
//! Layout trees are authored offline and loaded once per project. They are
//! never mutated by a layout pass: name resolution state lives in a separate
//! cache owned by the layout engine.

use glam::IVec2;

use crate::errors::LayoutError;
use crate::types::{GlueKind, LayoutMode, LineAlignment, Margins, TemplateId};

/// A reference by name to a control or window, with its flow flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementRef {
    pub name: String,
    /// Absorb leftover space horizontally (or take the full cross extent)
    pub fill_x: bool,
    /// Absorb leftover space vertically (or take the full cross extent)
    pub fill_y: bool,
    /// Offset from the container origin; `None` for items placed by the flow
    pub absolute_position: Option<IVec2>,
}

impl ElementRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn fill_x(mut self) -> Self {
        self.fill_x = true;
        self
    }

    pub fn fill_y(mut self) -> Self {
        self.fill_y = true;
        self
    }

    pub fn absolute(mut self, x: i32, y: i32) -> Self {
        self.absolute_position = Some(IVec2::new(x, y));
        self
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute_position.is_some()
    }
}

/// A spacing token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glue {
    pub amount: i32,
    pub kind: GlueKind,
}

impl Glue {
    pub fn standard(amount: i32) -> Self {
        Self { amount, kind: GlueKind::Standard }
    }

    pub fn at_least(amount: i32) -> Self {
        Self { amount, kind: GlueKind::AtLeast }
    }

    pub fn no_break(amount: i32) -> Self {
        Self { amount, kind: GlueKind::NoBreak }
    }

    pub fn line_break() -> Self {
        Self { amount: 0, kind: GlueKind::LineBreak }
    }

    pub fn page_break() -> Self {
        Self { amount: 0, kind: GlueKind::PageBreak }
    }
}

/// One window instance produced by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insert {
    pub window: String,
}

impl Insert {
    pub fn new(window: impl Into<String>) -> Self {
        Self { window: window.into() }
    }
}

/// Expands to one window slot per insert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Generator {
    pub inserts: Vec<Insert>,
}

impl Generator {
    pub fn new<I, S>(windows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inserts: windows.into_iter().map(Insert::new).collect(),
        }
    }
}

/// An element of a layout level.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutItem {
    Control(ElementRef),
    Window(ElementRef),
    Glue(Glue),
    Generator(Generator),
    SubLayout(Box<LayoutLevel>),
}

impl LayoutItem {
    /// Number of cursor slots the item occupies.
    pub fn slot_count(&self) -> usize {
        match self {
            LayoutItem::Generator(g) => g.inserts.len(),
            _ => 1,
        }
    }

    pub fn is_glue(&self) -> bool {
        matches!(self, LayoutItem::Glue(_))
    }

    /// The reference carried by controls and windows.
    pub fn element(&self) -> Option<&ElementRef> {
        match self {
            LayoutItem::Control(r) | LayoutItem::Window(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_absolute(&self) -> bool {
        self.element().is_some_and(ElementRef::is_absolute)
    }
}

impl From<Glue> for LayoutItem {
    fn from(glue: Glue) -> Self {
        LayoutItem::Glue(glue)
    }
}

impl From<Generator> for LayoutItem {
    fn from(generator: Generator) -> Self {
        LayoutItem::Generator(generator)
    }
}

impl From<LayoutLevel> for LayoutItem {
    fn from(level: LayoutLevel) -> Self {
        LayoutItem::SubLayout(Box::new(level))
    }
}

/// A layout region: an ordered item sequence and how to lay it out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutLevel {
    pub contents: Vec<LayoutItem>,
    pub mode: LayoutMode,
    /// Fixed width; `None` inherits the container's
    pub size_x: Option<i32>,
    /// Fixed height; `None` inherits the container's
    pub size_y: Option<i32>,
    pub margins: Margins,
    /// Gap between wrapped lines
    pub interline_spacing: i32,
    /// Placement of each line along the flow axis
    pub line_alignment: LineAlignment,
    /// Placement of each item across the flow axis
    pub line_internal_alignment: LineAlignment,
    pub template: Option<TemplateId>,
    /// Reserve room at the bottom for page controls
    pub paged: bool,
}

impl LayoutLevel {
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_item(mut self, item: impl Into<LayoutItem>) -> Self {
        self.contents.push(item.into());
        self
    }

    pub fn with_control(self, control: ElementRef) -> Self {
        self.with_item(LayoutItem::Control(control))
    }

    pub fn with_window(self, window: ElementRef) -> Self {
        self.with_item(LayoutItem::Window(window))
    }

    pub fn with_size(mut self, size_x: Option<i32>, size_y: Option<i32>) -> Self {
        self.size_x = size_x;
        self.size_y = size_y;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_interline_spacing(mut self, spacing: i32) -> Self {
        self.interline_spacing = spacing;
        self
    }

    pub fn with_alignment(mut self, line: LineAlignment, internal: LineAlignment) -> Self {
        self.line_alignment = line;
        self.line_internal_alignment = internal;
        self
    }

    pub fn with_template(mut self, template: TemplateId) -> Self {
        self.template = Some(template);
        self
    }

    pub fn paged(mut self, paged: bool) -> Self {
        self.paged = paged;
        self
    }

    /// Total number of flattened cursor slots.
    pub fn slot_count(&self) -> usize {
        self.contents.iter().map(LayoutItem::slot_count).sum()
    }

    /// The item and sub-index addressed by the `n`-th flattened slot.
    pub fn slot(&self, n: usize) -> Option<(&LayoutItem, usize)> {
        let mut first = 0;
        for item in &self.contents {
            let count = item.slot_count();
            if n < first + count {
                return Some((item, n - first));
            }
            first += count;
        }
        None
    }

    /// Check the level and its sub-layouts for authoring mistakes.
    pub fn validate(&self, max_depth: u32) -> Result<(), LayoutError> {
        self.validate_at(1, max_depth)
    }

    fn validate_at(&self, depth: u32, max_depth: u32) -> Result<(), LayoutError> {
        if depth > max_depth {
            return Err(LayoutError::NestingTooDeep { max: max_depth });
        }
        for (axis, size) in [("horizontal", self.size_x), ("vertical", self.size_y)] {
            if let Some(value) = size.filter(|v| *v < 0) {
                return Err(LayoutError::NegativeSize { axis, value });
            }
        }
        let m = &self.margins;
        for (side, value) in [("top", Some(m.top)), ("bottom", m.bottom), ("left", m.left), ("right", m.right)] {
            if let Some(value) = value.filter(|v| *v < 0) {
                return Err(LayoutError::NegativeMargin { side, value });
            }
        }
        if self.interline_spacing < 0 {
            return Err(LayoutError::NegativeSpacing { value: self.interline_spacing });
        }

        for (index, item) in self.contents.iter().enumerate() {
            match item {
                LayoutItem::Control(r) | LayoutItem::Window(r) => {
                    if r.name.is_empty() {
                        return Err(LayoutError::EmptyName { index });
                    }
                }
                LayoutItem::Glue(glue) => {
                    if glue.amount < 0 {
                        return Err(LayoutError::NegativeGlue { index, amount: glue.amount });
                    }
                }
                LayoutItem::Generator(generator) => {
                    if generator.inserts.is_empty() {
                        return Err(LayoutError::EmptyGenerator { index });
                    }
                    if generator.inserts.iter().any(|i| i.window.is_empty()) {
                        return Err(LayoutError::EmptyName { index });
                    }
                }
                LayoutItem::SubLayout(level) => level.validate_at(depth + 1, max_depth)?,
            }
        }
        Ok(())
    }
}
