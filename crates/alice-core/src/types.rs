//! Core value types for the layout engine.
//!
//! All layout arithmetic is done in integer layout units. Conversion to
//! screen space (multiplying by the ambient UI scale) happens at the edges.

use glam::IVec2;

/// Flow axis of a layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Left to right
    #[default]
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Alignment of a line (or of an item within a line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineAlignment {
    /// Pack at the start of the axis
    #[default]
    Leading,
    /// Pack at the end of the axis
    Trailing,
    /// Center on the axis
    Centered,
}

impl LineAlignment {
    /// Offset of an item of size `used` within `extent`.
    pub fn offset(self, extent: i32, used: i32) -> i32 {
        match self {
            LineAlignment::Leading => 0,
            LineAlignment::Trailing => extent - used,
            LineAlignment::Centered => (extent - used) / 2,
        }
    }
}

/// Layout strategy of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutMode {
    #[default]
    SingleHorizontal,
    SingleVertical,
    OverlappedHorizontal,
    OverlappedVertical,
    MultilineHorizontal,
    MultilineVertical,
}

impl LayoutMode {
    /// The flow axis of the mode.
    pub fn axis(self) -> Axis {
        match self {
            LayoutMode::SingleHorizontal
            | LayoutMode::OverlappedHorizontal
            | LayoutMode::MultilineHorizontal => Axis::Horizontal,
            LayoutMode::SingleVertical
            | LayoutMode::OverlappedVertical
            | LayoutMode::MultilineVertical => Axis::Vertical,
        }
    }

    pub fn is_overlapped(self) -> bool {
        matches!(self, LayoutMode::OverlappedHorizontal | LayoutMode::OverlappedVertical)
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, LayoutMode::MultilineHorizontal | LayoutMode::MultilineVertical)
    }
}

/// Kind of a glue (spacing) item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlueKind {
    /// Fixed spacing
    #[default]
    Standard,
    /// Fixed spacing that also absorbs leftover space
    AtLeast,
    /// Ends the current line
    LineBreak,
    /// Ends the current line and the page
    PageBreak,
    /// Fixed spacing that binds its neighbours into one unbreakable unit
    NoBreak,
}

/// Opaque id of a visual template (layout region background).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateId(pub u32);

/// A width/height pair in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Build a size from its extent along `axis` and across it.
    pub fn from_axes(axis: Axis, primary: i32, cross: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(primary, cross),
            Axis::Vertical => Self::new(cross, primary),
        }
    }

    /// Extent along `axis`.
    pub fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Mutable extent along `axis`.
    pub fn along_mut(&mut self, axis: Axis) -> &mut i32 {
        match axis {
            Axis::Horizontal => &mut self.width,
            Axis::Vertical => &mut self.height,
        }
    }

    pub fn to_ivec2(self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }
}

/// Axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin(origin: IVec2, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Build a rectangle from coordinates expressed along `axis` and across it.
    pub fn from_axes(axis: Axis, primary: i32, cross: i32, primary_len: i32, cross_len: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(primary, cross, primary_len, cross_len),
            Axis::Vertical => Self::new(cross, primary, cross_len, primary_len),
        }
    }

    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Leading edge along `axis`.
    pub fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent along `axis`.
    pub fn extent(&self, axis: Axis) -> i32 {
        self.size().along(axis)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle (right/bottom edges exclusive).
    pub fn contains(&self, point: IVec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Compute intersection with another rectangle.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x1 < x2 && y1 < y2 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Shrink by margins.
    pub fn inset(&self, margins: &ResolvedMargins) -> Rect {
        Rect::new(
            self.x + margins.left,
            self.y + margins.top,
            self.width - margins.horizontal(),
            self.height - margins.vertical(),
        )
    }

    /// Convert to screen space. Sizes never collapse below one pixel.
    pub fn scaled(&self, scale: f32) -> ScreenRect {
        ScreenRect {
            x: self.x as f32 * scale,
            y: self.y as f32 * scale,
            width: ((self.width as f32 * scale) as i32).max(1),
            height: ((self.height as f32 * scale) as i32).max(1),
        }
    }
}

/// A rectangle in screen space, as handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: i32,
    pub height: i32,
}

/// Margins as authored. Unset sides inherit along top -> bottom -> left -> right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub top: i32,
    pub bottom: Option<i32>,
    pub left: Option<i32>,
    pub right: Option<i32>,
}

impl Margins {
    /// Same margin on every side.
    pub fn uniform(value: i32) -> Self {
        Self { top: value, ..Default::default() }
    }

    /// Apply the inheritance cascade.
    pub fn resolve(&self) -> ResolvedMargins {
        let top = self.top;
        let bottom = self.bottom.unwrap_or(top);
        let left = self.left.unwrap_or(bottom);
        let right = self.right.unwrap_or(left);
        ResolvedMargins { top, bottom, left, right }
    }
}

/// Margins with every side known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResolvedMargins {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl ResolvedMargins {
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}
