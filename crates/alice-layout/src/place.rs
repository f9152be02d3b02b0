//! Distribution of a run's leftover space.

use alice_core::LineAlignment;

use crate::solver::RunBox;

/// How a solved run spreads over its available extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinePlan {
    /// Extent not used by the run's natural sizes
    pub leftover: i32,
    /// Extra space granted to each space consumer
    pub per_fill: i32,
    /// Offset of the first slot from the start of the line
    pub lead: i32,
    /// Amount each non-glue item steps back onto its predecessor
    pub overlap: i32,
}

impl LinePlan {
    /// Plan a run placed in `extent` along the flow.
    ///
    /// Space consumers share the leftover evenly; whatever integer division
    /// leaves over is positioned by `alignment`. In overlapped mode a run that
    /// does not fit pulls its items together instead of overflowing.
    pub fn new(run: &RunBox, extent: i32, alignment: LineAlignment, overlapped: bool) -> Self {
        let mut leftover = extent - run.primary;
        if overlapped {
            leftover = leftover.max(0);
        }

        let per_fill = match run.fill_count {
            0 => 0,
            n => leftover / n as i32,
        };
        let remainder = leftover - per_fill * run.fill_count as i32;

        let overlap = if overlapped && run.non_glue_count > 1 && run.primary > extent {
            (run.primary - extent) / (run.non_glue_count as i32 - 1)
        } else {
            0
        };

        Self {
            leftover,
            per_fill,
            lead: alignment.offset(remainder, 0),
            overlap,
        }
    }

    /// Space left after the last slot of the line.
    pub fn trailing_gap(&self, fill_count: usize) -> i32 {
        self.leftover - self.lead - self.per_fill * fill_count as i32
    }
}

/// Offset of an item within a line's cross extent.
pub fn cross_offset(alignment: LineAlignment, line_cross: i32, item_cross: i32) -> i32 {
    alignment.offset(line_cross, item_cross)
}
