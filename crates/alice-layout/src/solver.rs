//! Box solver: decides which slots form one run.
//!
//! A run is solved in two passes. The forward pass greedily accepts slots
//! until one overflows the run's primary extent. If it stopped on overflow,
//! the backward pass then gives back any trailing slots that are bound by
//! no-break glue to the rejected slot, so no-break glue never ends a run.

use alice_core::Axis;

use crate::cursor::Cursor;
use crate::host::LayoutHost;
use crate::measure::{Classification, Measurement, Measurer};

/// Aggregate statistics of a solved run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunBox {
    /// Space used along the flow, clamped to the run's maximum
    pub primary: i32,
    /// Largest cross extent of any slot in the run
    pub cross: i32,
    /// Slots in the run, glue and absolute items included
    pub item_count: usize,
    /// Slots classified as space consumers
    pub fill_count: usize,
    /// Slots that are neither glue nor absolutely positioned
    pub non_glue_count: usize,
    /// The run ended on a page break
    pub end_page: bool,
}

impl RunBox {
    fn accept(&mut self, m: &Measurement, absolute: bool, max_primary: i32) {
        self.primary = self.primary.saturating_add(m.primary).min(max_primary);
        self.cross = self.cross.max(m.cross);
        if m.is_space_consumer() {
            self.fill_count += 1;
        }
        if !m.is_glue() && !absolute {
            self.non_glue_count += 1;
        }
        self.item_count += 1;
        if m.class == Classification::EndPage {
            self.end_page = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Why the forward pass stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Exhausted,
    Break,
    Overflow,
}

/// Solve one run starting at `cursor`, leaving the cursor just past it.
///
/// Slots are measured along `axis` with `max_cross` as the cross limit. The
/// first slot of a run and every glue slot are always accepted, so a run that
/// starts on a slot is never empty.
pub fn solve_run<H>(
    cursor: &mut Cursor<'_>,
    measurer: &mut Measurer<'_, H>,
    axis: Axis,
    max_primary: i32,
    max_cross: i32,
) -> RunBox
where
    H: LayoutHost + ?Sized,
{
    let start = cursor.position();
    let mut run = RunBox::default();
    let mut stop = Stop::Exhausted;

    while cursor.has_more() {
        let m = measurer.measure(cursor, axis, max_cross);
        let fits = cursor.position() == start
            || m.is_glue()
            || run.primary.saturating_add(m.primary) <= max_primary;
        if !fits {
            stop = Stop::Overflow;
            break;
        }

        run.accept(&m, cursor.current_is_absolute(), max_primary);
        cursor.advance(1);
        if matches!(m.class, Classification::EndLine | Classification::EndPage) {
            stop = Stop::Break;
            break;
        }
    }

    if stop != Stop::Overflow {
        return run;
    }

    let greedy_end = cursor.position();
    while cursor.position() > start {
        cursor.retreat(1);
        let m = measurer.measure(cursor, axis, max_cross);
        if !m.is_no_break() {
            cursor.advance(1);
            break;
        }
        // The slot before a no-break glue goes with it.
        if cursor.current_is_glue() {
            cursor.retreat(1);
        }
    }

    let new_end = cursor.position();
    if new_end == greedy_end {
        return run;
    }

    if new_end <= start {
        log::warn!(
            "no-break chain at {:?} does not fit in {}; keeping it on one overfull run",
            start,
            max_primary
        );
        cursor.seek(greedy_end);
        extend_through_no_break(cursor, measurer, axis, max_primary, max_cross, &mut run);
        return run;
    }

    log::trace!("run at {:?} rolled back from {:?} to {:?}", start, greedy_end, new_end);
    cursor.seek(start);
    let mut run = RunBox::default();
    while cursor.position() < new_end {
        let m = measurer.measure(cursor, axis, max_cross);
        run.accept(&m, cursor.current_is_absolute(), max_primary);
        cursor.advance(1);
    }
    run
}

/// Accept slots past an overflow until the no-break chain ending the run is
/// closed, so glued slots stay together even when they cannot fit.
fn extend_through_no_break<H>(
    cursor: &mut Cursor<'_>,
    measurer: &mut Measurer<'_, H>,
    axis: Axis,
    max_primary: i32,
    max_cross: i32,
    run: &mut RunBox,
) where
    H: LayoutHost + ?Sized,
{
    let mut bound = true;
    while cursor.has_more() {
        let m = measurer.measure(cursor, axis, max_cross);
        if !bound && !m.is_no_break() {
            break;
        }
        run.accept(&m, cursor.current_is_absolute(), max_primary);
        cursor.advance(1);
        if matches!(m.class, Classification::EndLine | Classification::EndPage) {
            break;
        }
        bound = m.is_no_break();
    }
}
