//! The layout driver.
//!
//! A pass walks a window's root layout top-down. Each level's items are cut
//! into runs by the box solver inside the level's content rectangle, and each
//! run is placed: leftover space goes to fill items, the rest is aligned, and
//! every item is handed to the host at its final rectangle. Windows and
//! sub-layouts met along the way are laid out recursively.

use alice_core::{Axis, ConfigError, IVec2, LayoutItem, LayoutLevel, LayoutMode, Rect, Size};

use crate::cache::ResolutionCache;
use crate::cursor::Cursor;
use crate::host::{LayoutHost, WindowIndex, WindowLayouts};
use crate::measure::{Measurement, Measurer};
use crate::options::{FillPolicy, LayoutOptions};
use crate::place::{cross_offset, LinePlan};
use crate::solver::{solve_run, RunBox};
use crate::tree::{LayoutNodeId, LayoutTree, NodeKind};

/// Lays out windows and layout levels against a host.
///
/// The engine keeps the name resolution cache between passes, so repeated
/// passes over an unchanged host resolve every name without scanning.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
    cache: ResolutionCache,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            cache: ResolutionCache::new(),
        }
    }

    /// Like [`LayoutEngine::new`], rejecting options a pass cannot use.
    pub fn try_new(options: LayoutOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Forget every resolved name, e.g. after a project is reloaded.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Draw `window` with its top-left corner at `origin`, then its layout.
    pub fn render_window<H, L>(&mut self, host: &mut H, layouts: &L, window: WindowIndex, origin: IVec2) -> LayoutTree
    where
        H: LayoutHost + ?Sized,
        L: WindowLayouts + ?Sized,
    {
        let mut pass = Pass::new(host, layouts, &mut self.cache, &self.options);
        if window >= pass.host.window_count() {
            log::warn!("cannot render window {}: host has {} windows", window, pass.host.window_count());
            return pass.tree;
        }

        let rect = Rect::from_origin(origin, pass.host.window_size(window));
        pass.window(None, window, rect, 0, 1);
        pass.tree
    }

    /// Lay out one level inside `rect`. Controls are looked up in `owner`.
    pub fn layout_level<H, L>(
        &mut self,
        host: &mut H,
        layouts: &L,
        owner: WindowIndex,
        level: &LayoutLevel,
        rect: Rect,
    ) -> LayoutTree
    where
        H: LayoutHost + ?Sized,
        L: WindowLayouts + ?Sized,
    {
        let mut pass = Pass::new(host, layouts, &mut self.cache, &self.options);
        pass.level(None, owner, level, rect, 1, 1);
        pass.tree
    }
}

/// State of one pass.
struct Pass<'a, H: ?Sized, L: ?Sized> {
    host: &'a mut H,
    layouts: &'a L,
    cache: &'a mut ResolutionCache,
    options: &'a LayoutOptions,
    tree: LayoutTree,
}

/// A level being laid out.
struct Frame<'l> {
    owner: WindowIndex,
    level: &'l LayoutLevel,
    /// The level's rectangle before margins; absolute items are relative to it
    region: Rect,
    content: Rect,
    layer: u32,
    depth: u32,
    node: LayoutNodeId,
}

/// Where a run goes across the flow.
struct LineFrame {
    index: usize,
    cross_start: i32,
    /// Extent items are aligned within
    cross_extent: i32,
    /// Extent offered to items that fill across the flow
    cross_limit: i32,
    /// Places every remaining slot, not only the run's
    overlapped: bool,
}

impl<'a, H, L> Pass<'a, H, L>
where
    H: LayoutHost + ?Sized,
    L: WindowLayouts + ?Sized,
{
    fn new(host: &'a mut H, layouts: &'a L, cache: &'a mut ResolutionCache, options: &'a LayoutOptions) -> Self {
        Self {
            host,
            layouts,
            cache,
            options,
            tree: LayoutTree::new(),
        }
    }

    fn too_deep(&self, depth: u32, owner: WindowIndex) -> bool {
        if depth <= self.options.max_depth {
            return false;
        }
        log::warn!(
            "layout nesting under window {} exceeds {} levels; skipping the rest",
            owner,
            self.options.max_depth
        );
        true
    }

    /// Draw a window frame and lay out its own root level inside `rect`.
    fn window(&mut self, parent: Option<LayoutNodeId>, window: WindowIndex, rect: Rect, layer: u32, depth: u32) {
        if self.too_deep(depth, window) {
            return;
        }

        self.host.render_window(window, rect, self.options.scale);
        let node = self.tree.add(parent, NodeKind::Window { window }, rect, layer);

        let layouts = self.layouts;
        if let Some(level) = layouts.layout_of(window) {
            self.level(Some(node), window, level, rect, 1, depth);
        }
    }

    fn level(
        &mut self,
        parent: Option<LayoutNodeId>,
        owner: WindowIndex,
        level: &LayoutLevel,
        container: Rect,
        layer: u32,
        depth: u32,
    ) {
        if self.too_deep(depth, owner) {
            return;
        }

        let region = Rect::new(
            container.x,
            container.y,
            level.size_x.unwrap_or(container.width),
            level.size_y.unwrap_or(container.height),
        );

        let template = level.template.or_else(|| self.host.window_layout_template(owner));
        if let Some(template) = template {
            self.host.render_region(template, region, layer, self.options.scale);
        }
        let node = self.tree.add(parent, NodeKind::Region { mode: level.mode, template }, region, layer);

        let mut content = region.inset(&level.margins.resolve());
        if level.paged {
            content.height = (content.height - self.options.page_reserve()).max(0);
        }

        log::debug!(
            "{:?} level of window {} in {:?}: {} slots, layer {}",
            level.mode,
            owner,
            content,
            level.slot_count(),
            layer
        );

        let frame = Frame {
            owner,
            level,
            region,
            content,
            layer,
            depth,
            node,
        };
        match level.mode {
            LayoutMode::SingleHorizontal | LayoutMode::SingleVertical => self.single_line(&frame),
            LayoutMode::OverlappedHorizontal | LayoutMode::OverlappedVertical => self.overlapped(&frame),
            LayoutMode::MultilineHorizontal | LayoutMode::MultilineVertical => self.multiline(&frame),
        }
    }

    fn solve(&mut self, cursor: &mut Cursor<'_>, owner: WindowIndex, axis: Axis, max_primary: i32, max_cross: i32) -> RunBox {
        let mut measurer = Measurer::new(&*self.host, &mut *self.cache, owner);
        solve_run(cursor, &mut measurer, axis, max_primary, max_cross)
    }

    fn measure(&mut self, cursor: &Cursor<'_>, owner: WindowIndex, axis: Axis, cross_limit: i32) -> Measurement {
        Measurer::new(&*self.host, &mut *self.cache, owner).measure(cursor, axis, cross_limit)
    }

    /// One run, the rest of the items are not shown.
    fn single_line(&mut self, frame: &Frame<'_>) {
        let axis = frame.level.mode.axis();
        let cross_extent = frame.content.extent(axis.cross());

        let mut cursor = Cursor::new(&frame.level.contents);
        let start = cursor;
        let run = self.solve(&mut cursor, frame.owner, axis, frame.content.extent(axis), cross_extent);

        let line = LineFrame {
            index: 0,
            cross_start: frame.content.start(axis.cross()),
            cross_extent,
            cross_limit: cross_extent,
            overlapped: false,
        };
        self.place_run(frame, start, &run, &line);
    }

    /// One unbounded run, pulled together to fit the content extent.
    ///
    /// The solved run sets the lead and the overlap step; slots after a break
    /// keep stepping along the same line.
    fn overlapped(&mut self, frame: &Frame<'_>) {
        let axis = frame.level.mode.axis();
        let cross_extent = frame.content.extent(axis.cross());

        let mut cursor = Cursor::new(&frame.level.contents);
        let start = cursor;
        let run = self.solve(&mut cursor, frame.owner, axis, i32::MAX, cross_extent);

        let line = LineFrame {
            index: 0,
            cross_start: frame.content.start(axis.cross()),
            cross_extent,
            cross_limit: cross_extent,
            overlapped: true,
        };
        self.place_run(frame, start, &run, &line);
    }

    /// Runs stacked across the flow until the content or the page is full.
    fn multiline(&mut self, frame: &Frame<'_>) {
        let axis = frame.level.mode.axis();
        let cross_axis = axis.cross();
        let extent = frame.content.extent(axis);
        let cross_total = frame.content.extent(cross_axis);

        let mut remaining = cross_total;
        let mut cursor = Cursor::new(&frame.level.contents);
        let mut index = 0;
        while cursor.has_more() {
            let start = cursor;
            let run = self.solve(&mut cursor, frame.owner, axis, extent, remaining);
            if cursor.position() == start.position() {
                log::warn!("no progress at {:?} in window {}; stopping", start.position(), frame.owner);
                break;
            }
            if run.cross > remaining && index > 0 {
                break;
            }

            let line = LineFrame {
                index,
                cross_start: frame.content.start(cross_axis) + (cross_total - remaining),
                cross_extent: run.cross,
                cross_limit: remaining,
                overlapped: false,
            };
            self.place_run(frame, start, &run, &line);

            remaining -= run.cross + frame.level.interline_spacing;
            if remaining <= 0 || run.end_page {
                break;
            }
            index += 1;
        }
    }

    /// Place the `run.item_count` slots starting at `cursor`, or every slot
    /// left for an overlapped line.
    fn place_run(&mut self, frame: &Frame<'_>, mut cursor: Cursor<'_>, run: &RunBox, line: &LineFrame) {
        let level = frame.level;
        let axis = level.mode.axis();
        let extent = frame.content.extent(axis);
        let plan = LinePlan::new(run, extent, level.line_alignment, line.overlapped);

        let line_rect = Rect::from_axes(axis, frame.content.start(axis), line.cross_start, extent, line.cross_extent);
        let line_node = self.tree.add_child(
            frame.node,
            NodeKind::Line {
                index: line.index,
                item_count: run.item_count,
                end_page: run.end_page,
            },
            line_rect,
            frame.layer,
        );
        log::trace!(
            "line {} of {:?}: {:?} {:?}, {} trailing",
            line.index,
            level.mode,
            run,
            plan,
            plan.trailing_gap(run.fill_count)
        );

        let mut offset = frame.content.start(axis) + plan.lead;
        let mut placed = 0;
        while cursor.has_more() && (line.overlapped || placed < run.item_count) {
            let m = self.measure(&cursor, frame.owner, axis, line.cross_limit);
            let share = if m.is_space_consumer() { plan.per_fill } else { 0 };
            let primary = m.primary + share;
            let cross = line.cross_start + cross_offset(level.line_internal_alignment, line.cross_extent, m.cross);

            let rect = Rect::from_axes(axis, offset, cross, primary, m.cross);
            self.place_current(frame, line_node, &cursor, rect);

            offset += primary;
            if line.overlapped && !cursor.current_is_glue() && !cursor.current_is_absolute() {
                offset -= plan.overlap;
            }
            cursor.advance(1);
            placed += 1;
        }
    }

    /// Hand the slot under `cursor` to the host at `rect`.
    fn place_current(&mut self, frame: &Frame<'_>, parent: LayoutNodeId, cursor: &Cursor<'_>, rect: Rect) {
        let Some(item) = cursor.current() else {
            return;
        };
        let owner = frame.owner;
        let scale = self.options.scale;

        match item {
            LayoutItem::Control(element) => {
                let Some(control) = self.cache.resolve_control(&*self.host, owner, &element.name) else {
                    return;
                };
                let rect = match element.absolute_position {
                    Some(offset) => Rect::from_origin(frame.region.origin() + offset, self.host.control_size(owner, control)),
                    None => rect,
                };
                if self.writes_back(element.fill_x, element.fill_y, element.is_absolute()) {
                    let size = filled_size(self.host.control_size(owner, control), rect, element.fill_x, element.fill_y);
                    self.host.set_control_size(owner, control, size);
                }
                self.host.render_control(owner, control, rect, scale);
                self.tree.add_child(parent, NodeKind::Control { window: owner, control }, rect, frame.layer);
            }
            LayoutItem::Window(element) => {
                let Some(window) = self.cache.resolve_window(&*self.host, &element.name) else {
                    return;
                };
                let rect = match element.absolute_position {
                    Some(offset) => Rect::from_origin(frame.region.origin() + offset, self.host.window_size(window)),
                    None => rect,
                };
                if self.writes_back(element.fill_x, element.fill_y, element.is_absolute()) {
                    let saved = self.host.window_size(window);
                    self.host.set_window_size(window, filled_size(saved, rect, element.fill_x, element.fill_y));
                    self.window(Some(parent), window, rect, frame.layer, frame.depth + 1);
                    self.host.set_window_size(window, saved);
                } else {
                    self.window(Some(parent), window, rect, frame.layer, frame.depth + 1);
                }
            }
            LayoutItem::Generator(_) => {
                let generated = Measurer::new(&*self.host, &mut *self.cache, owner).generated_window(cursor);
                if let Some(window) = generated {
                    self.window(Some(parent), window, rect, frame.layer, frame.depth + 1);
                }
            }
            LayoutItem::SubLayout(level) => {
                self.level(Some(parent), owner, level, rect, frame.layer + 1, frame.depth + 1);
            }
            LayoutItem::Glue(_) => {}
        }
    }

    fn writes_back(&self, fill_x: bool, fill_y: bool, absolute: bool) -> bool {
        self.options.fill_policy == FillPolicy::WriteBack && (fill_x || fill_y) && !absolute
    }
}

/// `natural` with the filled axes taken from the placed rectangle.
fn filled_size(natural: Size, placed: Rect, fill_x: bool, fill_y: bool) -> Size {
    Size::new(
        if fill_x { placed.width } else { natural.width },
        if fill_y { placed.height } else { natural.height },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoLayouts;
    use crate::recording::{DrawCommand, HostWindow, RecordingHost};
    use crate::tree::MouseProbe;
    use alice_core::{ElementRef, Generator, Glue, LineAlignment, Margins, TemplateId};
    use proptest::prelude::*;

    fn control(name: &str) -> ElementRef {
        ElementRef::new(name)
    }

    fn three_squares() -> RecordingHost {
        let mut host = RecordingHost::new();
        host.add_window(
            HostWindow::new("main", Size::new(100, 50))
                .with_control("a", Size::new(10, 10))
                .with_control("b", Size::new(10, 10))
                .with_control("c", Size::new(10, 10)),
        );
        host
    }

    fn abc(mode: LayoutMode) -> LayoutLevel {
        LayoutLevel::new(mode)
            .with_control(control("a"))
            .with_control(control("b"))
            .with_control(control("c"))
    }

    fn run_level(host: &mut RecordingHost, level: &LayoutLevel, rect: Rect) -> LayoutTree {
        LayoutEngine::default().layout_level(host, &NoLayouts, 0, level, rect)
    }

    fn xs(host: &RecordingHost, names: &[&str]) -> Vec<i32> {
        names
            .iter()
            .flat_map(|name| host.control_rects(0, name))
            .map(|r| r.x)
            .collect()
    }

    #[test]
    fn test_centered_line() {
        let mut host = three_squares();
        let level = abc(LayoutMode::SingleHorizontal).with_alignment(LineAlignment::Centered, LineAlignment::Leading);
        let tree = run_level(&mut host, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(xs(&host, &["a", "b", "c"]), vec![35, 45, 55]);
        assert_eq!(host.control_rects(0, "b"), vec![Rect::new(45, 0, 10, 10)]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_leading_and_trailing_with_margins() {
        let mut host = three_squares();
        let level = abc(LayoutMode::SingleHorizontal).with_alignment(LineAlignment::Leading, LineAlignment::Leading);
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));
        assert_eq!(xs(&host, &["a", "b", "c"]), vec![0, 10, 20]);

        let mut host = three_squares();
        let level = abc(LayoutMode::SingleHorizontal)
            .with_margins(Margins::uniform(5))
            .with_alignment(LineAlignment::Trailing, LineAlignment::Trailing);
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));
        assert_eq!(xs(&host, &["a", "b", "c"]), vec![65, 75, 85]);
        assert_eq!(host.control_rects(0, "a")[0].y, 35);
    }

    #[test]
    fn test_vertical_line() {
        let mut host = three_squares();
        let level = abc(LayoutMode::SingleVertical).with_alignment(LineAlignment::Centered, LineAlignment::Centered);
        run_level(&mut host, &level, Rect::new(0, 0, 100, 100));

        let ys: Vec<i32> = ["a", "b", "c"].iter().map(|n| host.control_rects(0, n)[0].y).collect();
        assert_eq!(ys, vec![35, 45, 55]);
        assert_eq!(host.control_rects(0, "a")[0].x, 45);
    }

    #[test]
    fn test_fill_takes_leftover() {
        let mut host = three_squares();
        let level = LayoutLevel::new(LayoutMode::SingleHorizontal)
            .with_control(control("a"))
            .with_control(control("b").fill_x())
            .with_control(control("c").fill_y());
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(0, 0, 10, 10)]);
        assert_eq!(host.control_rects(0, "b"), vec![Rect::new(10, 0, 80, 10)]);
        assert_eq!(host.control_rects(0, "c"), vec![Rect::new(90, 0, 10, 50)]);
        // Sizes on the host are left alone.
        assert_eq!(host.windows[0].controls[1].size, Size::new(10, 10));
    }

    #[test]
    fn test_fill_write_back() {
        let mut host = three_squares();
        host.add_window(HostWindow::new("panel", Size::new(20, 20)));
        let level = LayoutLevel::new(LayoutMode::SingleHorizontal)
            .with_control(control("a").fill_x())
            .with_window(ElementRef::new("panel").fill_y());

        let options = LayoutOptions::default().with_fill_policy(FillPolicy::WriteBack);
        LayoutEngine::new(options).layout_level(&mut host, &NoLayouts, 0, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(0, 0, 80, 10)]);
        assert_eq!(host.window_rects("panel"), vec![Rect::new(80, 0, 20, 50)]);
        // Controls keep their filled size, windows get theirs back.
        assert_eq!(host.windows[0].controls[0].size, Size::new(80, 10));
        assert_eq!(host.windows[1].size, Size::new(20, 20));
    }

    #[test]
    fn test_multiline_wraps() {
        let mut host = RecordingHost::new();
        host.add_window(
            HostWindow::new("main", Size::new(100, 100))
                .with_control("a", Size::new(40, 10))
                .with_control("b", Size::new(40, 20))
                .with_control("c", Size::new(40, 15)),
        );
        let level = abc(LayoutMode::MultilineHorizontal).with_interline_spacing(5);
        let tree = run_level(&mut host, &level, Rect::new(0, 0, 100, 100));

        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(0, 0, 40, 10)]);
        assert_eq!(host.control_rects(0, "b"), vec![Rect::new(40, 0, 40, 20)]);
        assert_eq!(host.control_rects(0, "c"), vec![Rect::new(0, 25, 40, 15)]);

        let region = tree.roots()[0];
        let lines: Vec<Rect> = tree.lines(region).map(|n| n.bounds).collect();
        assert_eq!(lines, vec![Rect::new(0, 0, 100, 20), Rect::new(0, 25, 100, 15)]);
    }

    #[test]
    fn test_multiline_cross_alignment_within_line() {
        let mut host = RecordingHost::new();
        host.add_window(
            HostWindow::new("main", Size::new(100, 100))
                .with_control("a", Size::new(40, 10))
                .with_control("b", Size::new(40, 20))
                .with_control("c", Size::new(40, 15)),
        );
        let level = abc(LayoutMode::MultilineHorizontal).with_alignment(LineAlignment::Leading, LineAlignment::Trailing);
        run_level(&mut host, &level, Rect::new(0, 0, 100, 100));

        assert_eq!(host.control_rects(0, "a")[0].y, 10);
        assert_eq!(host.control_rects(0, "b")[0].y, 0);
        assert_eq!(host.control_rects(0, "c")[0].y, 20);
    }

    #[test]
    fn test_multiline_vertical_columns() {
        let mut host = RecordingHost::new();
        host.add_window(
            HostWindow::new("main", Size::new(100, 100))
                .with_control("a", Size::new(10, 40))
                .with_control("b", Size::new(20, 40))
                .with_control("c", Size::new(15, 40)),
        );
        let level = abc(LayoutMode::MultilineVertical).with_interline_spacing(3);
        run_level(&mut host, &level, Rect::new(0, 0, 100, 100));

        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(0, 0, 10, 40)]);
        assert_eq!(host.control_rects(0, "b"), vec![Rect::new(0, 40, 20, 40)]);
        assert_eq!(host.control_rects(0, "c"), vec![Rect::new(23, 0, 15, 40)]);
    }

    #[test]
    fn test_multiline_stops_when_full() {
        let mut host = RecordingHost::new();
        host.add_window(HostWindow::new("main", Size::new(100, 40)).with_control("t", Size::new(60, 10)));
        let level = LayoutLevel::new(LayoutMode::MultilineHorizontal)
            .with_control(control("t"))
            .with_control(control("t"))
            .with_control(control("t"))
            .with_control(control("t"))
            .with_control(control("t"));

        let tree = run_level(&mut host, &level, Rect::new(0, 0, 100, 40));
        assert_eq!(tree.lines(tree.roots()[0]).count(), 4);
        assert_eq!(host.control_rects(0, "t").len(), 4);

        let mut host = RecordingHost::new();
        host.add_window(HostWindow::new("main", Size::new(100, 40)).with_control("t", Size::new(60, 10)));
        let tree = run_level(&mut host, &level.clone().paged(true), Rect::new(0, 0, 100, 40));
        assert_eq!(tree.lines(tree.roots()[0]).count(), 2);
    }

    #[test]
    fn test_page_break_ends_layout() {
        let mut host = three_squares();
        let level = LayoutLevel::new(LayoutMode::MultilineHorizontal)
            .with_control(control("a"))
            .with_item(Glue::page_break())
            .with_control(control("b"));
        let tree = run_level(&mut host, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(host.control_rects(0, "a").len(), 1);
        assert!(host.control_rects(0, "b").is_empty());
        let line = tree.lines(tree.roots()[0]).next().map(|n| n.kind);
        assert_eq!(line, Some(NodeKind::Line { index: 0, item_count: 2, end_page: true }));
    }

    #[test]
    fn test_line_break() {
        let mut host = three_squares();
        let level = LayoutLevel::new(LayoutMode::MultilineHorizontal)
            .with_control(control("a"))
            .with_item(Glue::line_break())
            .with_control(control("b"));
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));
        assert_eq!(host.control_rects(0, "b"), vec![Rect::new(0, 10, 10, 10)]);
    }

    #[test]
    fn test_overlapped_compacts() {
        let mut host = RecordingHost::new();
        host.add_window(
            HostWindow::new("main", Size::new(100, 50))
                .with_control("a", Size::new(40, 10))
                .with_control("b", Size::new(40, 10))
                .with_control("c", Size::new(40, 10))
                .with_control("d", Size::new(40, 10))
                .with_control("e", Size::new(10, 10)),
        );
        let level = LayoutLevel::new(LayoutMode::OverlappedHorizontal)
            .with_control(control("a"))
            .with_control(control("b"))
            .with_control(control("e").absolute(7, 3))
            .with_control(control("c"))
            .with_control(control("d"));
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(xs(&host, &["a", "b", "c", "d"]), vec![0, 20, 40, 60]);
        assert_eq!(host.control_rects(0, "e"), vec![Rect::new(7, 3, 10, 10)]);
    }

    #[test]
    fn test_overlapped_without_overflow_aligns() {
        let mut host = three_squares();
        let level = abc(LayoutMode::OverlappedVertical).with_alignment(LineAlignment::Trailing, LineAlignment::Leading);
        run_level(&mut host, &level, Rect::new(0, 0, 50, 100));

        let ys: Vec<i32> = ["a", "b", "c"].iter().map(|n| host.control_rects(0, n)[0].y).collect();
        assert_eq!(ys, vec![70, 80, 90]);
    }

    #[test]
    fn test_overlapped_places_past_breaks() {
        let mut host = three_squares();
        let level = LayoutLevel::new(LayoutMode::OverlappedHorizontal)
            .with_control(control("a"))
            .with_item(Glue::line_break())
            .with_control(control("b"))
            .with_item(Glue::page_break())
            .with_control(control("c"));
        let tree = run_level(&mut host, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(0, 0, 10, 10)]);
        assert_eq!(host.control_rects(0, "b"), vec![Rect::new(10, 0, 10, 10)]);
        assert_eq!(host.control_rects(0, "c"), vec![Rect::new(20, 0, 10, 10)]);

        // The line still reports the run that set its spacing.
        let line = tree.lines(tree.roots()[0]).next().map(|n| n.kind);
        assert_eq!(line, Some(NodeKind::Line { index: 0, item_count: 2, end_page: false }));
    }

    #[test]
    fn test_centered_matches_leading_when_full() {
        let level = abc(LayoutMode::SingleHorizontal).with_margins(Margins::uniform(2));
        let rect = Rect::new(3, 4, 34, 50);

        let mut centered = three_squares();
        run_level(
            &mut centered,
            &level.clone().with_alignment(LineAlignment::Centered, LineAlignment::Leading),
            rect,
        );
        let mut leading = three_squares();
        run_level(
            &mut leading,
            &level.with_alignment(LineAlignment::Leading, LineAlignment::Leading),
            rect,
        );

        assert_eq!(centered.commands, leading.commands);
        assert_eq!(xs(&centered, &["a", "b", "c"]), vec![5, 15, 25]);
    }

    #[test]
    fn test_absolute_relative_to_region() {
        let mut host = three_squares();
        let level = LayoutLevel::new(LayoutMode::SingleHorizontal)
            .with_margins(Margins::uniform(4))
            .with_control(control("a").absolute(30, 20))
            .with_control(control("b"));
        run_level(&mut host, &level, Rect::new(100, 200, 100, 50));

        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(130, 220, 10, 10)]);
        assert_eq!(host.control_rects(0, "b"), vec![Rect::new(104, 204, 10, 10)]);
    }

    #[test]
    fn test_unresolved_items_are_skipped() {
        let mut host = three_squares();
        let level = LayoutLevel::new(LayoutMode::SingleHorizontal)
            .with_control(control("missing"))
            .with_window(ElementRef::new("nowhere"))
            .with_control(control("a"));
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(host.commands.len(), 1);
        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(0, 0, 10, 10)]);
    }

    #[test]
    fn test_generator_windows() {
        let mut host = three_squares();
        host.add_window(HostWindow::new("tile", Size::new(16, 16)));
        let level = LayoutLevel::new(LayoutMode::SingleHorizontal)
            .with_item(Generator::new(["tile", "tile"]))
            .with_control(control("a"));
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(
            host.window_rects("tile"),
            vec![Rect::new(0, 0, 16, 16), Rect::new(16, 0, 16, 16)]
        );
        assert_eq!(host.control_rects(0, "a"), vec![Rect::new(32, 0, 10, 10)]);
    }

    #[test]
    fn test_nested_windows_and_sub_layouts() {
        let mut host = RecordingHost::new();
        host.add_window(HostWindow::new("main", Size::new(200, 100)).with_control("x", Size::new(10, 10)));
        host.add_window(HostWindow::new("panel", Size::new(50, 40)).with_control("ok", Size::new(20, 10)));

        let sub = LayoutLevel::new(LayoutMode::SingleVertical)
            .with_size(Some(30), None)
            .with_control(control("x"));
        let layouts = vec![
            Some(
                LayoutLevel::new(LayoutMode::SingleHorizontal)
                    .with_window(ElementRef::new("panel"))
                    .with_item(sub),
            ),
            Some(LayoutLevel::new(LayoutMode::SingleVertical).with_control(control("ok"))),
        ];

        let mut engine = LayoutEngine::default();
        let tree = engine.render_window(&mut host, &layouts, 0, IVec2::new(10, 20));

        assert_eq!(
            host.commands,
            vec![
                DrawCommand::Window { window: 0, rect: Rect::new(10, 20, 200, 100), scale: 1.0 },
                DrawCommand::Window { window: 1, rect: Rect::new(10, 20, 50, 40), scale: 1.0 },
                DrawCommand::Control { window: 1, control: 0, rect: Rect::new(10, 20, 20, 10), scale: 1.0 },
                DrawCommand::Control { window: 0, control: 0, rect: Rect::new(60, 20, 10, 10), scale: 1.0 },
            ]
        );

        let sub_region = tree
            .nodes()
            .find(|n| matches!(n.kind, NodeKind::Region { .. }) && n.layer == 2)
            .map(|n| n.bounds);
        assert_eq!(sub_region, Some(Rect::new(60, 20, 30, 100)));

        assert_eq!(
            tree.probe(IVec2::new(15, 22)),
            MouseProbe { window: Some(1), control: Some((1, 0)) }
        );
        assert_eq!(tree.probe(IVec2::new(150, 90)), MouseProbe { window: Some(0), control: None });
    }

    #[test]
    fn test_templates() {
        let mut host = three_squares();
        host.windows[0].layout_template = Some(TemplateId(7));
        let level = abc(LayoutMode::SingleHorizontal).with_size(Some(60), None);
        run_level(&mut host, &level, Rect::new(5, 5, 100, 50));
        assert_eq!(
            host.commands[0],
            DrawCommand::Region { template: TemplateId(7), rect: Rect::new(5, 5, 60, 50), layer: 1, scale: 1.0 }
        );

        let mut host = three_squares();
        let level = abc(LayoutMode::SingleHorizontal).with_template(TemplateId(3));
        run_level(&mut host, &level, Rect::new(0, 0, 100, 50));
        assert!(matches!(host.commands[0], DrawCommand::Region { template: TemplateId(3), .. }));

        let mut host = three_squares();
        run_level(&mut host, &abc(LayoutMode::SingleHorizontal), Rect::new(0, 0, 100, 50));
        assert!(!host.commands.iter().any(|c| matches!(c, DrawCommand::Region { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let mut host = three_squares();
        let innermost = LayoutLevel::new(LayoutMode::SingleHorizontal).with_control(control("c"));
        let middle = LayoutLevel::new(LayoutMode::SingleHorizontal)
            .with_control(control("b"))
            .with_item(innermost);
        let level = LayoutLevel::new(LayoutMode::SingleHorizontal)
            .with_control(control("a"))
            .with_item(middle);

        let options = LayoutOptions::default().with_max_depth(2);
        LayoutEngine::new(options).layout_level(&mut host, &NoLayouts, 0, &level, Rect::new(0, 0, 100, 50));

        assert_eq!(host.control_rects(0, "a").len(), 1);
        assert_eq!(host.control_rects(0, "b").len(), 1);
        assert!(host.control_rects(0, "c").is_empty());
    }

    #[test]
    fn test_self_nesting_window_terminates() {
        let mut host = RecordingHost::new();
        host.add_window(HostWindow::new("loop", Size::new(20, 20)));
        let layouts = vec![LayoutLevel::new(LayoutMode::SingleHorizontal).with_window(ElementRef::new("loop"))];

        let mut engine = LayoutEngine::new(LayoutOptions::default().with_max_depth(4));
        engine.render_window(&mut host, &layouts, 0, IVec2::ZERO);
        assert_eq!(host.window_rects("loop").len(), 4);
    }

    #[test]
    fn test_scale_is_passed_through() {
        let mut host = three_squares();
        let mut engine = LayoutEngine::new(LayoutOptions::default().with_scale(2.0));
        engine.layout_level(&mut host, &NoLayouts, 0, &abc(LayoutMode::SingleHorizontal), Rect::new(0, 0, 100, 50));
        assert!(host
            .commands
            .iter()
            .all(|c| matches!(c, DrawCommand::Control { scale, .. } if *scale == 2.0)));
    }

    #[test]
    fn test_cache_reused_across_passes() {
        let mut host = three_squares();
        let level = abc(LayoutMode::SingleHorizontal);
        let mut engine = LayoutEngine::default();
        engine.layout_level(&mut host, &NoLayouts, 0, &level, Rect::new(0, 0, 100, 50));
        let rescans = engine.cache().stats().rescans;
        assert_eq!(rescans, 3);

        engine.layout_level(&mut host, &NoLayouts, 0, &level, Rect::new(0, 0, 100, 50));
        assert_eq!(engine.cache().stats().rescans, rescans);

        engine.clear_cache();
        engine.layout_level(&mut host, &NoLayouts, 0, &level, Rect::new(0, 0, 100, 50));
        assert_eq!(engine.cache().stats().rescans, rescans + 3);
    }

    #[test]
    fn test_try_new_rejects_invalid_options() {
        assert!(LayoutEngine::try_new(LayoutOptions::default()).is_ok());
        assert_eq!(
            LayoutEngine::try_new(LayoutOptions::default().with_max_depth(0)).err(),
            Some(ConfigError::ZeroDepth)
        );
        assert!(LayoutEngine::try_new(LayoutOptions::default().with_scale(f32::NAN)).is_err());
    }

    #[test]
    fn test_missing_window() {
        let mut host = three_squares();
        let tree = LayoutEngine::default().render_window(&mut host, &NoLayouts, 5, IVec2::ZERO);
        assert!(tree.is_empty());
        assert!(host.commands.is_empty());
    }

    fn alignment(index: u8) -> LineAlignment {
        match index {
            0 => LineAlignment::Leading,
            1 => LineAlignment::Trailing,
            _ => LineAlignment::Centered,
        }
    }

    proptest! {
        #[test]
        fn prop_placed_line_spans_content(
            items in prop::collection::vec((1i32..30, any::<bool>()), 1..6),
            spare in 0i32..120,
            margin in 0i32..6,
            align in 0u8..3,
        ) {
            let mut window = HostWindow::new("main", Size::new(200, 50));
            let mut level = LayoutLevel::new(LayoutMode::SingleHorizontal)
                .with_margins(Margins::uniform(margin))
                .with_alignment(alignment(align), LineAlignment::Leading);
            for (i, &(width, fill)) in items.iter().enumerate() {
                let name = format!("c{i}");
                window = window.with_control(name.as_str(), Size::new(width, 10));
                let element = if fill { control(&name).fill_x() } else { control(&name) };
                level = level.with_control(element);
            }
            let mut host = RecordingHost::new();
            host.add_window(window);

            let natural: i32 = items.iter().map(|&(width, _)| width).sum();
            let extent = natural + spare;
            run_level(&mut host, &level, Rect::new(0, 0, extent + 2 * margin, 50));

            let fills = items.iter().filter(|&&(_, fill)| fill).count() as i32;
            let per_fill = if fills > 0 { spare / fills } else { 0 };
            let remainder = spare - per_fill * fills;
            let lead = match alignment(align) {
                LineAlignment::Leading => 0,
                LineAlignment::Trailing => remainder,
                LineAlignment::Centered => remainder / 2,
            };

            let mut end = margin + lead;
            for (i, &(width, fill)) in items.iter().enumerate() {
                let rects = host.control_rects(0, &format!("c{i}"));
                prop_assert_eq!(rects.len(), 1);
                prop_assert_eq!(rects[0].x, end);
                prop_assert_eq!(rects[0].width, if fill { width + per_fill } else { width });
                end = rects[0].x + rects[0].width;
            }
            prop_assert_eq!(end - margin + (remainder - lead), extent);
        }
    }
}
