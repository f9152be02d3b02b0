//! Position cursor over a layout item sequence.
//!
//! Generators expand to one slot per insert; every other item is one slot.
//! The cursor is a small `Copy` value, so callers save a position simply by
//! copying the cursor and roll back by restoring the copy.

use alice_core::LayoutItem;

/// Address of a slot: the item index and, inside a generator, the insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub index: usize,
    pub sub_index: usize,
}

impl Position {
    pub const fn new(index: usize, sub_index: usize) -> Self {
        Self { index, sub_index }
    }
}

/// A bidirectional cursor over the flattened slots of an item sequence.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    items: &'a [LayoutItem],
    position: Position,
}

impl<'a> Cursor<'a> {
    /// A cursor on the first slot.
    pub fn new(items: &'a [LayoutItem]) -> Self {
        let mut cursor = Self {
            items,
            position: Position::default(),
        };
        cursor.skip_empty();
        cursor
    }

    pub fn items(&self) -> &'a [LayoutItem] {
        self.items
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Jump to a position.
    ///
    /// A sub-index past the last insert of a generator lands on that insert,
    /// and an index past the last item lands at the end.
    pub fn seek(&mut self, position: Position) {
        self.position = match self.items.get(position.index) {
            Some(item) => {
                let last = item.slot_count().saturating_sub(1);
                Position::new(position.index, position.sub_index.min(last))
            }
            None => Position::new(self.items.len(), 0),
        };
        self.skip_empty();
    }

    /// True while the cursor addresses an item.
    pub fn has_more(&self) -> bool {
        self.position.index < self.items.len()
    }

    pub fn current(&self) -> Option<&'a LayoutItem> {
        self.items.get(self.position.index)
    }

    pub fn current_is_glue(&self) -> bool {
        self.current().is_some_and(LayoutItem::is_glue)
    }

    pub fn current_is_absolute(&self) -> bool {
        self.current().is_some_and(LayoutItem::is_absolute)
    }

    /// Flattened slot number of the current position.
    pub fn ordinal(&self) -> usize {
        let before: usize = self.items[..self.position.index.min(self.items.len())]
            .iter()
            .map(LayoutItem::slot_count)
            .sum();
        before + self.position.sub_index
    }

    /// Move by `n` slots; negative values move backwards.
    pub fn move_by(&mut self, n: isize) {
        if n >= 0 {
            self.advance(n.unsigned_abs());
        } else {
            self.retreat(n.unsigned_abs());
        }
    }

    /// Move forward by `n` slots, stopping at the end of the sequence.
    pub fn advance(&mut self, mut n: usize) {
        while n > 0 && self.has_more() {
            let slots = self.items[self.position.index].slot_count();
            let left = slots - self.position.sub_index;
            if n >= left {
                n -= left;
                self.position = Position::new(self.position.index + 1, 0);
                self.skip_empty();
            } else {
                self.position.sub_index += n;
                n = 0;
            }
        }
    }

    /// Move backward by `n` slots, stopping at the first slot.
    ///
    /// Entering a generator from the right lands on its last insert; stopping
    /// inside a generator keeps the sub-index.
    pub fn retreat(&mut self, mut n: usize) {
        while n > 0 {
            if self.position.sub_index > 0 && self.has_more() {
                let step = n.min(self.position.sub_index);
                self.position.sub_index -= step;
                n -= step;
                continue;
            }

            let upper = self.position.index.min(self.items.len());
            let previous = self.items[..upper]
                .iter()
                .rposition(|item| item.slot_count() > 0);
            match previous {
                Some(index) => {
                    let last = self.items[index].slot_count() - 1;
                    self.position = Position::new(index, last);
                    n -= 1;
                }
                None => {
                    self.position = Position::default();
                    self.skip_empty();
                    return;
                }
            }
        }
    }

    /// Step over items that occupy no slots.
    fn skip_empty(&mut self) {
        while self.has_more() && self.items[self.position.index].slot_count() == 0 {
            self.position = Position::new(self.position.index + 1, 0);
        }
    }
}
