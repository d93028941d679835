//! Scrollable, keyboard-navigable selection list.

use super::{Key, PageResult, ScreenIo};
use crate::errors::Result;

/// Cursor and viewport bookkeeping for a selection list.
///
/// Invariants after [`ListState::scroll_to_cursor`]: the cursor row is
/// always inside the viewport, and the viewport never scrolls past the end
/// of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListState {
    cursor: usize,
    offset: usize,
    len: usize,
    height: usize,
}

impl ListState {
    pub fn new(len: usize, height: usize, default_cursor: usize) -> ListState {
        let cursor = if len == 0 { 0 } else { default_cursor.min(len - 1) };
        ListState {
            cursor,
            offset: 0,
            len,
            height: height.max(1),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Apply a navigation key. Select/Cancel are decided by the caller;
    /// anything else leaves the cursor where it is.
    pub fn apply(&mut self, key: Key) {
        if self.len == 0 {
            return;
        }
        let last = self.len - 1;
        self.cursor = match key {
            Key::Up => self.cursor.saturating_sub(1),
            Key::Down => (self.cursor + 1).min(last),
            Key::PageUp => self.cursor.saturating_sub(self.height),
            Key::PageDown => (self.cursor + self.height).min(last),
            Key::Home => 0,
            Key::End => last,
            _ => self.cursor,
        };
    }

    /// Soft-margin scroll policy: keep one row of context above and below
    /// the cursor except at the ends of the list.
    pub fn scroll_to_cursor(&mut self) {
        let (c, h, n) = (self.cursor, self.height, self.len);
        if h == 1 {
            self.offset = c;
        } else if c < self.offset + 1 {
            self.offset = c.saturating_sub(1);
        } else if c + 2 > self.offset + h {
            // Only reachable when c >= h - 1, so n >= h here.
            self.offset = (n - h).min(c + 2 - h);
        }
    }
}

/// A fixed viewport onto a possibly-taller list of single-line items.
pub struct SelectionList<'a> {
    items: &'a [String],
    origin: (u16, u16),
    height: u16,
    width: u16,
}

impl<'a> SelectionList<'a> {
    pub fn new(items: &'a [String], origin: (u16, u16), height: u16, width: u16) -> Self {
        SelectionList {
            items,
            origin,
            height,
            width,
        }
    }

    /// Block on keys until the operator selects an item or cancels.
    pub fn run(&self, screen: &mut dyn ScreenIo, default_cursor: usize) -> Result<PageResult> {
        let (row0, col0) = self.origin;

        if self.items.is_empty() {
            screen.print(row0, col0, " (no items) ")?;
            screen.flush()?;
            loop {
                if screen.read_key()? == Key::Cancel {
                    return Ok(PageResult::Cancelled);
                }
            }
        }

        let mut state = ListState::new(self.items.len(), self.height as usize, default_cursor);
        loop {
            state.scroll_to_cursor();
            self.render(screen, &state)?;
            match screen.read_key()? {
                Key::Select => return Ok(PageResult::Selected(state.cursor())),
                Key::Cancel => return Ok(PageResult::Cancelled),
                key => state.apply(key),
            }
        }
    }

    /// Redraw only the viewport rows; header and title are untouched.
    fn render(&self, screen: &mut dyn ScreenIo, state: &ListState) -> Result<()> {
        let (row0, col0) = self.origin;
        let label_width = self.width.saturating_sub(2) as usize;
        let end = self.items.len().min(state.offset() + self.height as usize);
        for (slot, index) in (state.offset()..end).enumerate() {
            let line = format!(" {:<w$.w$} ", self.items[index], w = label_width);
            let row = row0 + slot as u16;
            if index == state.cursor() {
                screen.print_emphasized(row, col0, &line)?;
            } else {
                screen.print(row, col0, &line)?;
            }
        }
        screen.flush()
    }
}
