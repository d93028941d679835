//! Full-screen page: title bar, wrapped header text, selection list.

use super::{text, ScreenIo, SelectionList};
use crate::errors::Result;

/// The only outcome a page can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageResult {
    Selected(usize),
    Cancelled,
}

pub struct Page<'a> {
    pub title: &'a str,
    pub text: &'a [String],
    pub items: &'a [String],
    pub default_cursor: usize,
}

impl Page<'_> {
    /// Draw the static parts once, then hand control to the selection
    /// list until it yields a result. Only the list viewport is redrawn
    /// on navigation.
    pub fn show(&self, screen: &mut dyn ScreenIo) -> Result<PageResult> {
        let (rows, cols) = screen.size();
        screen.clear()?;
        self.draw_title_bar(screen, cols)?;

        let lines = text::wrap(self.text, cols.saturating_sub(2) as usize);
        for (i, line) in lines.iter().enumerate() {
            screen.print(2 + i as u16, 1, line)?;
        }

        let top = lines.len() as u16 + 3;
        let height = rows.saturating_sub(top).max(1);
        SelectionList::new(self.items, (top, 1), height, cols.saturating_sub(2))
            .run(screen, self.default_cursor)
    }

    fn draw_title_bar(&self, screen: &mut dyn ScreenIo, cols: u16) -> Result<()> {
        let inner = cols.saturating_sub(2) as usize;
        let title: String = self.title.chars().take(inner).collect();
        let bar = format!(" {:^w$} ", title, w = inner);
        screen.print_emphasized(0, 0, &bar)
    }
}
