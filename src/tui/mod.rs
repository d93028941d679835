//! Keyboard-driven terminal navigator.
//!
//! The wizard renders one full-screen page at a time: a title bar, a block
//! of wrapped header text, and a scrollable selection list that blocks on
//! key input. Everything draws through the [`ScreenIo`] trait so the whole
//! flow can be exercised in tests with a scripted fake screen.

mod list;
mod page;
mod text;
mod wizard;

pub use list::{ListState, SelectionList};
pub use page::{Page, PageResult};
pub use text::wrap;
pub use wizard::{rollback_commands, Wizard, WizardStep};

use crate::command::CommandRunner;
use crate::errors::Result;
use crate::snapshots::SystemProvider;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// The key symbols the navigator reacts to. Everything else maps to
/// `Other` and is ignored by the widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Select,
    Cancel,
    Other,
}

/// Display and input primitives the navigator draws through.
///
/// Screen dimensions are queried once at startup and assumed stable for
/// the process lifetime; there is no resize handling.
pub trait ScreenIo {
    /// (rows, cols)
    fn size(&self) -> (u16, u16);
    fn clear(&mut self) -> Result<()>;
    fn print(&mut self, row: u16, col: u16, text: &str) -> Result<()>;
    /// Like `print` but in reverse video (title bar, highlighted row).
    fn print_emphasized(&mut self, row: u16, col: u16, text: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Block until the next key press.
    fn read_key(&mut self) -> Result<Key>;
}

/// Real screen on top of crossterm raw mode.
pub struct CrosstermScreen {
    out: io::Stdout,
    rows: u16,
    cols: u16,
}

impl CrosstermScreen {
    pub fn new(out: io::Stdout) -> Result<CrosstermScreen> {
        let (cols, rows) = terminal::size()?;
        Ok(CrosstermScreen { out, rows, cols })
    }
}

impl ScreenIo for CrosstermScreen {
    fn size(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    fn print(&mut self, row: u16, col: u16, text: &str) -> Result<()> {
        queue!(self.out, cursor::MoveTo(col, row), Print(text))?;
        Ok(())
    }

    fn print_emphasized(&mut self, row: u16, col: u16, text: &str) -> Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(col, row),
            SetAttribute(Attribute::Reverse),
            Print(text),
            SetAttribute(Attribute::Reset),
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn read_key(&mut self) -> Result<Key> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                return Ok(map_key(key.code));
            }
        }
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter | KeyCode::Char(' ') => Key::Select,
        KeyCode::Esc | KeyCode::Backspace => Key::Cancel,
        _ => Key::Other,
    }
}

/// Set up the terminal, run the wizard, and restore the terminal even when
/// the wizard fails.
pub fn run(
    title: &str,
    provider: &dyn SystemProvider,
    runner: &dyn CommandRunner,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let result = CrosstermScreen::new(stdout)
        .and_then(|mut screen| Wizard::new(&mut screen, provider, runner, title).run());

    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}
