//! Terminal: the thread-safe shell around [`Screen`] and [`Parser`].
//!
//! One coarse mutex protects all mutable state. Every public operation holds
//! the lock for its full duration, so a `feed` (decode + apply of a whole
//! chunk) is atomic with respect to observers, and concurrent producers are
//! serialized in arrival order.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cell::Cell;
use crate::cursor::Cursor;
use crate::parser::{Command, Parser};
use crate::screen::{ProcessError, Screen};

#[derive(Debug)]
struct Inner {
    screen: Screen,
    parser: Parser,
}

/// A programmable virtual terminal.
///
/// Feed it the raw output of a subprocess that believes it is talking to a
/// real terminal, then inspect the resulting screen. All methods take
/// `&self`; the terminal is `Send + Sync` and can be shared across producer
/// and observer threads.
#[derive(Debug)]
pub struct Terminal {
    inner: Mutex<Inner>,
}

impl Terminal {
    /// Create a new blank terminal.
    ///
    /// # Panics
    ///
    /// Panics when either dimension is zero.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                screen: Screen::new(rows, cols),
                parser: Parser::new(),
            }),
        }
    }

    /// Interpreter state is consistent after every applied command, so a
    /// panic in an observer does not invalidate it; ignore poisoning.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Grow the width on demand so prints never wrap. Set before feeding.
    pub fn set_auto_resize_x(&self, enabled: bool) {
        self.lock().screen.set_auto_resize_x(enabled);
    }

    /// Grow the height on demand instead of scrolling. Set before feeding.
    pub fn set_auto_resize_y(&self, enabled: bool) {
        self.lock().screen.set_auto_resize_y(enabled);
    }

    /// Decode and apply a chunk of terminal output.
    ///
    /// The whole chunk is consumed: partial escape sequences are carried
    /// over to the next call, recoverable errors are logged and skipped,
    /// and the reported count is always `bytes.len()`.
    pub fn feed(&self, bytes: &[u8]) -> usize {
        let mut inner = self.lock();
        let Inner { screen, parser } = &mut *inner;
        for &b in bytes {
            if let Some(command) = parser.advance(b) {
                if let Err(err) = screen.apply(command) {
                    tracing::debug!(%err, "skipping unsupported terminal command");
                }
            }
        }
        bytes.len()
    }

    /// Apply a single pre-decoded command.
    pub fn process(&self, command: Command) -> Result<(), ProcessError> {
        self.lock().screen.apply(command)
    }

    /// Change the grid dimensions (each clamped to a minimum of 1).
    pub fn resize(&self, rows: usize, cols: usize) {
        self.lock().screen.resize(rows, cols);
    }

    /// `(rows, cols)` of the grid.
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        let inner = self.lock();
        (inner.screen.rows(), inner.screen.cols())
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.lock().screen.rows()
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.lock().screen.cols()
    }

    /// One past the highest row ever printed to.
    #[must_use]
    pub fn used_height(&self) -> usize {
        self.lock().screen.used_height()
    }

    /// Current cursor state (position and pen format).
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.lock().screen.cursor()
    }

    /// Remember the cursor (also available as CSI `s`).
    pub fn save_cursor(&self) {
        self.lock().screen.save_cursor();
    }

    /// Restore the cursor from the last save (also available as CSI `u`).
    pub fn restore_cursor(&self) {
        self.lock().screen.restore_cursor();
    }

    /// Snapshot of the cell at `(row, col)`; `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.lock().screen.grid().cell(row, col).copied()
    }

    /// The characters of one row, full width.
    #[must_use]
    pub fn row_text(&self, row: usize) -> Option<String> {
        self.lock().screen.row_text(row)
    }

    /// The whole grid as text, rows joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lock().screen.text()
    }

    /// The grid rendered as an HTML `<pre>` fragment.
    #[must_use]
    pub fn html(&self) -> String {
        self.lock().screen.to_html()
    }

    /// Count of unsupported sequences that were skipped so far.
    #[must_use]
    pub fn unsupported_sequences(&self) -> u64 {
        self.lock().screen.unsupported_sequences()
    }

    /// Run a closure against the locked screen for ad-hoc inspection that
    /// needs a consistent multi-part view.
    pub fn with_screen<R>(&self, f: impl FnOnce(&Screen) -> R) -> R {
        f(&self.lock().screen)
    }
}

impl io::Write for &Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.feed(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for Terminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.feed(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
