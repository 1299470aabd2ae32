//! Screen: the command interpreter.
//!
//! [`Screen`] owns the grid, cursor, saved cursor, and the used-height
//! watermark, and applies decoded [`Command`]s to them. It is pure
//! single-threaded state with no I/O; the [`Terminal`](crate::Terminal)
//! shell adds locking on top.

use thiserror::Error;

use crate::cursor::Cursor;
use crate::grid::Grid;
use crate::parser::{Command, Control, CsiParams};

/// A recoverable failure while applying one command.
///
/// The screen is never left partially mutated: a command either applies
/// fully or is skipped. Callers on the byte-feeding path log these and
/// continue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// A syntactically valid CSI sequence with no semantic handler.
    #[error("unsupported CSI sequence with final byte 0x{final_byte:02x}")]
    UnsupportedCsi { final_byte: u8 },
    /// A raw escape sequence the decoder did not understand.
    #[error("unsupported escape sequence {bytes:02x?}")]
    UnsupportedSequence { bytes: Vec<u8> },
    /// A parameter outside the range an opcode accepts (e.g. erase mode 3).
    #[error("parameter {value} out of range for CSI 0x{final_byte:02x}")]
    InvalidParameter { final_byte: u8, value: u16 },
}

/// Terminal screen state: grid, cursor, saved cursor, watermark.
#[derive(Debug, Clone)]
pub struct Screen {
    grid: Grid,
    cursor: Cursor,
    saved_cursor: Cursor,
    /// One past the highest row a printable character has ever been placed
    /// on. Starts at 0; shrinking resizes clamp it.
    used_rows: usize,
    auto_resize_x: bool,
    auto_resize_y: bool,
    unsupported_seqs: u64,
}

impl Screen {
    /// Create a new blank screen.
    ///
    /// # Panics
    ///
    /// Panics when either dimension is zero.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(
            rows > 0 && cols > 0,
            "terminal dimensions must be positive, got {rows}x{cols}"
        );
        Self {
            grid: Grid::new(rows, cols),
            cursor: Cursor::new(),
            saved_cursor: Cursor::new(),
            used_rows: 0,
            auto_resize_x: false,
            auto_resize_y: false,
            unsupported_seqs: 0,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// The cell grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current cursor state.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// One past the highest row ever printed to; hosts use it to crop the
    /// interesting region of a tall virtual screen.
    #[must_use]
    pub fn used_height(&self) -> usize {
        self.used_rows
    }

    /// Count of unsupported sequences that were skipped.
    #[must_use]
    pub fn unsupported_sequences(&self) -> u64 {
        self.unsupported_seqs
    }

    /// Grow the grid width on demand so prints never wrap.
    pub fn set_auto_resize_x(&mut self, enabled: bool) {
        self.auto_resize_x = enabled;
    }

    /// Grow the grid height on demand instead of scrolling.
    pub fn set_auto_resize_y(&mut self, enabled: bool) {
        self.auto_resize_y = enabled;
    }

    /// The characters of one row, full width.
    #[must_use]
    pub fn row_text(&self, row: usize) -> Option<String> {
        self.grid.row_text(row)
    }

    /// The whole grid as text, rows joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.rows() * (self.cols() + 1));
        for row in 0..self.rows() {
            if row > 0 {
                out.push('\n');
            }
            if let Some(text) = self.grid.row_text(row) {
                out.push_str(&text);
            }
        }
        out
    }

    /// Remember the cursor (position and pen format).
    pub fn save_cursor(&mut self) {
        self.saved_cursor = self.cursor;
    }

    /// Restore the cursor from the last save.
    pub fn restore_cursor(&mut self) {
        self.cursor = self.saved_cursor;
    }

    /// Change the grid dimensions (clamped to a minimum of 1 each).
    ///
    /// Content in the overlapping region is preserved. The used-height
    /// watermark and the cursor column are clamped; the cursor row is
    /// deliberately left alone — the next print reconciles it.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.grid.resize(rows, cols);
        self.used_rows = self.used_rows.min(self.grid.rows());
        if self.cursor.col >= self.grid.cols() {
            self.cursor.col = self.grid.cols() - 1;
        }
    }

    /// Apply one decoded command.
    ///
    /// Unsupported commands count, mutate nothing, and report an error the
    /// caller may log.
    pub fn apply(&mut self, command: Command) -> Result<(), ProcessError> {
        match command {
            Command::Print(ch) => {
                self.put_char(ch);
                Ok(())
            }
            Command::Control(control) => {
                self.apply_control(control);
                Ok(())
            }
            Command::Csi { params, final_byte } => self.apply_csi(final_byte, &params),
            Command::Escape(bytes) => {
                self.unsupported_seqs += 1;
                Err(ProcessError::UnsupportedSequence { bytes })
            }
        }
    }

    fn apply_control(&mut self, control: Control) {
        match control {
            Control::Backspace => self.cursor.backspace(self.grid.cols()),
            Control::Tab => self.cursor.col = self.cursor.next_tab_stop(self.grid.cols()),
            Control::LineFeed => {
                // Scrolling or growth stays lazy until the next print.
                self.cursor.move_down(1);
                self.cursor.carriage_return();
            }
            Control::CarriageReturn => self.cursor.carriage_return(),
        }
    }

    fn apply_csi(&mut self, final_byte: u8, params: &CsiParams) -> Result<(), ProcessError> {
        match final_byte {
            b'A' => self.cursor.move_up(count_or_one(params)),
            b'B' => self.cursor.move_down(count_or_one(params)),
            b'C' => self.cursor_right(count_or_one(params)),
            b'D' => self.cursor.move_left(count_or_one(params)),
            b'H' | b'f' => {
                let row = one_based(params, 0);
                let col = one_based(params, 1);
                self.cursor.row = row - 1;
                self.cursor.col = col - 1;
                self.clamp_col();
            }
            b'J' => self.erase_in_display(erase_mode(params, final_byte)?),
            b'K' => self.erase_in_line(erase_mode(params, final_byte)?),
            b'm' => self.apply_sgr(params),
            b's' => self.save_cursor(),
            b'u' => self.restore_cursor(),
            _ => {
                self.unsupported_seqs += 1;
                return Err(ProcessError::UnsupportedCsi { final_byte });
            }
        }
        Ok(())
    }

    fn apply_sgr(&mut self, params: &CsiParams) {
        if params.is_empty() {
            self.cursor.format.apply(0);
            return;
        }
        for param in params {
            // An omitted slot behaves as 0.
            let code = param.unwrap_or(0);
            if !self.cursor.format.apply(code) {
                tracing::debug!(code, "ignoring unknown SGR parameter");
            }
        }
    }

    /// CUF: move right, stopping at the last column unless the grid grows
    /// on demand.
    fn cursor_right(&mut self, n: usize) {
        self.cursor.col = self.cursor.col.saturating_add(n);
        self.clamp_col();
    }

    fn clamp_col(&mut self) {
        if !self.auto_resize_x && self.cursor.col >= self.grid.cols() {
            self.cursor.col = self.grid.cols() - 1;
        }
    }

    /// ED: erase in display. The whole cursor line is included in both
    /// directions.
    fn erase_in_display(&mut self, mode: u16) {
        let row = self.cursor.row;
        let last_row = self.grid.rows() - 1;
        let last_col = self.grid.cols() - 1;
        match mode {
            0 => self.grid.erase_region(row, 0, last_row, last_col),
            1 => self.grid.erase_region(0, 0, row, last_col),
            _ => self.grid.erase_region(0, 0, last_row, last_col),
        }
    }

    /// EL: erase in line.
    fn erase_in_line(&mut self, mode: u16) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let last_col = self.grid.cols() - 1;
        match mode {
            0 => self.grid.erase_region(row, col, row, last_col),
            1 => self.grid.erase_region(row, 0, row, col),
            _ => self.grid.erase_region(row, 0, row, last_col),
        }
    }

    /// Write one scalar at the cursor with the cursor's pen, then advance.
    fn put_char(&mut self, ch: char) {
        self.reconcile_row();
        self.grow_col_if_needed();
        // Raised only after scroll/growth so the watermark can never pass
        // the row count.
        self.used_rows = self.used_rows.max(self.cursor.row + 1);
        if let Some(cell) = self.grid.cell_mut(self.cursor.row, self.cursor.col) {
            cell.ch = ch;
            cell.format = self.cursor.format;
        }
        self.advance();
    }

    /// Bring a below-bottom cursor row back into the grid: grow when
    /// vertical auto-resize is on, otherwise scroll one row.
    fn reconcile_row(&mut self) {
        if self.cursor.row >= self.grid.rows() {
            if self.auto_resize_y {
                let cols = self.grid.cols();
                self.grid.resize(self.cursor.row + 1, cols);
            } else {
                self.grid.scroll_up_one();
                self.cursor.row = self.grid.rows() - 1;
            }
        }
    }

    fn grow_col_if_needed(&mut self) {
        if self.auto_resize_x && self.cursor.col + 1 >= self.grid.cols() {
            let rows = self.grid.rows();
            self.grid.resize(rows, self.cursor.col + 1);
        }
    }

    /// Advance the cursor one column, wrapping to the next line when the
    /// grid does not grow on demand. The wrap itself never scrolls; the
    /// next print handles it.
    fn advance(&mut self) {
        self.cursor.col += 1;
        if self.cursor.col >= self.grid.cols() && !self.auto_resize_x {
            self.cursor.col = 0;
            self.cursor.row += 1;
        }
    }
}

/// Cursor-motion parameter: 1 when absent or zero.
fn count_or_one(params: &CsiParams) -> usize {
    params
        .first()
        .copied()
        .flatten()
        .map_or(1, |v| v.max(1) as usize)
}

/// CUP coordinate at `idx`: 1-based, with absent or zero meaning 1.
fn one_based(params: &CsiParams, idx: usize) -> usize {
    params
        .get(idx)
        .copied()
        .flatten()
        .map_or(1, |v| v.max(1) as usize)
}

/// ED/EL mode: 0 when absent; values above 2 are rejected.
fn erase_mode(params: &CsiParams, final_byte: u8) -> Result<u16, ProcessError> {
    let mode = params.first().copied().flatten().unwrap_or(0);
    if mode > 2 {
        return Err(ProcessError::InvalidParameter {
            final_byte,
            value: mode,
        });
    }
    Ok(mode)
}
