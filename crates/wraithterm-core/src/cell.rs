//! Terminal cell: the fundamental unit of the grid.
//!
//! Each cell stores one Unicode scalar and the [`Format`] it was written
//! with. The format model is deliberately small: the classic 16-color
//! palette plus a default sentinel, a tri-state intensity, and a bitflag
//! set for the remaining boolean attributes.

use bitflags::bitflags;

bitflags! {
    /// Boolean text attribute flags.
    ///
    /// Maps directly to the ECMA-48 / VT100 SGR parameter values that toggle
    /// a single property on or off.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const ITALIC   = 1 << 0;
        const UNDERLINE = 1 << 1;
        const BLINK    = 1 << 2;
        const REVERSE  = 1 << 3;
        const CONCEAL  = 1 << 4;
        const CROSSOUT = 1 << 5;
        const OVERLINE = 1 << 6;
    }
}

/// Color of a cell's foreground or background.
///
/// The engine stores colors abstractly; mapping palette indices to RGB is a
/// renderer concern. Bright colors (SGR 90-97 / 100-107) are the distinct
/// palette entries 8-15, not bold-modulated variants of 0-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Terminal default (SGR 39 / SGR 49).
    #[default]
    Default,
    /// Named palette index (0-15): standard 8 + bright 8.
    Named(u8),
}

/// Text intensity (SGR 1 / 2 / 22).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Intensity {
    #[default]
    Normal,
    Bold,
    Faint,
}

/// Display format of one cell, or of the cursor's pen.
///
/// Equality is structural; `Format::default()` is the all-default value that
/// erased cells carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Format {
    /// Sticky marker: the most recent SGR run touching this format began
    /// with a reset (SGR 0). Observable state, not re-applied.
    pub reset: bool,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text intensity.
    pub intensity: Intensity,
    /// Boolean attributes.
    pub flags: StyleFlags,
}

impl Format {
    /// Apply a single SGR parameter to this format.
    ///
    /// Returns `false` for parameters this engine does not understand; the
    /// format is left unchanged in that case and the caller decides whether
    /// to log.
    pub fn apply(&mut self, code: u16) -> bool {
        match code {
            0 => {
                *self = Format {
                    reset: true,
                    ..Format::default()
                };
            }
            1 => self.intensity = Intensity::Bold,
            2 => self.intensity = Intensity::Faint,
            3 => self.flags.insert(StyleFlags::ITALIC),
            4 => self.flags.insert(StyleFlags::UNDERLINE),
            // Slow and rapid blink collapse to one attribute.
            5 | 6 => self.flags.insert(StyleFlags::BLINK),
            7 => self.flags.insert(StyleFlags::REVERSE),
            8 => self.flags.insert(StyleFlags::CONCEAL),
            9 => self.flags.insert(StyleFlags::CROSSOUT),
            22 => self.intensity = Intensity::Normal,
            23 => self.flags.remove(StyleFlags::ITALIC),
            24 => self.flags.remove(StyleFlags::UNDERLINE),
            25 => self.flags.remove(StyleFlags::BLINK),
            27 => self.flags.remove(StyleFlags::REVERSE),
            28 => self.flags.remove(StyleFlags::CONCEAL),
            29 => self.flags.remove(StyleFlags::CROSSOUT),
            30..=37 => self.fg = Color::Named((code - 30) as u8),
            39 => self.fg = Color::Default,
            40..=47 => self.bg = Color::Named((code - 40) as u8),
            49 => self.bg = Color::Default,
            53 => self.flags.insert(StyleFlags::OVERLINE),
            55 => self.flags.remove(StyleFlags::OVERLINE),
            90..=97 => self.fg = Color::Named((code - 90 + 8) as u8),
            100..=107 => self.bg = Color::Named((code - 100 + 8) as u8),
            _ => return false,
        }
        true
    }
}

/// A single cell in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The character content. A space for empty/erased cells.
    pub ch: char,
    /// The format the content was written with.
    pub format: Format,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            format: Format::default(),
        }
    }
}

impl Cell {
    /// Create a new cell with the given character and default format.
    #[must_use]
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            format: Format::default(),
        }
    }

    /// Reset this cell to a blank space with default format.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether this cell is a blank space with default format.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}
