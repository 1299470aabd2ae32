//! Fixture-driven conformance tests.
//!
//! Each fixture is a byte stream fed to a fresh terminal plus declarative
//! expectations about the resulting screen. Keeping the cases as data makes
//! it cheap to grow the corpus when a subprocess exposes a new quirk.

use serde::Deserialize;
use wraithterm_core::{Color, Format, Intensity, StyleFlags, Terminal};

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    /// `[rows, cols]` of the fresh terminal.
    size: [usize; 2],
    #[serde(default)]
    auto_resize_x: bool,
    #[serde(default)]
    auto_resize_y: bool,
    input: String,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
struct Expected {
    #[serde(default)]
    cursor: Option<[usize; 2]>,
    #[serde(default)]
    size: Option<[usize; 2]>,
    #[serde(default)]
    used_height: Option<usize>,
    /// Full-grid content, one entry per row, compared right-trimmed.
    #[serde(default)]
    lines: Option<Vec<String>>,
    #[serde(default)]
    cells: Vec<CellExpectation>,
}

#[derive(Debug, Deserialize)]
struct CellExpectation {
    row: usize,
    col: usize,
    #[serde(rename = "char")]
    ch: String,
    #[serde(default)]
    reset: bool,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    faint: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underline: bool,
    #[serde(default)]
    blink: bool,
    #[serde(default)]
    fg: Option<u8>,
    #[serde(default)]
    bg: Option<u8>,
}

impl CellExpectation {
    fn format(&self) -> Format {
        let mut flags = StyleFlags::empty();
        flags.set(StyleFlags::ITALIC, self.italic);
        flags.set(StyleFlags::UNDERLINE, self.underline);
        flags.set(StyleFlags::BLINK, self.blink);
        let intensity = match (self.bold, self.faint) {
            (true, _) => Intensity::Bold,
            (_, true) => Intensity::Faint,
            _ => Intensity::Normal,
        };
        Format {
            reset: self.reset,
            fg: self.fg.map_or(Color::Default, Color::Named),
            bg: self.bg.map_or(Color::Default, Color::Named),
            intensity,
            flags,
        }
    }
}

const FIXTURES: &str = r##"[
  {
    "name": "cup_is_one_based_row_col",
    "size": [3, 3],
    "input": "abc\u001b[3;1H",
    "expected": { "cursor": [2, 0] }
  },
  {
    "name": "cursor_arithmetic_net_motion",
    "size": [3, 3],
    "input": "\u001b[2B\u001b[2C\u001b[A\u001b[1D",
    "expected": { "cursor": [1, 1] }
  },
  {
    "name": "sgr_chain_with_reset_marker",
    "size": [1, 4],
    "input": "\u001b[2ma\u001b[5;22;31mb\u001b[0mc\u001b[4;46md",
    "expected": {
      "lines": ["abcd"],
      "cells": [
        { "row": 0, "col": 0, "char": "a", "faint": true },
        { "row": 0, "col": 1, "char": "b", "blink": true, "fg": 1 },
        { "row": 0, "col": 2, "char": "c", "reset": true },
        { "row": 0, "col": 3, "char": "d", "reset": true, "underline": true, "bg": 6 }
      ]
    }
  },
  {
    "name": "empty_sgr_equals_explicit_reset",
    "size": [1, 2],
    "input": "\u001b[1;31ma\u001b[mb",
    "expected": {
      "cells": [
        { "row": 0, "col": 0, "char": "a", "bold": true, "fg": 1 },
        { "row": 0, "col": 1, "char": "b", "reset": true }
      ]
    }
  },
  {
    "name": "bright_foreground_rows",
    "size": [1, 3],
    "input": "\u001b[90ma\u001b[91mb\u001b[97mc",
    "expected": {
      "cells": [
        { "row": 0, "col": 0, "char": "a", "fg": 8 },
        { "row": 0, "col": 1, "char": "b", "fg": 9 },
        { "row": 0, "col": 2, "char": "c", "fg": 15 }
      ]
    }
  },
  {
    "name": "erase_line_forward_from_cursor",
    "size": [3, 4],
    "input": "\u001b[31mabcd\u001b[2;1Hefgh\u001b[3;1Hijkl\u001b[2;3H\u001b[K",
    "expected": {
      "lines": ["abcd", "ef", "ijkl"],
      "cells": [
        { "row": 1, "col": 1, "char": "f", "fg": 1 },
        { "row": 1, "col": 2, "char": " " },
        { "row": 1, "col": 3, "char": " " }
      ]
    }
  },
  {
    "name": "erase_display_forward_includes_cursor_line",
    "size": [3, 4],
    "input": "abcd\u001b[2;1Hefgh\u001b[3;1Hijkl\u001b[2;3H\u001b[J",
    "expected": { "lines": ["abcd", "", ""] }
  },
  {
    "name": "tab_stops_and_wrap",
    "size": [2, 12],
    "input": "AA\tb\tc\td\te\tf",
    "expected": { "lines": ["AA  b   c  d", "    e   f"] }
  },
  {
    "name": "backspace_wraps_without_erasing",
    "size": [2, 2],
    "input": "\u001b[2;1H\u0008",
    "expected": { "cursor": [0, 1], "lines": ["", ""] }
  },
  {
    "name": "line_feed_returns_to_column_zero",
    "size": [2, 5],
    "input": "ab\ncd",
    "expected": { "lines": ["ab", "cd"], "cursor": [1, 2] }
  },
  {
    "name": "auto_resize_both_axes",
    "size": [1, 1],
    "auto_resize_x": true,
    "auto_resize_y": true,
    "input": "abcde\n12345",
    "expected": {
      "size": [2, 5],
      "used_height": 2,
      "lines": ["abcde", "12345"]
    }
  },
  {
    "name": "scroll_when_printing_past_bottom",
    "size": [2, 2],
    "input": "abcde",
    "expected": { "lines": ["cd", "e"], "cursor": [1, 1], "used_height": 2 }
  },
  {
    "name": "unsupported_sequences_leave_state_alone",
    "size": [2, 4],
    "input": "hi\u001b[?1049h\u001b[8;2;3t\u001bM",
    "expected": { "lines": ["hi", ""], "cursor": [0, 2] }
  }
]"##;

#[test]
fn run_fixtures() {
    let fixtures: Vec<Fixture> = serde_json::from_str(FIXTURES).expect("fixture JSON parses");
    assert!(!fixtures.is_empty());

    for fixture in fixtures {
        let name = fixture.name.as_str();
        let term = Terminal::new(fixture.size[0], fixture.size[1]);
        term.set_auto_resize_x(fixture.auto_resize_x);
        term.set_auto_resize_y(fixture.auto_resize_y);
        term.feed(fixture.input.as_bytes());

        if let Some([row, col]) = fixture.expected.cursor {
            let cursor = term.cursor();
            assert_eq!((cursor.row, cursor.col), (row, col), "{name}: cursor");
        }
        if let Some([rows, cols]) = fixture.expected.size {
            assert_eq!(term.size(), (rows, cols), "{name}: size");
        }
        if let Some(used) = fixture.expected.used_height {
            assert_eq!(term.used_height(), used, "{name}: used height");
        }
        if let Some(lines) = &fixture.expected.lines {
            let got: Vec<String> = (0..term.rows())
                .map(|row| term.row_text(row).unwrap().trim_end().to_string())
                .collect();
            assert_eq!(&got, lines, "{name}: lines");
        }
        for cell in &fixture.expected.cells {
            let got = term
                .cell(cell.row, cell.col)
                .unwrap_or_else(|| panic!("{name}: cell ({}, {}) in bounds", cell.row, cell.col));
            assert_eq!(
                got.ch.to_string(),
                cell.ch,
                "{name}: char at ({}, {})",
                cell.row,
                cell.col
            );
            assert_eq!(
                got.format,
                cell.format(),
                "{name}: format at ({}, {})",
                cell.row,
                cell.col
            );
        }
    }
}
