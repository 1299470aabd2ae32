#![forbid(unsafe_code)]

//! Headless VT100/ANSI terminal engine.
//!
//! `wraithterm-core` is an in-memory terminal model: feed it the byte stream
//! a subprocess writes to its tty and it maintains a two-dimensional grid of
//! character cells with per-cell display attributes and a cursor. Programs
//! that assume a terminal (editors, TUIs, curses-style progress displays)
//! can be driven against it and their screens inspected or serialized.
//!
//! # Primary responsibilities
//!
//! - **Cell / Format**: character content + display attributes (16-color
//!   palette with a default sentinel, intensity, style flags).
//! - **Grid**: 2D cell matrix with erase, scroll, and resize primitives.
//! - **Parser**: resumable ANSI decoder; byte stream -> [`Command`]s, safe
//!   to split at any byte boundary.
//! - **Screen**: the interpreter that applies commands — cursor motion,
//!   erasure, SGR attributes, lazy scrolling, on-demand growth.
//! - **Terminal**: the `Send + Sync` shell that serializes producers and
//!   observers behind one lock and speaks `std::io::Write`.
//!
//! # Design principles
//!
//! - **No I/O**: the host supplies bytes and reads state back.
//! - **Deterministic**: identical byte sequences always produce identical
//!   screens.
//! - **Nothing corrupts the grid**: malformed or unsupported sequences are
//!   logged (via `tracing`) and skipped; an operation applies fully or not
//!   at all.
//!
//! # Example
//!
//! ```
//! use wraithterm_core::Terminal;
//!
//! let term = Terminal::new(2, 10);
//! term.feed(b"hi \x1b[1mthere\x1b[0m");
//! assert_eq!(term.row_text(0).unwrap(), "hi there  ");
//! assert_eq!(term.used_height(), 1);
//! ```

pub mod cell;
pub mod cursor;
pub mod grid;
pub mod html;
pub mod parser;
pub mod screen;
pub mod terminal;

pub use cell::{Cell, Color, Format, Intensity, StyleFlags};
pub use cursor::Cursor;
pub use grid::Grid;
pub use html::PALETTE;
pub use parser::{Command, Control, CsiParams, MAX_SEQUENCE_LEN, Parser};
pub use screen::{ProcessError, Screen};
pub use terminal::Terminal;
