//! ANSI decoder.
//!
//! A deterministic byte-at-a-time state machine that turns a terminal output
//! stream into [`Command`]s:
//!
//! - printable characters (ASCII + full UTF-8) -> `Command::Print`
//! - the four interpreted C0 controls -> `Command::Control`
//! - `ESC [ P* final` sequences -> `Command::Csi` with per-slot optional
//!   parameters (an absent parameter is distinguishable from 0)
//! - everything else introduced by ESC -> `Command::Escape`, a raw capture
//!   for the interpreter to log and skip
//!
//! The parser is resumable: partial escape sequences and partial UTF-8
//! scalars are carried in parser state between [`Parser::feed`] calls, so a
//! stream may be split at any byte boundary without losing data.

use smallvec::SmallVec;

/// Inline capacity for CSI parameter lists.
///
/// Each slot is `None` when the parameter was omitted (`ESC[;5H` has an
/// absent first slot); consumers apply per-opcode defaults. Most sequences
/// carry few parameters, so the common case stays on the stack.
pub type CsiParams = SmallVec<[Option<u16>; 4]>;

/// Upper bound on a buffered escape sequence.
///
/// Any CSI this engine decodes fits comfortably; a sequence that grows past
/// the cap is surrendered as an unsupported raw capture rather than buffered
/// forever.
pub const MAX_SEQUENCE_LEN: usize = 128;

const ESC: u8 = 0x1b;

/// The single-byte controls with direct meaning to the interpreter.
/// All other C0 bytes (and DEL) are dropped by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// BS (0x08).
    Backspace,
    /// HT (0x09).
    Tab,
    /// LF (0x0A).
    LineFeed,
    /// CR (0x0D).
    CarriageReturn,
}

/// One decoded terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write one printable scalar at the cursor.
    Print(char),
    /// One of the interpreted C0 controls.
    Control(Control),
    /// A decoded `ESC [ P* final` sequence. The final byte is in
    /// `0x40..=0x7E`; parameter slots preserve absence.
    Csi { params: CsiParams, final_byte: u8 },
    /// A raw escape sequence this decoder does not understand, captured
    /// verbatim (starts with ESC). The interpreter logs and skips these.
    Escape(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    /// Just saw ESC; deciding the sequence kind.
    Esc,
    /// Inside a non-CSI escape; skipping until a `0x40..=0x7E` final byte.
    EscOther,
    /// Inside `ESC [`, collecting parameter bytes until the final byte.
    Csi,
    /// Accumulating a multi-byte UTF-8 scalar; counts continuation bytes
    /// still expected.
    Utf8 { remaining: u8 },
}

/// Resumable ANSI decoder state.
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    buf: Vec<u8>,
    utf8_buf: [u8; 4],
    utf8_len: u8,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in ground state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            buf: Vec::new(),
            utf8_buf: [0; 4],
            utf8_len: 0,
        }
    }

    /// Bytes currently buffered for an in-flight escape sequence or UTF-8
    /// scalar. These are consumed by the next `feed`/`advance` calls.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.buf.len() + self.utf8_len as usize
    }

    /// Feed a chunk of bytes and return the decoded commands.
    #[must_use]
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Command> {
        let mut out = Vec::new();
        self.feed_into(bytes, &mut out);
        out
    }

    /// Feed a chunk of bytes, appending decoded commands to `out`.
    ///
    /// Callers on hot paths can reuse one output buffer across chunks by
    /// calling `out.clear()` between invocations.
    pub fn feed_into(&mut self, bytes: &[u8], out: &mut Vec<Command>) {
        for &b in bytes {
            if let Some(cmd) = self.advance(b) {
                out.push(cmd);
            }
        }
    }

    /// Advance the parser by one byte.
    ///
    /// Returns a command when a complete token is recognized.
    pub fn advance(&mut self, b: u8) -> Option<Command> {
        match self.state {
            State::Ground => self.advance_ground(b),
            State::Esc => self.advance_esc(b),
            State::EscOther => self.advance_esc_other(b),
            State::Csi => self.advance_csi(b),
            State::Utf8 { remaining } => self.advance_utf8(b, remaining),
        }
    }

    fn advance_ground(&mut self, b: u8) -> Option<Command> {
        match b {
            0x08 => Some(Command::Control(Control::Backspace)),
            0x09 => Some(Command::Control(Control::Tab)),
            0x0a => Some(Command::Control(Control::LineFeed)),
            0x0d => Some(Command::Control(Control::CarriageReturn)),
            ESC => {
                self.state = State::Esc;
                self.buf.clear();
                self.buf.push(ESC);
                None
            }
            0x20..=0x7e => Some(Command::Print(b as char)),
            // UTF-8 leading bytes (0xC0-0xC1 overlong and 0xF5-0xFF are
            // outside valid Unicode and fall through to the ignore arm).
            0xc2..=0xdf => self.start_utf8(b, 1),
            0xe0..=0xef => self.start_utf8(b, 2),
            0xf0..=0xf4 => self.start_utf8(b, 3),
            // Remaining C0 controls, DEL, stray continuation bytes.
            _ => None,
        }
    }

    fn start_utf8(&mut self, b: u8, remaining: u8) -> Option<Command> {
        self.utf8_buf[0] = b;
        self.utf8_len = 1;
        self.state = State::Utf8 { remaining };
        None
    }

    fn advance_utf8(&mut self, b: u8, remaining: u8) -> Option<Command> {
        if !(0x80..=0xbf).contains(&b) {
            // Invalid continuation: drop the partial scalar and reprocess
            // this byte from ground state.
            self.state = State::Ground;
            self.utf8_len = 0;
            return self.advance_ground(b);
        }
        let idx = self.utf8_len as usize;
        if idx < 4 {
            self.utf8_buf[idx] = b;
            self.utf8_len += 1;
        }
        if remaining > 1 {
            self.state = State::Utf8 {
                remaining: remaining - 1,
            };
            return None;
        }
        self.state = State::Ground;
        let len = self.utf8_len as usize;
        self.utf8_len = 0;
        core::str::from_utf8(&self.utf8_buf[..len])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Command::Print)
    }

    fn advance_esc(&mut self, b: u8) -> Option<Command> {
        self.buf.push(b);
        match b {
            b'[' => {
                self.state = State::Csi;
                None
            }
            // A one-byte escape (ESC D, ESC 7, ...): complete but not ours.
            0x40..=0x7e => {
                self.state = State::Ground;
                Some(Command::Escape(self.take_buf()))
            }
            // Intermediates and anything else: keep skipping to the final.
            _ => {
                self.state = State::EscOther;
                None
            }
        }
    }

    fn advance_esc_other(&mut self, b: u8) -> Option<Command> {
        self.buf.push(b);
        if (0x40..=0x7e).contains(&b) || self.buf.len() >= MAX_SEQUENCE_LEN {
            self.state = State::Ground;
            return Some(Command::Escape(self.take_buf()));
        }
        None
    }

    fn advance_csi(&mut self, b: u8) -> Option<Command> {
        self.buf.push(b);
        // Final byte for CSI is in 0x40..=0x7E (ECMA-48).
        if (0x40..=0x7e).contains(&b) {
            self.state = State::Ground;
            let seq = self.take_buf();
            return Some(Self::decode_csi(&seq).unwrap_or(Command::Escape(seq)));
        }
        if self.buf.len() >= MAX_SEQUENCE_LEN {
            self.state = State::Ground;
            return Some(Command::Escape(self.take_buf()));
        }
        None
    }

    /// Replace `buf` with a same-capacity Vec so the heap allocation is
    /// retained for the next escape sequence.
    fn take_buf(&mut self) -> Vec<u8> {
        let cap = self.buf.capacity();
        core::mem::replace(&mut self.buf, Vec::with_capacity(cap))
    }

    fn decode_csi(seq: &[u8]) -> Option<Command> {
        if seq.len() < 3 || seq[0] != ESC || seq[1] != b'[' {
            return None;
        }
        let final_byte = *seq.last()?;
        let params = Self::parse_params(&seq[2..seq.len() - 1])?;
        Some(Command::Csi { params, final_byte })
    }

    /// Parse `P*`: semicolon-separated, possibly-empty decimal parameters.
    ///
    /// Returns `None` when the parameter bytes contain anything else
    /// (private markers like `?`/`<`/`>`, intermediates), leaving the
    /// sequence to be surfaced as a raw unsupported capture.
    fn parse_params(bytes: &[u8]) -> Option<CsiParams> {
        let mut params = CsiParams::new();
        if bytes.is_empty() {
            return Some(params);
        }
        if !bytes.iter().all(|b| b.is_ascii_digit() || *b == b';') {
            return None;
        }
        let mut current: Option<u32> = None;
        for &b in bytes {
            if b == b';' {
                params.push(current.map(|v| v.min(u16::MAX as u32) as u16));
                current = None;
            } else {
                let digit = (b - b'0') as u32;
                current = Some(
                    current
                        .unwrap_or(0)
                        .saturating_mul(10)
                        .saturating_add(digit),
                );
            }
        }
        params.push(current.map(|v| v.min(u16::MAX as u32) as u16));
        Some(params)
    }
}
