//! HTML snapshot rendering.
//!
//! Renders the screen as a `<pre>` fragment with one `<span>` per run of
//! identically formatted cells. Handy for dumping the state of a virtual
//! display into a debug page or a test fixture.

use crate::cell::{Color, Format, Intensity, StyleFlags};
use crate::screen::Screen;

/// CSS hex values for the 16 named palette entries (standard xterm values):
/// 0-7 normal, 8-15 bright.
pub const PALETTE: [&str; 16] = [
    "#000000", "#800000", "#008000", "#808000", "#000080", "#800080", "#008080", "#c0c0c0",
    "#808080", "#ff0000", "#00ff00", "#ffff00", "#0000ff", "#ff00ff", "#00ffff", "#ffffff",
];

impl Format {
    /// The CSS declarations for this format.
    ///
    /// Declarations are sorted so a given format always renders the same
    /// way, which lets tests compare HTML output verbatim. Default colors
    /// produce no declaration and inherit from the enclosing `<pre>`.
    #[must_use]
    pub fn css(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let (mut fg, mut bg) = (self.fg, self.bg);
        if self.flags.contains(StyleFlags::REVERSE) {
            std::mem::swap(&mut fg, &mut bg);
        }
        if let Color::Named(idx) = fg {
            parts.push(format!("color:{}", PALETTE[(idx & 0x0f) as usize]));
        }
        if let Color::Named(idx) = bg {
            parts.push(format!("background-color:{}", PALETTE[(idx & 0x0f) as usize]));
        }

        match self.intensity {
            Intensity::Bold => parts.push("font-weight:bold".to_string()),
            Intensity::Faint => parts.push("opacity:0.33".to_string()),
            Intensity::Normal => {}
        }
        if self.flags.contains(StyleFlags::UNDERLINE) {
            parts.push("text-decoration:underline".to_string());
        }
        if self.flags.contains(StyleFlags::CONCEAL) {
            parts.push("display:none".to_string());
        }
        if self.flags.contains(StyleFlags::BLINK) {
            parts.push("text-decoration:blink".to_string());
        }

        parts.sort();
        parts.join(";")
    }
}

/// Minimal HTML escaping for cell content.
fn escape(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '\'' => Some("&#39;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

impl Screen {
    /// Render the grid as an HTML `<pre>` fragment.
    ///
    /// A `<span>` opens whenever the format changes away from the default
    /// and closes when it changes again; rows are separated by newlines.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::from(r#"<pre style="color:white;background-color:black;">"#);
        let default = Format::default();
        let mut last = default;
        for row in 0..self.rows() {
            let Some(cells) = self.grid().row_cells(row) else {
                break;
            };
            for cell in cells {
                if cell.format != last {
                    if last != default {
                        out.push_str("</span>");
                    }
                    if cell.format != default {
                        out.push_str(&format!(r#"<span style="{}">"#, cell.format.css()));
                    }
                    last = cell.format;
                }
                match escape(cell.ch) {
                    Some(entity) => out.push_str(entity),
                    None => out.push(cell.ch),
                }
            }
            out.push('\n');
        }
        if last != default {
            out.push_str("</span>");
        }
        out.push_str("</pre>");
        out
    }
}
