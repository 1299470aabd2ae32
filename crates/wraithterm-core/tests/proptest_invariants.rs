//! Property-based invariant tests.
//!
//! These verify structural properties that must hold for **any** input:
//!
//! 1. The parser never panics on arbitrary byte streams and is deterministic.
//! 2. The grid keeps its shape and the cursor column stays inside it.
//! 3. Splitting a stream at any byte boundary changes nothing: partial
//!    escape sequences and partial UTF-8 scalars carry across feeds.

use proptest::prelude::*;
use wraithterm_core::{Parser, Terminal};

/// Small enough for fast tests, large enough for edge cases.
fn dims() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=40, 1usize..=100)
}

fn byte_stream() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..1024)
}

/// Streams biased toward structure: escape sequences, controls, text.
fn ansi_stream() -> impl Strategy<Value = Vec<u8>> {
    let fragment = prop_oneof![
        "[a-zA-Z0-9 ]{0,12}".prop_map(|s| s.into_bytes()),
        (0u16..=150, prop::sample::select(&b"ABCDHJKmsu"[..]))
            .prop_map(|(n, f)| format!("\x1b[{n}{}", f as char).into_bytes()),
        (0u16..=20, 0u16..=120).prop_map(|(r, c)| format!("\x1b[{r};{c}H").into_bytes()),
        Just(b"\r".to_vec()),
        Just(b"\n".to_vec()),
        Just(b"\t".to_vec()),
        Just(b"\x08".to_vec()),
        Just("é中🎉".as_bytes().to_vec()),
    ];
    proptest::collection::vec(fragment, 0..64).prop_map(|frags| frags.concat())
}

proptest! {
    #[test]
    fn parser_is_total_and_deterministic(bytes in byte_stream()) {
        let mut first = Parser::new();
        let mut second = Parser::new();
        prop_assert_eq!(first.feed(&bytes), second.feed(&bytes));
    }

    #[test]
    fn grid_shape_survives_arbitrary_input((rows, cols) in dims(), bytes in byte_stream()) {
        let term = Terminal::new(rows, cols);
        term.feed(&bytes);
        // No auto-resize and no explicit resize: dimensions are fixed.
        prop_assert_eq!(term.size(), (rows, cols));
        prop_assert!(term.cursor().col < cols);
        prop_assert!(term.used_height() <= rows);
        for row in 0..rows {
            prop_assert_eq!(term.row_text(row).unwrap().chars().count(), cols);
        }
    }

    #[test]
    fn split_feeds_match_whole_feed(
        (rows, cols) in dims(),
        bytes in ansi_stream(),
        split in any::<prop::sample::Index>(),
    ) {
        let cut = split.index(bytes.len() + 1);

        let whole = Terminal::new(rows, cols);
        whole.feed(&bytes);

        let chunked = Terminal::new(rows, cols);
        chunked.feed(&bytes[..cut]);
        chunked.feed(&bytes[cut..]);

        prop_assert_eq!(whole.text(), chunked.text());
        prop_assert_eq!(whole.cursor(), chunked.cursor());
        prop_assert_eq!(whole.used_height(), chunked.used_height());
        prop_assert_eq!(whole.unsupported_sequences(), chunked.unsupported_sequences());
    }

    #[test]
    fn byte_by_byte_feed_matches_whole_feed((rows, cols) in (1usize..=10, 1usize..=20), bytes in ansi_stream()) {
        let whole = Terminal::new(rows, cols);
        whole.feed(&bytes);

        let trickled = Terminal::new(rows, cols);
        for b in &bytes {
            trickled.feed(std::slice::from_ref(b));
        }

        prop_assert_eq!(whole.text(), trickled.text());
        prop_assert_eq!(whole.cursor(), trickled.cursor());
    }

    #[test]
    fn full_erase_blanks_every_cell((rows, cols) in dims(), bytes in ansi_stream()) {
        let term = Terminal::new(rows, cols);
        term.feed(&bytes);
        term.feed(b"\x1b[2J");
        for row in 0..rows {
            for col in 0..cols {
                let cell = term.cell(row, col).unwrap();
                prop_assert_eq!(cell.ch, ' ');
                prop_assert_eq!(cell.format, wraithterm_core::Format::default());
            }
        }
    }
}
