//! Plain-terminal rendering of a session's buffer.
//!
//! Lines under the dot are shown in reverse video. A point dot marks the line
//! it sits before, matching how the console highlights the current line.

use std::io::{self, Write};
use std::ops::RangeInclusive;

use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};

use crate::dot::Dot;

/// Lines covered by `dot` in a buffer of `len` lines, or `None` if empty.
pub fn highlighted(dot: Dot, len: usize) -> Option<RangeInclusive<usize>> {
    let last = len.checked_sub(1)?;
    let start = dot.start.min(last);
    let end = if dot.is_point() {
        start
    } else {
        (dot.end - 1).clamp(start, last)
    };
    Some(start..=end)
}

/// Write `lines` to `out`, one per line, highlighting the dot when `styled`.
pub fn render_lines(
    out: &mut impl Write,
    lines: &[String],
    dot: Dot,
    styled: bool,
) -> io::Result<()> {
    let selected = highlighted(dot, lines.len());
    for (i, line) in lines.iter().enumerate() {
        let marked = selected.as_ref().is_some_and(|r| r.contains(&i));
        if styled && marked {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(line),
                SetAttribute(Attribute::Reset),
                Print('\n')
            )?;
        } else {
            queue!(out, Print(line), Print('\n'))?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_highlighted_range() {
        assert_eq!(highlighted(Dot::new(1, 3), 5), Some(1..=2));
    }

    #[test]
    fn test_highlighted_point() {
        assert_eq!(highlighted(Dot::new(2, 2), 5), Some(2..=2));
        assert_eq!(highlighted(Dot::new(5, 5), 5), Some(4..=4));
    }

    #[test]
    fn test_highlighted_empty() {
        assert_eq!(highlighted(Dot::zero(), 0), None);
    }

    #[test]
    fn test_render_plain() {
        let mut out = Vec::new();
        render_lines(&mut out, &lines(&["a", "b"]), Dot::new(0, 1), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_render_styled_marks_dot_only() {
        let mut out = Vec::new();
        render_lines(&mut out, &lines(&["a", "b", "c"]), Dot::new(1, 2), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("a\n"));
        assert!(text.ends_with("c\n"));
        assert!(text.contains("\x1b[7mb"), "got: {text:?}");
    }
}
