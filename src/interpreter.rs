//! Sam command interpreter.
//!
//! [`apply`] is a pure transition from `(command, lines, dot)` to a new line
//! sequence and a new dot. It never touches its inputs and holds no state of
//! its own; the caller decides whether to keep the result.

use std::ops::Range;

use tracing::debug;

use crate::command::{Address, Verb};
use crate::dot::Dot;
use crate::error::EditError;
use crate::parser::parse_command;
use crate::substitute::Substitution;

/// Lines and dot produced by a command.
pub type EditResult = Result<(Vec<String>, Dot), EditError>;

/// Apply a single edit command to `lines` with the current `dot`.
///
/// Unrecognised commands return the lines unchanged with the dot reset to
/// `(0, 0)`. Only the substitute verb can fail.
pub fn apply(command: &str, lines: &[String], dot: Dot) -> EditResult {
    let parsed = parse_command(command, dot);
    let Some(verb) = parsed.executable_verb() else {
        debug!(command, "unrecognised edit command");
        return Ok((lines.to_vec(), Dot::zero()));
    };
    let addr = resolve_address(parsed.address, lines.len());
    let (new_lines, new_dot) = execute(verb, addr, &parsed.argument, lines, dot)?;
    debug!(?verb, addr, %new_dot, lines = new_lines.len(), "applied edit command");
    Ok((new_lines, new_dot))
}

/// Apply a command to a buffer held as one multi-line string.
pub fn apply_to_text(command: &str, text: &str, dot: Dot) -> EditResult {
    apply(command, &split_lines(text), dot)
}

/// Split text into buffer lines, dropping line terminators.
///
/// Besides `\n` and `\r\n`, a lone `\r`, vertical tab, form feed, the ASCII
/// separators `\x1c`..`\x1e`, NEL, and the Unicode line and paragraph
/// separators all end a line. A final terminator does not start a new line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find(is_line_break) {
        lines.push(rest[..at].to_string());
        let tail = &rest[at..];
        let width = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[width..];
    }
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }
    lines
}

fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Normalise an address to a 1-based line number in `0..=len`.
///
/// Line 0 means line 1; `$` and anything past the end mean the last line.
/// The result is 0 only for an empty buffer.
fn resolve_address(address: Address, len: usize) -> usize {
    match address {
        Address::Line(n) => n.max(1).min(len),
        Address::End => len,
    }
}

fn execute(verb: Verb, addr: usize, argument: &str, lines: &[String], dot: Dot) -> EditResult {
    let len = lines.len();
    // Index of the addressed line; also the insertion index before it.
    let before = addr.saturating_sub(1);
    let unchanged = || -> EditResult { Ok((lines.to_vec(), dot)) };

    let (new_lines, new_dot) = match verb {
        Verb::Dot => (lines.to_vec(), Dot::new(before, addr)),
        Verb::Append => {
            let text = split_lines(argument);
            let k = text.len();
            (splice(lines, addr..addr, text), Dot::new(addr, addr + k))
        }
        Verb::Insert => {
            let text = split_lines(argument);
            let k = text.len();
            (splice(lines, before..before, text), Dot::new(before, before + k))
        }
        Verb::Change => {
            let mut text = split_lines(argument);
            if text.is_empty() {
                text.push(String::new());
            }
            let k = text.len();
            (splice(lines, before..addr, text), Dot::new(before, before + k))
        }
        Verb::Delete => {
            if addr == 0 {
                return unchanged();
            }
            (splice(lines, before..addr, Vec::new()), Dot::new(before, before))
        }
        Verb::Quit => (lines[..addr].to_vec(), Dot::new(addr, addr)),
        Verb::Move => {
            let Some(target) = parse_target(argument).filter(|t| (1..=len).contains(t)) else {
                return unchanged();
            };
            let mut moved = lines.to_vec();
            let line = moved.remove(before);
            moved.insert(target - 1, line);
            (moved, Dot::new(target - 1, target))
        }
        Verb::Transfer => {
            let valid = |t: &usize| addr > 0 && (1..=len + 1).contains(t);
            let Some(target) = parse_target(argument).filter(valid) else {
                return unchanged();
            };
            let mut copied = lines.to_vec();
            copied.insert(target - 1, lines[before].clone());
            (copied, Dot::new(target, target))
        }
        Verb::Substitute => {
            if addr == 0 || argument.is_empty() {
                return unchanged();
            }
            let substitution = Substitution::parse(argument)?;
            let mut substituted = lines.to_vec();
            substituted[before] = substitution.apply(&lines[before]);
            (substituted, Dot::new(before, addr))
        }
    };
    let new_dot = new_dot.clamp_to(new_lines.len());
    Ok((new_lines, new_dot))
}

/// Copy `lines` with `range` replaced by `text`.
fn splice(lines: &[String], range: Range<usize>, text: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + text.len());
    out.extend_from_slice(&lines[..range.start]);
    out.extend(text);
    out.extend_from_slice(&lines[range.end..]);
    out
}

/// Parse the 1-based target line of `m` and `t`.
fn parse_target(argument: &str) -> Option<usize> {
    argument.trim().parse().ok()
}
