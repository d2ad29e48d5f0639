//! Parser for Sam address/command strings.
//!
//! Two command forms are recognised, tried in this order:
//!
//! * delimited text commands: `[addr](a|c|i|s)<D>text<D>`, where `<D>` is any
//!   character and must also be the final character of the command;
//! * general commands: `addr verb [text]`, where `addr` is required.
//!
//! An address is a decimal line number or `$`, optionally followed by a range
//! tail `[.][,][digits]` which is accepted but not used.
//!
//! Parsing never fails: input matching neither form yields
//! [`ParsedCommand::unrecognised`].

use crate::command::{Address, ParsedCommand, is_text_verb, is_verb_char};
use crate::dot::Dot;

/// Parse `input` into an address, verb and argument, resolving dot-relative
/// addresses against `dot`.
pub fn parse_command(input: &str, dot: Dot) -> ParsedCommand {
    let after_dot = Address::Line(dot.start.saturating_add(1));

    if let Some(rest) = input.strip_prefix('.') {
        let mut chars = rest.chars();
        let verb = chars.next().unwrap_or('.');
        return ParsedCommand::new(after_dot, verb, chars.as_str());
    }
    if input == "$." {
        return ParsedCommand::new(Address::End, '.', "");
    }

    parse_delimited(input, after_dot)
        .or_else(|| parse_general(input))
        .unwrap_or_else(ParsedCommand::unrecognised)
}

/// Returns true if `line` should be treated as an edit command rather than
/// literal text. Lines starting with a backslash are never commands.
pub fn is_command(line: &str) -> bool {
    if line.starts_with('\\') {
        return false;
    }
    if line == "$" || line == "." {
        return true;
    }
    parse_delimited(line, Address::End).is_some() || parse_general(line).is_some()
}

/// `[addr](a|c|i|s)<D>text<D>`
fn parse_delimited(input: &str, default_address: Address) -> Option<ParsedCommand> {
    let (address, rest) = split_address(input);
    let rest = skip_range_tail(rest, true);

    let mut chars = rest.chars();
    let verb = chars.next().filter(|&ch| is_text_verb(ch))?;
    let delimited = chars.as_str();
    let delim = delimited.chars().next()?;
    let body = delimited[delim.len_utf8()..].strip_suffix(delim)?;

    // The substitute verb keeps its leading delimiter so the interpreter
    // can split pattern from replacement.
    let argument = if verb == 's' {
        format!("{delim}{body}")
    } else {
        body.to_string()
    };
    Some(ParsedCommand::new(
        address.unwrap_or(default_address),
        verb,
        argument,
    ))
}

/// `addr verb [text]`
fn parse_general(input: &str) -> Option<ParsedCommand> {
    let (address, rest) = split_address(input);
    let address = address?;

    // A `.` straight after the address is either part of the range tail or
    // the dot verb itself; prefer the tail and fall back to the verb.
    [true, false].into_iter().find_map(|take_dot| {
        let mut chars = skip_range_tail(rest, take_dot).chars();
        let verb = chars.next().filter(|&ch| is_verb_char(ch))?;
        Some(ParsedCommand::new(address, verb, chars.as_str()))
    })
}

/// Split a leading line number or `$` off `input`.
fn split_address(input: &str) -> (Option<Address>, &str) {
    if let Some(rest) = input.strip_prefix('$') {
        return (Some(Address::End), rest);
    }
    let len = leading_digits(input);
    if len == 0 {
        return (None, input);
    }
    let (digits, rest) = input.split_at(len);
    // Only overflow can fail here; such a line number clamps to the end anyway.
    let line = digits.parse().unwrap_or(usize::MAX);
    (Some(Address::Line(line)), rest)
}

fn skip_range_tail(input: &str, take_dot: bool) -> &str {
    let mut rest = input;
    if take_dot {
        rest = rest.strip_prefix('.').unwrap_or(rest);
    }
    rest = rest.strip_prefix(',').unwrap_or(rest);
    &rest[leading_digits(rest)..]
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
