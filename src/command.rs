//! Parsed representation of a single Sam edit command.

use phf::{Map, phf_map};

/// Where a command applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// A 1-based line number as written (`0` is allowed and means line 1).
    Line(usize),
    /// End of buffer (`$`), also used when no address could be parsed.
    End,
}

/// An executable verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `.`: move the dot without editing.
    Dot,
    /// `a`: append text after the addressed line.
    Append,
    /// `c`: change the addressed line.
    Change,
    /// `d`: delete the addressed line.
    Delete,
    /// `i`: insert text before the addressed line.
    Insert,
    /// `m`: move the addressed line.
    Move,
    /// `q`: truncate after the addressed line.
    Quit,
    /// `s`: regex substitution on the addressed line.
    Substitute,
    /// `t`: copy the addressed line.
    Transfer,
}

const VERB_MAP: Map<char, Verb> = phf_map! {
    '.' => Verb::Dot,
    'a' => Verb::Append,
    'c' => Verb::Change,
    'd' => Verb::Delete,
    'i' => Verb::Insert,
    'm' => Verb::Move,
    'q' => Verb::Quit,
    's' => Verb::Substitute,
    't' => Verb::Transfer,
};

impl Verb {
    /// Look up an executable verb by its command letter.
    pub fn from_char(ch: char) -> Option<Verb> {
        VERB_MAP.get(&ch).copied()
    }
}

/// Verbs that accept a delimited text argument (`2a/text/`). An omitted
/// address on these defaults to the first line of the dot.
pub(crate) fn is_text_verb(ch: char) -> bool {
    matches!(ch, 'a' | 'c' | 'i' | 's')
}

/// Letters accepted by the general `addr verb [text]` form.
///
/// This is wider than the set of executable verbs; the extra letters parse
/// as commands but are not understood by the interpreter.
pub(crate) fn is_verb_char(ch: char) -> bool {
    matches!(
        ch,
        'a' | 'b' | 'c' | 'd' | 'e' | 'f' | 'i' | 'm' | 'n' | 'q' | 'r' | 's' | 't' | 'x' | '.'
    )
}

/// The result of parsing a command string against the current dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub address: Address,
    /// The verb letter; `None` when the input is not a command.
    pub verb: Option<char>,
    pub argument: String,
}

impl ParsedCommand {
    pub fn new(address: Address, verb: char, argument: impl Into<String>) -> Self {
        Self {
            address,
            verb: Some(verb),
            argument: argument.into(),
        }
    }

    /// The sentinel produced for input that matches no command form.
    pub fn unrecognised() -> Self {
        Self {
            address: Address::End,
            verb: None,
            argument: String::new(),
        }
    }

    /// The executable verb, if the letter names one.
    pub fn executable_verb(&self) -> Option<Verb> {
        self.verb.and_then(Verb::from_char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_lookup() {
        assert_eq!(Verb::from_char('a'), Some(Verb::Append));
        assert_eq!(Verb::from_char('.'), Some(Verb::Dot));
        assert_eq!(Verb::from_char('t'), Some(Verb::Transfer));
        assert_eq!(Verb::from_char('x'), None);
        assert_eq!(Verb::from_char('A'), None);
    }

    #[test]
    fn test_recognised_but_not_executable() {
        for ch in ['b', 'e', 'f', 'n', 'r', 'x'] {
            assert!(is_verb_char(ch));
            assert_eq!(Verb::from_char(ch), None);
        }
    }

    #[test]
    fn test_unrecognised_has_no_verb() {
        let cmd = ParsedCommand::unrecognised();
        assert_eq!(cmd.address, Address::End);
        assert_eq!(cmd.verb, None);
        assert_eq!(cmd.executable_verb(), None);
    }
}
