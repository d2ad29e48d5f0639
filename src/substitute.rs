//! The regex side of the `s` verb.
//!
//! Replacement text uses backslash escapes: `\1`..`\99` and `\g<name>` refer
//! to capture groups, `\0` and three-digit escapes such as `\101` are octal
//! character codes, `\n`, `\t` and friends insert control characters, and
//! `\\` inserts a backslash. A literal `$` needs no escaping.
//!
//! An empty match directly after a non-empty one is still replaced, so
//! `/x*/-` turns `abxd` into `-a-b--d-`.

use regex::Regex;

use crate::error::EditError;

/// A compiled `/pattern/replacement/` pair.
#[derive(Debug, Clone)]
pub struct Substitution {
    regex: Regex,
    /// Replacement in the regex crate's `$`-expansion syntax.
    replacement: String,
}

impl Substitution {
    /// Build a substitution from an argument of the form `DpatternDreplacement[D...]`,
    /// where `D` is the argument's first character. Anything after the
    /// replacement is ignored.
    pub fn parse(argument: &str) -> Result<Self, EditError> {
        let delim = argument
            .chars()
            .next()
            .ok_or_else(|| EditError::syntax("missing delimiter"))?;
        let mut parts = argument.split(delim).skip(1);
        let (Some(pattern), Some(replacement)) = (parts.next(), parts.next()) else {
            return Err(EditError::syntax(format!(
                "expected {delim}pattern{delim}replacement{delim}"
            )));
        };
        Self::new(pattern, replacement)
    }

    pub fn new(pattern: &str, replacement: &str) -> Result<Self, EditError> {
        let regex = Regex::new(pattern).map_err(EditError::syntax)?;
        let replacement = expand_template(replacement, &regex)?;
        Ok(Self { regex, replacement })
    }

    /// Replace every match in `line`.
    pub fn apply(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut copied = 0;
        let mut search = 0;
        // Position of the last empty match; another one there is skipped.
        let mut empty_at = None;
        while let Some(caps) = self.regex.captures_at(line, search) {
            let Some(m) = caps.get(0) else { break };
            if m.is_empty() && empty_at == Some(m.start()) {
                match line[search..].chars().next() {
                    Some(ch) => {
                        search += ch.len_utf8();
                        continue;
                    }
                    None => break,
                }
            }
            out.push_str(&line[copied..m.start()]);
            caps.expand(&self.replacement, &mut out);
            copied = m.end();
            search = m.end();
            empty_at = m.is_empty().then_some(m.end());
        }
        out.push_str(&line[copied..]);
        out
    }
}

/// Translate a backslash replacement template into `$` syntax, checking
/// group references against `regex`.
fn expand_template(template: &str, regex: &Regex) -> Result<String, EditError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '$' => out.push_str("$$"),
            '\\' => {
                let Some(esc) = chars.next() else {
                    return Err(EditError::syntax("bad escape (end of pattern)"));
                };
                match esc {
                    '0' => {
                        let mut code = 0;
                        for _ in 0..2 {
                            match chars.next_if(is_octal) {
                                Some(d) => code = code * 8 + octal_value(d),
                                None => break,
                            }
                        }
                        out.push(char::from(code as u8));
                    }
                    '1'..='9' => {
                        let mut digits = esc.to_string();
                        if let Some(next) = chars.next_if(char::is_ascii_digit) {
                            digits.push(next);
                            if is_octal(&esc) && is_octal(&next) {
                                if let Some(last) = chars.next_if(is_octal) {
                                    let code = [esc, next, last]
                                        .into_iter()
                                        .fold(0, |acc, d| acc * 8 + octal_value(d));
                                    if code > 0o377 {
                                        return Err(EditError::syntax(format!(
                                            "octal escape value \\{esc}{next}{last} outside of range 0-0o377"
                                        )));
                                    }
                                    out.push(char::from(code as u8));
                                    continue;
                                }
                            }
                        }
                        let group: usize = digits.parse().map_err(EditError::syntax)?;
                        if group >= regex.captures_len() {
                            return Err(EditError::syntax(format!(
                                "invalid group reference {group}"
                            )));
                        }
                        out.push_str(&format!("${{{group}}}"));
                    }
                    'g' => {
                        if chars.next_if_eq(&'<').is_none() {
                            return Err(EditError::syntax("missing < in \\g group reference"));
                        }
                        let mut name = String::new();
                        loop {
                            match chars.next() {
                                Some('>') => break,
                                Some(c) => name.push(c),
                                None => {
                                    return Err(EditError::syntax(
                                        "missing > in \\g group reference",
                                    ));
                                }
                            }
                        }
                        check_group_name(&name, regex)?;
                        out.push_str(&format!("${{{name}}}"));
                    }
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'f' => out.push('\x0c'),
                    'v' => out.push('\x0b'),
                    'a' => out.push('\x07'),
                    'b' => out.push('\x08'),
                    '\\' => out.push('\\'),
                    c if c.is_ascii_alphabetic() => {
                        return Err(EditError::syntax(format!("bad escape \\{c}")));
                    }
                    c => {
                        out.push('\\');
                        out.push(c);
                    }
                }
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

fn is_octal(c: &char) -> bool {
    matches!(c, '0'..='7')
}

fn octal_value(d: char) -> u32 {
    d.to_digit(8).unwrap_or(0)
}

fn check_group_name(name: &str, regex: &Regex) -> Result<(), EditError> {
    if let Ok(index) = name.parse::<usize>() {
        if index < regex.captures_len() {
            return Ok(());
        }
    } else if regex.capture_names().flatten().any(|n| n == name) {
        return Ok(());
    }
    Err(EditError::syntax(format!("unknown group name '{name}'")))
}
