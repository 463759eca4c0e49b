//! Utterance parsing
//!
//! An utterance must start with the wake word. The remaining body is matched
//! against an ordered pattern table; the first pattern that matches and
//! yields a valid command wins. Parsing is pure, so priority order can be
//! tested without touching storage.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Keep trailing punctuation of the command body
//! - 1.0.0: Wake-word gate and ordered pattern table

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Separators allowed between the wake word and the command body
const WAKE_SEPARATORS: &str = ",.:;!-";

/// A recognised command body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `remind [me] in <N> min[utes]: <message>`
    Schedule { minutes: u32, message: String },
    /// `show reminders`
    List,
    /// `delete reminder <N>` with a 1-based index into the active list
    Delete { index: usize },
    /// `help`
    Help,
    /// Anything else
    Unknown,
}

/// One entry of the pattern table
struct CommandPattern {
    regex: Regex,
    /// Returns `None` when the captures do not form a valid command
    build: fn(&Captures) -> Option<Command>,
}

fn build_schedule(caps: &Captures) -> Option<Command> {
    let minutes = caps[1].parse::<u32>().ok()?;
    let message = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Some(Command::Schedule { minutes, message })
}

fn build_list(_: &Captures) -> Option<Command> {
    Some(Command::List)
}

fn build_delete(caps: &Captures) -> Option<Command> {
    let index = caps[1].parse::<usize>().ok()?;
    Some(Command::Delete { index })
}

fn build_help(_: &Captures) -> Option<Command> {
    Some(Command::Help)
}

fn patterns() -> &'static [CommandPattern] {
    static PATTERNS: OnceLock<Vec<CommandPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let table: [(&str, fn(&Captures) -> Option<Command>); 4] = [
            (
                r"(?is)remind(?:\s+me)?\s+in\s+(\d+)\s*(?:minutes|minute|mins|min|m)\b\s*[:：]?\s*(.*)$",
                build_schedule,
            ),
            (r"(?i)show\s+reminders", build_list),
            (r"(?i)(?:delete|remove)\s+reminder\s+(\d+)\b", build_delete),
            (r"(?i)^help[.!?]*$", build_help),
        ];
        table
            .into_iter()
            .map(|(pattern, build)| CommandPattern {
                regex: Regex::new(pattern).expect("command patterns are valid regexes"),
                build,
            })
            .collect()
    })
}

/// Strip a case-insensitive `wake_word` prefix and the separators after it.
///
/// Returns `None` when the trimmed utterance does not start with the wake word.
pub fn strip_wake_word<'a>(utterance: &'a str, wake_word: &str) -> Option<&'a str> {
    let text = utterance.trim();
    let mut rest = text.char_indices();
    let mut end = 0;

    for expected in wake_word.trim().chars() {
        let (pos, actual) = rest.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = pos + actual.len_utf8();
    }

    let body = text[end..]
        .trim_start_matches(|c: char| c.is_whitespace() || WAKE_SEPARATORS.contains(c));
    Some(body.trim())
}

/// Match a command body against the pattern table
pub fn parse_body(body: &str) -> Command {
    let body = body.trim();
    patterns()
        .iter()
        .find_map(|pattern| {
            pattern
                .regex
                .captures(body)
                .and_then(|caps| (pattern.build)(&caps))
        })
        .unwrap_or(Command::Unknown)
}

/// Parse a full utterance; `None` means the wake word is missing
pub fn parse(utterance: &str, wake_word: &str) -> Option<Command> {
    strip_wake_word(utterance, wake_word).map(parse_body)
}
