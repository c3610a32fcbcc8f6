//! Timer and submit/speech-handler bookkeeping (spec.md §3 "Timer",
//! "Submit Handler"; §5 "Event subscription bookkeeping").
//!
//! Grounded on `plotnik-vm`'s `engine/frame.rs` `FrameArena`: an
//! append-only collection the engine clears wholesale on re-entry. This
//! engine has no backtracking (spec.md §9 drops the parent-pointer
//! back-reference for the same reason ParseNode has no backtracking
//! either), so the arena only needs push and clear-all — no partial
//! restore.

use ifscript_parser::NodeId;
use regex::Regex;

use crate::console::TextStyle;

/// What a timer does once its delay elapses.
#[derive(Clone, Debug)]
pub enum TimerPurpose {
    /// `if timer is <seconds>` (spec.md §4.4.4): run the node's body then
    /// recurse into its children.
    Once { node: NodeId },
    /// `type <ms> <text>`, whether from a `type` condition (spec.md
    /// §4.4.4) or a `type` line command (spec.md §4.4.5). `resume_at` is
    /// the line index to continue `node`'s body from once the typed text
    /// is exhausted (0 for the condition form, since nothing in the
    /// node's own body has been consumed yet).
    Typewriter {
        node: NodeId,
        resume_at: usize,
        style: TextStyle,
        remaining: Vec<char>,
    },
}

#[derive(Clone, Debug)]
pub struct Timer {
    pub due_ms: u64,
    pub interval_ms: u64,
    pub purpose: TimerPurpose,
}

/// `if text is|!is|has|!has|pick <query>` (spec.md §4.4.4).
#[derive(Clone, Debug)]
pub enum TextPredicate {
    Is(String),
    NotIs(String),
    Has(Vec<String>),
    NotHas(Vec<String>),
    Pick(Vec<String>),
}

impl TextPredicate {
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim();
        match self {
            TextPredicate::Is(query) => input.eq_ignore_ascii_case(query.trim()),
            TextPredicate::NotIs(query) => !input.eq_ignore_ascii_case(query.trim()),
            TextPredicate::Has(words) => words.iter().all(|w| word_present(input, w)),
            TextPredicate::NotHas(words) => !words.iter().any(|w| word_present(input, w)),
            TextPredicate::Pick(words) => words.iter().any(|w| word_present(input, w)),
        }
    }
}

fn word_present(haystack: &str, word: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(word.trim()));
    Regex::new(&pattern)
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

/// Split a `has`/`pick` query on commas, with `\c` as an escaped comma
/// (spec.md §4.4.4).
pub fn split_query_words(query: &str) -> Vec<String> {
    const PLACEHOLDER: char = '\u{1}';
    let shielded = query.replace("\\c", &PLACEHOLDER.to_string());
    shielded
        .split(',')
        .map(|w| w.trim().replace(PLACEHOLDER, ","))
        .filter(|w| !w.is_empty())
        .collect()
}

#[derive(Clone, Debug)]
pub struct SubmitHandler {
    pub node: NodeId,
    pub predicate: TextPredicate,
}

#[derive(Clone, Debug)]
pub struct SpeechHandler {
    pub node: NodeId,
    pub phrase: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_comma_honoring_escape() {
        let words = split_query_words(r"red,blue\,green,purple");
        assert_eq!(words, vec!["red", "blue,green", "purple"]);
    }

    #[test]
    fn has_requires_every_word_whole_word() {
        let p = TextPredicate::Has(vec!["red".into(), "blue".into()]);
        assert!(p.matches("I like red and blue"));
        assert!(!p.matches("I like reddish things"));
        assert!(!p.matches("only red here"));
    }

    #[test]
    fn pick_requires_any_word() {
        let p = TextPredicate::Pick(vec!["red".into(), "blue".into(), "green".into()]);
        assert!(p.matches("I like BLUE best"));
        assert!(!p.matches("none of those"));
    }

    #[test]
    fn is_and_not_is_are_case_insensitive_exact() {
        assert!(TextPredicate::Is("Yes".into()).matches(" yes "));
        assert!(TextPredicate::NotIs("Yes".into()).matches("no"));
    }
}
