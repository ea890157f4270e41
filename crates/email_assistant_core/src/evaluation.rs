//! crates/email_assistant_core/src/evaluation.rs
//!
//! Keyword heuristics that score a generated email for key point coverage,
//! politeness and length. This is deliberately not a language model: every
//! check is a case-insensitive substring test, so results are deterministic
//! for a given text.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::EvaluationResult;

const POLITE_PHRASES: &[&str] = &[
    "please",
    "thank you",
    "thanks",
    "appreciate",
    "grateful",
    "kindly",
    "would you",
    "could you",
    "may i",
    "excuse me",
    "sorry",
    "apologize",
    "sincerely",
    "regards",
    "respectfully",
    "dear",
    "hope",
    "look forward",
    "best wishes",
    "warm regards",
    "thank you for",
    "i appreciate",
    "we appreciate",
    "much appreciated",
];

const IMPOLITE_PHRASES: &[&str] = &[
    "must",
    "need to",
    "have to",
    "should",
    "demand",
    "require",
    "immediately",
    "asap",
    "urgent",
    "now",
    "right away",
];

const GREETINGS: &[&str] = &["dear", "hello", "hi", "good"];
const CLOSINGS: &[&str] = &["regards", "sincerely", "best", "thank you"];

pub const MIN_WORDS: usize = 50;
pub const MAX_WORDS: usize = 500;

/// Tokens of this length or shorter are ignored by the keyword fallback.
const MIN_TOKEN_CHARS: usize = 3;

static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word token pattern is valid"));

/// Politeness signals found in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSignals {
    pub polite_count: usize,
    pub impolite_count: usize,
    pub has_greeting: bool,
    pub has_closing: bool,
}

impl ToneSignals {
    pub fn is_polite(&self) -> bool {
        (self.polite_count >= 2 || (self.has_greeting && self.has_closing))
            && self.impolite_count <= self.polite_count
    }
}

/// Checks whether a single key point is reflected in an already-lowercased reply.
///
/// A point counts as found if it appears verbatim, or if ANY of its words longer
/// than two characters appears anywhere in the reply. The second rule is loose on
/// purpose and means "great meeting" matches any text containing "great".
pub fn point_is_covered(reply_lower: &str, point: &str) -> bool {
    let point_lower = point.to_lowercase();
    if reply_lower.contains(&point_lower) {
        return true;
    }

    WORD_TOKEN
        .find_iter(&point_lower)
        .map(|m| m.as_str())
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .any(|word| reply_lower.contains(word))
}

fn count_present(text_lower: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| text_lower.contains(*p)).count()
}

fn any_present(text_lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text_lower.contains(p))
}

/// Gathers politeness signals from a reply.
pub fn tone_signals(reply: &str) -> ToneSignals {
    let reply_lower = reply.to_lowercase();
    ToneSignals {
        polite_count: count_present(&reply_lower, POLITE_PHRASES),
        impolite_count: count_present(&reply_lower, IMPOLITE_PHRASES),
        has_greeting: any_present(&reply_lower, GREETINGS),
        has_closing: any_present(&reply_lower, CLOSINGS),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Scores a generated email against the key points it was meant to cover.
///
/// Never fails: empty replies and empty key point lists are valid input.
pub fn evaluate(reply: &str, key_points: &[String]) -> EvaluationResult {
    let reply_lower = reply.to_lowercase();

    let (found_points, missing_points): (Vec<String>, Vec<String>) = key_points
        .iter()
        .cloned()
        .partition(|point| point_is_covered(&reply_lower, point));

    let coverage_percent = if key_points.is_empty() {
        100.0
    } else {
        found_points.len() as f64 * 100.0 / key_points.len() as f64
    };

    let signals = tone_signals(reply);
    let tone_is_polite = signals.is_polite();
    let word_count = word_count(reply);

    let mut suggestions = Vec::new();
    if !missing_points.is_empty() {
        suggestions.push(format!("Missing key points: {}", missing_points.join(", ")));
    }
    if !tone_is_polite {
        suggestions.push("Consider adding more polite language (please, thank you, etc.)".to_string());
    }
    if word_count < MIN_WORDS {
        suggestions.push("Reply might be too brief - consider adding more detail".to_string());
    } else if word_count > MAX_WORDS {
        suggestions.push("Reply might be too verbose - consider making the email more concise".to_string());
    }

    EvaluationResult {
        all_key_points_included: missing_points.is_empty(),
        found_points,
        missing_points,
        coverage_percent,
        tone_is_polite,
        polite_count: signals.polite_count,
        impolite_count: signals.impolite_count,
        has_greeting: signals.has_greeting,
        has_closing: signals.has_closing,
        word_count,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn has_suggestion(result: &EvaluationResult, needle: &str) -> bool {
        result.suggestions.iter().any(|s| s.contains(needle))
    }

    #[test]
    fn no_key_points_means_everything_is_included() {
        for reply in ["", "anything at all", "You must do it now"] {
            let result = evaluate(reply, &[]);
            assert!(result.all_key_points_included);
            assert!(result.missing_points.is_empty());
            assert_eq!(result.coverage_percent, 100.0);
        }
    }

    #[test]
    fn empty_reply_misses_points_and_is_not_polite() {
        let result = evaluate("", &points(&["anything"]));
        assert!(!result.all_key_points_included);
        assert_eq!(result.missing_points, vec!["anything".to_string()]);
        assert_eq!(result.word_count, 0);
        assert!(!result.tone_is_polite);
        assert!(has_suggestion(&result, "too brief"));
        assert_eq!(result.coverage_percent, 0.0);
    }

    #[test]
    fn coverage_ignores_case() {
        let result = evaluate("I sent the REPORT", &points(&["report"]));
        assert!(result.all_key_points_included);
        assert_eq!(result.found_points, vec!["report".to_string()]);
    }

    #[test]
    fn any_long_token_is_enough_to_cover_a_point() {
        // Only "great" matches; "meeting" does not appear anywhere.
        let result = evaluate("We had a great discussion", &points(&["great meeting"]));
        assert!(result.all_key_points_included);
    }

    #[test]
    fn short_tokens_do_not_count() {
        let result = evaluate("we go to it", &points(&["go to"]));
        // "go to" appears verbatim, so it is found regardless of token length.
        assert!(result.all_key_points_included);

        let result = evaluate("to go", &points(&["go at it"]));
        assert!(!result.all_key_points_included);
        assert_eq!(result.missing_points, vec!["go at it".to_string()]);
    }

    #[test]
    fn point_without_qualifying_tokens_is_missing() {
        let result = evaluate("A completely unrelated text.", &points(&["Q3", "!!"]));
        assert_eq!(result.missing_points, points(&["Q3", "!!"]));
        assert!(has_suggestion(&result, "Missing key points: Q3, !!"));
    }

    #[test]
    fn partial_coverage_is_reported_as_percentage() {
        let result = evaluate(
            "The budget is approved.",
            &points(&["budget approval", "hire designer"]),
        );
        assert!(!result.all_key_points_included);
        assert_eq!(result.found_points, points(&["budget approval"]));
        assert_eq!(result.missing_points, points(&["hire designer"]));
        assert_eq!(result.coverage_percent, 50.0);
    }

    #[test]
    fn thanks_and_regards_read_as_polite() {
        let result = evaluate("Thank you for your time. Best regards,", &[]);
        assert!(result.tone_is_polite);
        assert!(result.polite_count >= 2);
        assert_eq!(result.impolite_count, 0);
    }

    #[test]
    fn demanding_text_is_not_polite() {
        let result = evaluate("You must send this immediately.", &[]);
        assert!(!result.tone_is_polite);
        assert_eq!(result.impolite_count, 2);
        assert_eq!(result.polite_count, 0);
        assert!(has_suggestion(&result, "polite language"));
    }

    #[test]
    fn greeting_and_closing_are_enough_without_polite_phrases() {
        let signals = tone_signals("Hello team, all the best");
        assert!(signals.has_greeting);
        assert!(signals.has_closing);
        assert_eq!(signals.polite_count, 0);
        assert!(signals.is_polite());
    }

    #[test]
    fn impolite_phrases_outweigh_polite_ones() {
        let signals = tone_signals("Please, thanks. You must reply now and you should hurry.");
        assert_eq!(signals.polite_count, 2);
        assert_eq!(signals.impolite_count, 3);
        assert!(!signals.is_polite());
    }

    #[test]
    fn word_count_boundaries() {
        let at_49 = evaluate(&words(49), &[]);
        assert_eq!(at_49.word_count, 49);
        assert!(has_suggestion(&at_49, "too brief"));

        let at_50 = evaluate(&words(50), &[]);
        assert!(!has_suggestion(&at_50, "too brief"));
        assert!(!has_suggestion(&at_50, "too verbose"));

        let at_500 = evaluate(&words(500), &[]);
        assert!(!has_suggestion(&at_500, "too verbose"));

        let at_501 = evaluate(&words(501), &[]);
        assert!(has_suggestion(&at_501, "too verbose"));
    }

    #[test]
    fn word_count_splits_on_any_whitespace() {
        assert_eq!(word_count("  one\ttwo\n\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn polished_email_passes() {
        let reply = "Dear Ms. Lee,\n\nThank you for meeting with us. I confirm our meeting on Friday at 2pm \
                     and I hope you can bring the Q3 report along. We appreciate your help.\n\nBest regards,\nSam";
        let result = evaluate(reply, &points(&["Confirm meeting Friday 2pm", "Bring Q3 report"]));
        assert!(result.all_key_points_included);
        assert!(result.tone_is_polite);
        assert!(result.passed());
    }
}
