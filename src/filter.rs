use std::io;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::error::Result;
use crate::n_gram::BigramVocabulary;
use crate::types::Token;
use crate::util::tokenize;

// marker run, whitespace, anything, whitespace, marker run: "= Title =", "== A B =="
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(=+)\s.*\s(=+)$").expect("heading regex"));

/// A test-corpus line that passed every predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleSentence {
    // Stripped and trimmed, original case
    pub text: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Heading,
    TooShort,
    Uncovered,
}

/// Drops everything except alphanumerics, whitespace, commas and periods, then trims.
pub fn strip_special_characters(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == ',' || *c == '.')
        .collect::<String>()
        .trim()
        .to_owned()
}

/// True for lines shaped like a wiki heading, with the same marker run on
/// both ends.
pub fn is_heading(line: &str) -> bool {
    match HEADING_RE.captures(line) {
        Some(caps) => caps[1] == caps[2],
        None => false,
    }
}

pub fn meets_min_length(tokens: &[Token], min_tokens: usize) -> bool {
    tokens.len() >= min_tokens
}

/// True when every adjacent pair in `tokens` was seen in training.
pub fn is_fully_covered<V: BigramVocabulary + ?Sized>(tokens: &[Token], vocabulary: &V) -> bool {
    vocabulary.covers(tokens)
}

/// Runs the predicates in order on a single line.
pub fn check_sentence<V: BigramVocabulary + ?Sized>(
    line: &str,
    vocabulary: &V,
    min_tokens: usize,
) -> std::result::Result<EligibleSentence, Rejection> {
    // the heading markers are special characters, so look for them before stripping
    if is_heading(line.trim()) {
        return Err(Rejection::Heading);
    }
    let text = strip_special_characters(line);
    if is_heading(&text) {
        return Err(Rejection::Heading);
    }

    let tokens = tokenize(&text);
    if !meets_min_length(&tokens, min_tokens) {
        return Err(Rejection::TooShort);
    }

    if !is_fully_covered(&tokens, vocabulary) {
        return Err(Rejection::Uncovered);
    }

    Ok(EligibleSentence { text, tokens })
}

/// Lazily yields the eligible sentences of `lines`, in order.
///
/// Lines are only read when the consumer asks for the next sentence, so a
/// consumer that stops early leaves the rest of the source untouched. Building
/// a new filter over the same source starts the scan again.
pub struct EligibilityFilter<'a, I, V: ?Sized> {
    lines: I,
    vocabulary: &'a V,
    min_tokens: usize,
    scanned: usize,
}

impl<'a, I, V> EligibilityFilter<'a, I, V>
where
    I: Iterator<Item = io::Result<String>>,
    V: BigramVocabulary + ?Sized,
{
    pub fn new(lines: I, vocabulary: &'a V, min_tokens: usize) -> EligibilityFilter<'a, I, V> {
        EligibilityFilter {
            lines,
            vocabulary,
            min_tokens,
            scanned: 0,
        }
    }

    /// Number of source lines read so far.
    pub fn scanned(&self) -> usize {
        self.scanned
    }
}

impl<'a, I, V> Iterator for EligibilityFilter<'a, I, V>
where
    I: Iterator<Item = io::Result<String>>,
    V: BigramVocabulary + ?Sized,
{
    type Item = Result<EligibleSentence>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.scanned += 1;
            match check_sentence(&line, self.vocabulary, self.min_tokens) {
                Ok(sentence) => return Some(Ok(sentence)),
                Err(reason) => trace!(line = self.scanned, ?reason, "rejected test sentence"),
            }
        }
    }
}
