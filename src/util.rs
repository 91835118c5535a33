use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{Bigram, Token};

// word runs (keeping inner apostrophes) or any single punctuation mark
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:'\w+)*|[^\w\s]").expect("token regex"));

static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)|\n\s*\n").expect("sentence regex"));

/// Splits `list` into `num_threads` contiguous chunks, runs `f_thread` on each
/// chunk in its own thread and returns the per-chunk results in chunk order.
pub fn multi_thread_process_list<T1, T2, F>(list: &[T1], num_threads: usize, f_thread: F) -> Vec<T2>
where
    T1: Sync,
    T2: Send,
    F: Fn(&[T1]) -> T2 + Sync,
{
    if list.is_empty() {
        return Vec::new();
    }
    let num_threads = num_threads.max(1);
    let num_in_chunk = (list.len() + num_threads - 1) / num_threads;

    let (tx, rx) = mpsc::channel::<(usize, T2)>();
    let f_thread = &f_thread;
    thread::scope(|s| {
        for (i, chunk) in list.chunks(num_in_chunk).enumerate() {
            let ctx = tx.clone();
            s.spawn(move || {
                // the receiver outlives the scope, so send only fails if it was dropped
                let _ = ctx.send((i, f_thread(chunk)));
            });
        }
    });
    drop(tx);

    rx.into_iter()
        .sorted_by_key(|(i, _)| *i)
        .map(|(_, result)| result)
        .collect_vec()
}

/// Breaks running text into sentences. Terminal punctuation stays attached to
/// the sentence it ends; a blank line also ends a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END_RE.find_iter(text) {
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(String::from(sentence));
        }
        start = m.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(String::from(rest));
    }
    sentences
}

/// Lowercases `sentence` and splits it into word and punctuation tokens.
pub fn tokenize(sentence: &str) -> Vec<Token> {
    let lowered = sentence.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| String::from(m.as_str()))
        .collect_vec()
}

pub fn bigrams(tokens: &[Token]) -> Vec<Bigram> {
    tokens
        .iter()
        .tuple_windows()
        .map(|(w1, w2)| (w1.clone(), w2.clone()))
        .collect_vec()
}

pub fn read_corpus(file_path: &Path) -> io::Result<String> {
    std::fs::read_to_string(file_path)
}

// Streams a file line by line so callers can stop reading early.
pub fn get_lines(file_path: &Path) -> io::Result<io::Lines<BufReader<File>>> {
    let file = File::open(file_path)?;
    Ok(BufReader::new(file).lines())
}

// Adapts in-memory text into the same shape `get_lines` produces.
pub fn in_memory_lines<I, S>(lines: I) -> impl Iterator<Item = io::Result<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines.into_iter().map(|s| Ok(s.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_splits_punctuation() {
        assert_eq!(tokenize("The cat sat ."), vec!["the", "cat", "sat", "."]);
        assert_eq!(tokenize("Hello, World."), vec!["hello", ",", "world", "."]);
        assert_eq!(tokenize("don't stop"), vec!["don't", "stop"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn bigrams_are_adjacent_pairs() {
        let tokens = tokenize("a b c");
        assert_eq!(
            bigrams(&tokens),
            vec![
                (String::from("a"), String::from("b")),
                (String::from("b"), String::from("c"))
            ]
        );
        assert!(bigrams(&tokenize("alone")).is_empty());
        assert!(bigrams(&[]).is_empty());
    }

    #[test]
    fn split_sentences_keeps_terminators() {
        let text = "The cat sat. The dog ran!  Did it?\n\nA heading line\nNo stop";
        assert_eq!(
            split_sentences(text),
            vec!["The cat sat.", "The dog ran!", "Did it?", "A heading line\nNo stop"]
        );
        assert_eq!(split_sentences("pi is 3.14 roughly."), vec!["pi is 3.14 roughly."]);
        assert!(split_sentences("  \n ").is_empty());
    }

    #[test]
    fn multi_thread_results_keep_chunk_order() {
        let list = (0..103).collect_vec();
        for threads in [0, 1, 2, 7, 16, 200] {
            let sums = multi_thread_process_list(&list, threads, |chunk: &[i32]| chunk.to_vec());
            assert_eq!(sums.concat(), list);
        }
        let empty: Vec<i32> = Vec::new();
        assert!(multi_thread_process_list(&empty, 4, |c: &[i32]| c.len()).is_empty());
    }
}
