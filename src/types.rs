use std::collections::HashMap;

// A lowercased word unit
pub type Token = String;

// (first word, second word), never crossing a sentence boundary
pub type Bigram = (Token, Token);

// Trainer output
// token -> number of times it appears in the training corpus
pub type UnigramTable = HashMap<Token, usize>;
// (w1, w2) -> number of times w2 directly follows w1
pub type BigramTable = HashMap<Bigram, usize>;

// Smoothed model
// (w1, w2) -> -log2((count(w1 w2) + 1) / (count(w1) + 1))
pub type SurprisalMap = HashMap<Bigram, f64>;
