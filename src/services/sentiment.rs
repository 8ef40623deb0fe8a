//! Lexicon-based sentiment scoring.
//!
//! A clause is scored by counting lexicon hits, flipping their sign after a
//! negation until the sentence ends. Lines naming several movies are cut into
//! clauses at sentence ends and at "but", and each movie takes the score of
//! the clause it was mentioned in.

use crate::{
    models::{Polarity, PolarityLexicon},
    services::{extraction::QUOTED, stemmer::Stemmer},
};

const NEGATIONS: &[&str] = &["not", "never", "none", "nothing", "hardly", "no"];

/// Words that discount everything said before them in a clause
const RESETS: &[&str] = &["but", "however"];

const INTENSIFIERS: &[&str] = &["really", "very", "so", "extremely", "truly"];

const CONJUNCTIONS: &[&str] = &["and", "or", "nor", "but"];

const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', ';', ':'];

/// The last clear sentiment of a session, for replies like "I liked it".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentMemory {
    last: i8,
}

impl SentimentMemory {
    pub fn last(&self) -> i8 {
        self.last
    }
}

#[derive(Debug, Default)]
struct Tally {
    total: i32,
    intensified: bool,
    /// A negation or "but" appeared anywhere in the clause
    contrasted: bool,
}

/// One piece of a sentence, as seen by the clause splitter
#[derive(Debug, Clone, PartialEq)]
enum ClauseToken {
    Words(String),
    Conjunction(String),
    Title(String),
    SentenceEnd,
}

/// Scores review text against the polarity lexicon
#[derive(Clone, Copy)]
pub struct SentimentAnalyzer<'a> {
    lexicon: &'a PolarityLexicon,
    stemmer: &'a dyn Stemmer,
    strong: bool,
}

impl<'a> SentimentAnalyzer<'a> {
    pub fn new(lexicon: &'a PolarityLexicon, stemmer: &'a dyn Stemmer) -> Self {
        Self {
            lexicon,
            stemmer,
            strong: false,
        }
    }

    /// Report ±2 for emphatic clauses
    pub fn with_strong(self, strong: bool) -> Self {
        Self { strong, ..self }
    }

    /// Scores one clause as -1, 0 or +1 (±2 in strong mode).
    ///
    /// `mentions` are removed from the text first so title words never count.
    pub fn score_clause(&self, text: &str, mentions: &[String]) -> i8 {
        self.classify(&self.tally(text, mentions))
    }

    /// Like [`score_clause`](Self::score_clause), but a clause with no
    /// sentiment of its own reuses the session's last clear one, flipped when
    /// the clause contains a negation or "but".
    pub fn score_with_memory(
        &self,
        text: &str,
        mentions: &[String],
        memory: &mut SentimentMemory,
    ) -> i8 {
        let tally = self.tally(text, mentions);
        if tally.total != 0 {
            memory.last = tally.total.signum() as i8;
            return self.classify(&tally);
        }

        match (memory.last, tally.contrasted) {
            (0, _) => 0,
            (last, true) => -last,
            (last, false) => last,
        }
    }

    /// Scores every quoted movie in `text` by the clause it appears in.
    ///
    /// Pairs come back in order of mention; a movie named twice appears twice.
    pub fn score_all(&self, text: &str) -> Vec<(String, i8)> {
        let mut scored = Vec::new();

        for sentence in split_sentences(text) {
            let mut clause = String::new();
            let mut titles: Vec<String> = Vec::new();
            // score of the clause that just ended on "but"
            let mut carry: Option<i8> = None;

            let mut tokens = tokenize_sentence(sentence);
            tokens.push(ClauseToken::SentenceEnd);

            for token in tokens {
                match token {
                    ClauseToken::Words(words) => {
                        clause.push_str(&words);
                        clause.push(' ');
                    }
                    ClauseToken::Title(title) => titles.push(title),
                    ClauseToken::Conjunction(word) if word == "but" => {
                        let score = self.close_clause(&clause, carry);
                        scored.extend(titles.drain(..).map(|t| (t, score)));
                        carry = Some(score);
                        clause.clear();
                    }
                    ClauseToken::Conjunction(_) => {}
                    ClauseToken::SentenceEnd => {
                        let score = self.close_clause(&clause, carry);
                        scored.extend(titles.drain(..).map(|t| (t, score)));
                        carry = None;
                        clause.clear();
                    }
                }
            }
        }

        scored
    }

    fn close_clause(&self, clause: &str, carry: Option<i8>) -> i8 {
        let mut score = self.score_clause(clause, &[]);

        // "liked neither X nor Y"
        if clause.split_whitespace().any(|w| core(w).eq_ignore_ascii_case("neither")) {
            score = -score;
        }

        match carry {
            Some(previous) if score == 0 => -previous,
            _ => score,
        }
    }

    fn tally(&self, text: &str, mentions: &[String]) -> Tally {
        let mut text = text.to_lowercase();
        for mention in mentions.iter().filter(|m| !m.is_empty()) {
            text = text.replace(&mention.to_lowercase(), "");
        }

        let mut tally = Tally::default();
        let mut scale = 1;
        let mut after_intensifier = false;

        for word in text.split_whitespace() {
            let core = core(word);

            if is_negation(core) {
                scale = -scale;
                tally.contrasted = true;
            } else if RESETS.contains(&core) {
                tally.total = 0;
            }
            if core == "but" {
                tally.contrasted = true;
            }

            if !core.is_empty() {
                let hit = match self.lexicon.get(&self.stemmer.stem(core)) {
                    Some(Polarity::Positive) => scale,
                    Some(Polarity::Negative) => -scale,
                    None => 0,
                };
                if hit != 0 {
                    tally.total += hit;
                    tally.intensified |= after_intensifier;
                }
            }
            after_intensifier = INTENSIFIERS.contains(&core);

            // negation stops at the end of a sentence, commas don't count
            if ends_sentence(word) {
                scale = 1;
            }
        }

        tally
    }

    fn classify(&self, tally: &Tally) -> i8 {
        let sign = tally.total.signum() as i8;
        if self.strong && sign != 0 && (tally.total.abs() >= 2 || tally.intensified) {
            sign * 2
        } else {
            sign
        }
    }
}

fn core(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_negation(core: &str) -> bool {
    NEGATIONS.contains(&core) || core.ends_with("n't") || core.ends_with("n\u{2019}t")
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(&['"', '\'', ')'][..])
        .ends_with(TERMINAL_PUNCTUATION)
}

/// Splits on ". ", "! " and "? " outside of quotes, dropping the separator.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => in_quote = !in_quote,
            '.' | '!' | '?' if !in_quote => {
                if let Some(&(space, ' ')) = chars.peek() {
                    sentences.push(&text[start..i]);
                    start = space + 1;
                    chars.next();
                }
            }
            _ => {}
        }
    }

    sentences.push(&text[start..]);
    sentences
}

/// Tags a sentence as runs of words, coordinating conjunctions and quoted titles.
fn tokenize_sentence(sentence: &str) -> Vec<ClauseToken> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in QUOTED.captures_iter(sentence) {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_words(&sentence[last..whole.start()], &mut tokens);
        tokens.push(ClauseToken::Title(title.as_str().to_string()));
        last = whole.end();
    }
    push_words(&sentence[last..], &mut tokens);

    tokens
}

fn push_words(segment: &str, tokens: &mut Vec<ClauseToken>) {
    let mut run: Vec<&str> = Vec::new();

    for word in segment.split_whitespace() {
        let lowered = core(word).to_lowercase();
        if CONJUNCTIONS.contains(&lowered.as_str()) {
            if !run.is_empty() {
                tokens.push(ClauseToken::Words(run.join(" ")));
                run.clear();
            }
            tokens.push(ClauseToken::Conjunction(lowered));
        } else {
            run.push(word);
        }
    }

    if !run.is_empty() {
        tokens.push(ClauseToken::Words(run.join(" ")));
    }
}
