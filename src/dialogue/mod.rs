//! The conversation state machine.
//!
//! A [`Chatbot`] owns one user's profile and the single pending interaction.
//! Each line is routed by that pending interaction first; only an idle
//! session looks for recommendation requests or new reviews.

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Value};

use crate::{
    config::{FeatureConfig, MatchMode},
    models::{MovieData, UserProfile},
    services::{
        disambiguation::narrow,
        extraction::{ExtractionSource, TitleExtractor},
        recommendations::recommend,
        sentiment::{SentimentAnalyzer, SentimentMemory},
        title_search::{Resolution, TitleResolver},
    },
};

pub mod fallback;
pub mod pending;
pub mod responses;
pub mod session;

pub use pending::PendingInteraction;
pub use session::SessionId;

use responses::{fill, join_titles, pick, quoted};

const YES_WORDS: &[&str] = &["y", "yes", "yeah", "yep", "yup", "sure", "correct", "right"];
const NO_WORDS: &[&str] = &["n", "no", "nope", "nah"];

/// One user's conversation with the bot
pub struct Chatbot {
    data: Arc<MovieData>,
    features: FeatureConfig,
    profile: UserProfile,
    pending: PendingInteraction,
    memory: SentimentMemory,
    recommendations_unlocked: bool,
    rng: StdRng,
    session_id: SessionId,
}

impl Chatbot {
    pub fn new(data: Arc<MovieData>, features: FeatureConfig) -> Self {
        Self::with_rng(data, features, StdRng::from_entropy())
    }

    /// Same as [`Chatbot::new`] but with reproducible reply wording
    pub fn with_seed(data: Arc<MovieData>, features: FeatureConfig, seed: u64) -> Self {
        Self::with_rng(data, features, StdRng::seed_from_u64(seed))
    }

    fn with_rng(data: Arc<MovieData>, features: FeatureConfig, rng: StdRng) -> Self {
        let session_id = SessionId::new();
        tracing::info!(
            session_id = %session_id,
            movies = data.catalog.len(),
            "Starting dialogue session"
        );

        Self {
            profile: UserProfile::new(data.catalog.len()),
            data,
            features,
            pending: PendingInteraction::None,
            memory: SentimentMemory::default(),
            recommendations_unlocked: false,
            rng,
            session_id,
        }
    }

    pub fn greeting(&mut self) -> String {
        format!(
            "Hi! I'm {}. {}",
            self.features.bot_name,
            pick(&mut self.rng, responses::GREETINGS)
        )
    }

    pub fn farewell(&mut self) -> String {
        pick(&mut self.rng, responses::FAREWELLS).to_string()
    }

    pub fn intro(&self) -> String {
        format!(
            "I'm {name}, and I recommend movies.\n\
             Tell me about movies you've seen and what you thought of them, \
             one at a time with the title in double quotes, like:\n\
             \x20   I loved \"The Notebook\"!\n\
             Once I know {min} of your opinions, ask me for a recommendation.",
            name = self.features.bot_name,
            min = self.features.min_ratings,
        )
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn pending(&self) -> &PendingInteraction {
        &self.pending
    }

    pub fn features(&self) -> &FeatureConfig {
        &self.features
    }

    /// Handles one line of user input and returns the reply. Never fails.
    pub fn process(&mut self, line: &str) -> String {
        let span = session::session_span(self.session_id, self.pending.state_name());
        let _guard = span.enter();

        let response = match std::mem::take(&mut self.pending) {
            PendingInteraction::SpellCorrectionConfirm {
                candidate_index,
                candidate_title,
                original_review,
                prompt,
            } => self.on_spell_confirm(line, candidate_index, candidate_title, original_review, prompt),
            PendingInteraction::PreferenceFollowup {
                movie_index,
                movie_title,
            } => self.on_preference_followup(line, movie_index, movie_title),
            PendingInteraction::Disambiguation {
                candidate_indices,
                original_review,
            } => self.on_disambiguation(line, candidate_indices, original_review),
            PendingInteraction::RecommendationFeed {
                recommendations,
                next_offset,
            } => self.on_recommendation_feed(line, recommendations, next_offset),
            PendingInteraction::None => self.on_idle(line),
        };

        tracing::debug!(
            next_state = self.pending.state_name(),
            rated = self.profile.rated_count(),
            "Turn complete"
        );

        self.with_unlock_notice(response)
    }

    /// State of the session for the driver's debug output
    pub fn debug_snapshot(&self) -> Value {
        json!({
            "session_id": self.session_id,
            "state": self.pending.state_name(),
            "pending": serde_json::to_value(&self.pending).unwrap_or(Value::Null),
            "rated": self.profile.rated_count(),
            "ratings": self.profile.rated().collect::<Vec<_>>(),
            "recommendations_unlocked": self.recommendations_unlocked,
        })
    }

    // ========================================================================
    // Pending interactions
    // ========================================================================

    fn on_spell_confirm(
        &mut self,
        line: &str,
        candidate_index: usize,
        candidate_title: String,
        original_review: String,
        prompt: String,
    ) -> String {
        match yes_or_no(line) {
            Some(true) => self.apply_review(candidate_index, &candidate_title, &original_review),
            Some(false) => fill(responses::SPELL_DECLINED, &candidate_title),
            None => {
                let reply = fill(responses::SPELL_REASK, &prompt);
                self.pending = PendingInteraction::SpellCorrectionConfirm {
                    candidate_index,
                    candidate_title,
                    original_review,
                    prompt,
                };
                reply
            }
        }
    }

    fn on_preference_followup(&mut self, line: &str, movie_index: usize, movie_title: String) -> String {
        if declines(line) {
            return responses::FOLLOWUP_CANCELLED.to_string();
        }

        let sentiment = self.score_review(line);
        self.apply_sentiment(movie_index, &movie_title, sentiment)
    }

    fn on_disambiguation(
        &mut self,
        line: &str,
        candidate_indices: Vec<usize>,
        original_review: String,
    ) -> String {
        if declines(line) {
            return responses::CLARIFY_CANCELLED.to_string();
        }

        let narrowed = narrow(&self.data.catalog, line, &candidate_indices);
        if let [index] = narrowed.as_slice() {
            let title = self.display_title(*index);
            return self.apply_review(*index, &title, &original_review);
        }

        let titles = self.display_titles(&narrowed);
        self.pending = PendingInteraction::Disambiguation {
            candidate_indices: narrowed,
            original_review,
        };
        fill(responses::CLARIFY_STILL_AMBIGUOUS, join_titles(&titles, "and"))
    }

    fn on_recommendation_feed(&mut self, line: &str, recommendations: Vec<usize>, next_offset: usize) -> String {
        match yes_or_no(line) {
            Some(true) => match recommendations.get(next_offset) {
                Some(&index) => {
                    let reply = format!(
                        "{}\n{}",
                        fill(responses::RECOMMEND_NEXT, self.display_title(index)),
                        responses::RECOMMEND_MORE
                    );
                    self.pending = PendingInteraction::RecommendationFeed {
                        recommendations,
                        next_offset: next_offset + 1,
                    };
                    reply
                }
                None => fill(responses::RECOMMEND_EXHAUSTED, recommendations.len()),
            },
            Some(false) => responses::RECOMMEND_STOPPED.to_string(),
            None => {
                self.pending = PendingInteraction::RecommendationFeed {
                    recommendations,
                    next_offset,
                };
                responses::RECOMMEND_REASK.to_string()
            }
        }
    }

    // ========================================================================
    // Idle turns
    // ========================================================================

    fn on_idle(&mut self, line: &str) -> String {
        if line.to_lowercase().contains("recommend") {
            if self.profile.rated_count() >= self.features.min_ratings {
                return self.start_recommendations();
            }
            return fill(responses::NEED_MORE_RATINGS, self.features.min_ratings);
        }

        self.add_ratings(line)
    }

    fn start_recommendations(&mut self) -> String {
        let picks = recommend(
            &self.profile,
            &self.data.ratings,
            self.features.recommendation_count,
        );

        let Some(&first) = picks.first() else {
            return responses::RECOMMEND_NONE.to_string();
        };

        let reply = format!(
            "{}\n{}",
            fill(responses::RECOMMEND_FIRST, self.display_title(first)),
            responses::RECOMMEND_MORE
        );
        self.pending = PendingInteraction::RecommendationFeed {
            recommendations: picks,
            next_offset: 1,
        };
        reply
    }

    fn add_ratings(&mut self, line: &str) -> String {
        let extraction =
            TitleExtractor::new(&self.data.catalog, self.features.quoteless_extraction).extract(line);

        match extraction.titles.as_slice() {
            [] if self.features.fallback_responses => {
                fallback::respond(line, &mut self.rng, &self.features.bot_name)
            }
            [] => responses::NO_TITLE.to_string(),
            [title] => self.single_title(title, extraction.source, line),
            titles if extraction.source == ExtractionSource::Quoteless => {
                let heard: Vec<String> = titles.iter().map(|t| quoted(t)).collect();
                format!(
                    "Sorry, I can only pick out one unquoted title at a time, and I think you mentioned {}.\n\
                     Please put each title in double quotes, or talk about a single movie.",
                    join_titles(&heard, "and")
                )
            }
            _ if self.features.multi_movie_sentiment => self.multiple_titles(line),
            _ => responses::NO_TITLE.to_string(),
        }
    }

    fn single_title(&mut self, title: &str, source: ExtractionSource, line: &str) -> String {
        if title.trim().is_empty() {
            return pick(&mut self.rng, responses::UNKNOWN_MOVIE).to_string();
        }

        // unquoted text is already lowercased by the user; containment would overmatch
        let mode = match (source, self.features.match_mode) {
            (ExtractionSource::Quoteless, MatchMode::Permissive) => MatchMode::Caseless,
            (_, mode) => mode,
        };
        let resolver = TitleResolver::new(&self.data.catalog, mode);

        let mut resolution = resolver.resolve(title, 0);
        let mut corrected = false;
        if resolution == Resolution::NotFound && self.features.spell_correction {
            resolution = resolver.resolve(title, self.features.max_edit_distance);
            corrected = true;
        }

        match resolution {
            Resolution::NotFound => pick(&mut self.rng, responses::UNKNOWN_MOVIE).to_string(),
            Resolution::Unique(index) if corrected => {
                let candidate_title = self.display_title(index);
                let prompt = pick(&mut self.rng, responses::SPELL_CONFIRM)
                    .replace("{title}", title)
                    .replace("{candidate}", &candidate_title);
                self.pending = PendingInteraction::SpellCorrectionConfirm {
                    candidate_index: index,
                    candidate_title,
                    original_review: line.to_string(),
                    prompt: prompt.clone(),
                };
                prompt
            }
            Resolution::Unique(index) => {
                let display = self.display_title(index);
                self.apply_review(index, &display, line)
            }
            Resolution::Ambiguous(indices) => {
                let titles = self.display_titles(&indices);
                let listing = if corrected {
                    format!(
                        "I couldn't find \"{}\" exactly. Did you mean {}?",
                        title,
                        join_titles(&titles, "or")
                    )
                } else {
                    format!(
                        "I found more than one movie called \"{}\": {}.",
                        title,
                        join_titles(&titles, "and")
                    )
                };

                if self.features.disambiguation_dialogue {
                    self.pending = PendingInteraction::Disambiguation {
                        candidate_indices: indices,
                        original_review: line.to_string(),
                    };
                    format!("{}\n{}", listing, responses::CLARIFY_ASK)
                } else {
                    format!("{}\n{}", listing, responses::SPECIFY_ASK)
                }
            }
        }
    }

    fn multiple_titles(&mut self, line: &str) -> String {
        let analyzer = SentimentAnalyzer::new(&self.data.lexicon, self.data.stemmer.as_ref())
            .with_strong(self.features.strong_sentiment);
        let resolver = TitleResolver::new(&self.data.catalog, self.features.match_mode);

        let mut liked = Vec::new();
        let mut disliked = Vec::new();
        let mut unsure = Vec::new();
        let mut unresolved = Vec::new();

        for (mention, sentiment) in analyzer.score_all(line) {
            let Resolution::Unique(index) = resolver.resolve(&mention, 0) else {
                unresolved.push(quoted(&mention));
                continue;
            };

            if sentiment != 0 {
                self.profile.rate(index, sentiment);
            }
            let shown = quoted(&mention);
            match sentiment {
                s if s > 0 => liked.push(shown),
                s if s < 0 => disliked.push(shown),
                _ => unsure.push(shown),
            }
        }

        let mut lines = Vec::new();
        if !liked.is_empty() {
            lines.push(format!("You liked {}.", join_titles(&liked, "and")));
        }
        if !disliked.is_empty() {
            lines.push(format!("You didn't like {}.", join_titles(&disliked, "and")));
        }
        if !unsure.is_empty() {
            lines.push(format!(
                "I couldn't tell whether you liked {}.",
                join_titles(&unsure, "and")
            ));
        }
        if !unresolved.is_empty() {
            lines.push(format!(
                "I couldn't pin down a single movie for {}. Check the spelling or add the year, \
                 like \"Titanic (1997)\".",
                join_titles(&unresolved, "or")
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Applying opinions
    // ========================================================================

    fn score_review(&mut self, review: &str) -> i8 {
        let mentions =
            TitleExtractor::new(&self.data.catalog, self.features.quoteless_extraction)
                .extract(review)
                .titles;
        let analyzer = SentimentAnalyzer::new(&self.data.lexicon, self.data.stemmer.as_ref())
            .with_strong(self.features.strong_sentiment);

        if self.features.remember_previous_sentiment {
            analyzer.score_with_memory(review, &mentions, &mut self.memory)
        } else {
            analyzer.score_clause(review, &mentions)
        }
    }

    fn apply_review(&mut self, movie_index: usize, movie_title: &str, review: &str) -> String {
        let sentiment = self.score_review(review);
        self.apply_sentiment(movie_index, movie_title, sentiment)
    }

    /// Records a nonzero sentiment, or asks a follow-up when it is neutral
    fn apply_sentiment(&mut self, movie_index: usize, movie_title: &str, sentiment: i8) -> String {
        let bank = match sentiment {
            2..=i8::MAX => responses::LOVED,
            1 => responses::LIKED,
            0 => {
                self.pending = PendingInteraction::PreferenceFollowup {
                    movie_index,
                    movie_title: movie_title.to_string(),
                };
                responses::NEUTRAL
            }
            -1 => responses::DISLIKED,
            i8::MIN..=-2 => responses::HATED,
        };

        if sentiment != 0 {
            self.profile.rate(movie_index, sentiment);
            tracing::debug!(movie_index, sentiment, "Recorded opinion");
        }
        fill(pick(&mut self.rng, bank), movie_title)
    }

    fn with_unlock_notice(&mut self, response: String) -> String {
        if self.recommendations_unlocked || self.profile.rated_count() < self.features.min_ratings {
            return response;
        }

        self.recommendations_unlocked = true;
        tracing::info!(rated = self.profile.rated_count(), "Recommendations unlocked");
        format!("{}\n{}", response, responses::UNLOCKED)
    }

    fn display_title(&self, index: usize) -> String {
        self.data
            .catalog
            .get(index)
            .map(|entry| quoted(&entry.full_title()))
            .unwrap_or_default()
    }

    fn display_titles(&self, indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| self.display_title(i)).collect()
    }
}

impl std::fmt::Debug for Chatbot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chatbot")
            .field("session_id", &self.session_id)
            .field("state", &self.pending.state_name())
            .field("rated", &self.profile.rated_count())
            .finish()
    }
}

fn words(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
}

/// `Some(true)` for a clear yes, `Some(false)` for a clear no, else `None`.
/// A "not" anywhere turns a yes into a hedge ("not sure").
fn yes_or_no(line: &str) -> Option<bool> {
    let (mut yes, mut no, mut hedged) = (false, false, false);
    for word in words(line) {
        yes |= YES_WORDS.contains(&word.as_str());
        no |= NO_WORDS.contains(&word.as_str());
        hedged |= word == "not";
    }

    match (yes, no) {
        (true, false) if !hedged => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}

/// A reply that opens with "no" opts out of a follow-up question
fn declines(line: &str) -> bool {
    words(line)
        .next()
        .is_some_and(|w| matches!(w.as_str(), "no" | "nope" | "nah"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_or_no() {
        assert_eq!(yes_or_no("Yes!"), Some(true));
        assert_eq!(yes_or_no("y"), Some(true));
        assert_eq!(yes_or_no("yeah, that one"), Some(true));
        assert_eq!(yes_or_no("nope."), Some(false));
        assert_eq!(yes_or_no("No, not at all"), Some(false));
        assert_eq!(yes_or_no("yes and no"), None);
        assert_eq!(yes_or_no("maybe"), None);
        assert_eq!(yes_or_no("not sure"), None);
        assert_eq!(yes_or_no("I'm not sure, right?"), None);
        assert_eq!(yes_or_no("not"), None);
        assert_eq!(yes_or_no("Yesterday was nice"), None);
    }

    #[test]
    fn test_declines_on_first_word() {
        assert!(declines("No thanks"));
        assert!(declines("nope"));
        assert!(!declines("Not really my thing"));
        assert!(!declines("I'd say no"));
        assert!(!declines(""));
    }
}
