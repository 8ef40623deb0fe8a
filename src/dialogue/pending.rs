use serde::Serialize;

/// The one follow-up the bot is waiting for, if any.
///
/// Taken out of the session at the start of every turn; a handler that still
/// needs an answer puts a (possibly updated) value back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PendingInteraction {
    #[default]
    None,
    /// "Did you mean X?" after a fuzzy title match
    SpellCorrectionConfirm {
        candidate_index: usize,
        candidate_title: String,
        original_review: String,
        /// Repeated when the answer is neither yes nor no
        prompt: String,
    },
    /// The review was neutral; the next line says how the user felt
    PreferenceFollowup {
        movie_index: usize,
        movie_title: String,
    },
    /// The title matched several movies; the next line should pick one
    Disambiguation {
        candidate_indices: Vec<usize>,
        original_review: String,
    },
    /// Recommendations already computed, served one per "yes"
    RecommendationFeed {
        recommendations: Vec<usize>,
        next_offset: usize,
    },
}

impl PendingInteraction {
    pub fn state_name(&self) -> &'static str {
        match self {
            PendingInteraction::None => "idle",
            PendingInteraction::SpellCorrectionConfirm { .. } => "awaiting_spell_confirm",
            PendingInteraction::PreferenceFollowup { .. } => "awaiting_preference_followup",
            PendingInteraction::Disambiguation { .. } => "awaiting_disambiguation",
            PendingInteraction::RecommendationFeed { .. } => "awaiting_recommendation_continue",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PendingInteraction::None)
    }
}
