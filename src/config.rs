use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// How strictly an extracted title must agree with a catalog title.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-sensitive equality
    Strict,
    /// Case-insensitive equality
    Caseless,
    /// Case-insensitive equality or word-bounded containment inside the catalog title
    Permissive,
}

/// Application configuration loaded from environment variables
///
/// Every variable is prefixed with `MOVIEBOT_`, e.g. `MOVIEBOT_DATA_DIR`.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding movies.txt, ratings.txt and sentiment.txt
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Name the bot introduces itself with
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// Fallback tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default = "default_true")]
    pub quoteless_extraction: bool,

    #[serde(default = "default_true")]
    pub disambiguation_dialogue: bool,

    #[serde(default = "default_true")]
    pub spell_correction: bool,

    #[serde(default = "default_true")]
    pub multi_movie_sentiment: bool,

    #[serde(default)]
    pub fallback_responses: bool,

    #[serde(default)]
    pub remember_previous_sentiment: bool,

    #[serde(default)]
    pub strong_sentiment: bool,

    #[serde(default = "default_match_mode")]
    pub match_mode: MatchMode,

    /// Edit distance allowed when spell-correcting a title
    #[serde(default = "default_max_edit_distance")]
    pub max_edit_distance: usize,

    /// Number of recommendations computed per request
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Ratings needed before recommendations unlock
    #[serde(default = "default_min_ratings")]
    pub min_ratings: usize,

    /// Raw ratings above this value count as liked
    #[serde(default = "default_binarize_threshold")]
    pub binarize_threshold: f64,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_bot_name() -> String {
    "Marvin the Moviebot".to_string()
}

fn default_log_filter() -> String {
    "moviebot=info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_match_mode() -> MatchMode {
    MatchMode::Permissive
}

fn default_max_edit_distance() -> usize {
    3
}

fn default_recommendation_count() -> usize {
    10
}

fn default_min_ratings() -> usize {
    5
}

fn default_binarize_threshold() -> f64 {
    2.5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::prefixed("MOVIEBOT_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the dialogue cannot work with
    pub fn validate(&self) -> AppResult<()> {
        if self.recommendation_count == 0 {
            return Err(AppError::Config(
                "recommendation_count must be at least 1".to_string(),
            ));
        }
        if !self.binarize_threshold.is_finite() {
            return Err(AppError::Config(format!(
                "binarize_threshold must be a number, got {}",
                self.binarize_threshold
            )));
        }
        if self.bot_name.trim().is_empty() {
            return Err(AppError::Config("bot_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// The behavior switches handed to each dialogue session
    pub fn features(&self) -> FeatureConfig {
        FeatureConfig {
            bot_name: self.bot_name.clone(),
            quoteless_extraction: self.quoteless_extraction,
            disambiguation_dialogue: self.disambiguation_dialogue,
            spell_correction: self.spell_correction,
            multi_movie_sentiment: self.multi_movie_sentiment,
            fallback_responses: self.fallback_responses,
            remember_previous_sentiment: self.remember_previous_sentiment,
            strong_sentiment: self.strong_sentiment,
            match_mode: self.match_mode,
            max_edit_distance: self.max_edit_distance,
            recommendation_count: self.recommendation_count,
            min_ratings: self.min_ratings,
        }
    }
}

/// Immutable set of optional behaviors, fixed when a session is created.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub bot_name: String,
    /// Look for unquoted catalog titles when the line has no quotes
    pub quoteless_extraction: bool,
    /// Ask which movie was meant when a title matches several entries
    pub disambiguation_dialogue: bool,
    /// Offer a close title when nothing matches exactly
    pub spell_correction: bool,
    /// Score each title separately when a line mentions several
    pub multi_movie_sentiment: bool,
    /// Answer small talk when no title is found
    pub fallback_responses: bool,
    /// Reuse the last clear sentiment when a reply has none
    pub remember_previous_sentiment: bool,
    /// Report ±2 for emphatic reviews
    pub strong_sentiment: bool,
    pub match_mode: MatchMode,
    pub max_edit_distance: usize,
    pub recommendation_count: usize,
    pub min_ratings: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            quoteless_extraction: true,
            disambiguation_dialogue: true,
            spell_correction: true,
            multi_movie_sentiment: true,
            fallback_responses: false,
            remember_previous_sentiment: false,
            strong_sentiment: false,
            match_mode: default_match_mode(),
            max_edit_distance: default_max_edit_distance(),
            recommendation_count: default_recommendation_count(),
            min_ratings: default_min_ratings(),
        }
    }
}
