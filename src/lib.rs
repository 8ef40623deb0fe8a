//! A movie recommendation chatbot.
//!
//! Users describe movies they have seen in free text; the bot finds the
//! titles, scores the sentiment of each review, and once it knows enough
//! opinions recommends unseen movies by item-item collaborative filtering.

pub mod config;
pub mod data;
pub mod dialogue;
pub mod error;
pub mod models;
pub mod services;

pub use config::{Config, FeatureConfig, MatchMode};
pub use dialogue::Chatbot;
pub use error::{AppError, AppResult};
